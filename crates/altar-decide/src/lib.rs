//! Weight engine, decision policy, and the per-altar entities they run over.
//!
//! A scan pass fills [`SidePanel`]s and stores an [`AltarUnit`] in the [`AltarRepository`]. Any
//! number of scan/render tasks may then call [`AltarEvaluator::evaluate`]; the per-unit caches
//! keep weight computation to at most once per TTL window.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod decision;
pub mod evaluator;
pub mod repository;
pub mod unit;
pub mod weights;

pub use config::{AltarConfig, DecisionConfig};
pub use decision::{decide, DecisionInput, NoDecision, Outcome, PanelView, WinReason};
pub use evaluator::{select_button, AltarEvaluator, Evaluation};
pub use repository::AltarRepository;
pub use unit::{AltarKind, AltarUnit, SidePanel, UnitId};
pub use weights::{
    compute_unit_weights, side_ratio, SideWeights, SlotKey, TierTable, WeightSet, SLOTS,
};
