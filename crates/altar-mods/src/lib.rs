//! From decorated panel text to canonical modifier references.
//!
//! Pipeline: [`normalize::clean`] strips markup, [`ModMatcher`] resolves a cleaned line plus its
//! panel header to a `Target|id` reference, and [`parser`] splits a panel into header and
//! candidate lines and sorts them into beneficial, harmful, and unmatched.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod matcher;
pub mod normalize;
pub mod parser;

pub use catalog::{letters_only, CanonicalRef, ModCatalog, ModKind, ModifierDescriptor, Target};
pub use matcher::{CacheRecord, CachedMatcher, ModMatch, ModMatcher};
pub use normalize::{clean, TextNormalizer};
pub use parser::{classify, extract_mods_from_text, panel_text_of, Classified, PanelText};
