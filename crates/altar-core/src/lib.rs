//! Engine-agnostic primitives shared by the altar decision crates.
//!
//! Nothing here knows about modifiers or weights: this crate only models what the host overlay
//! hands us (screen elements, geometry) and what we hand back (draw requests), plus the small
//! time-bounded cache every decision unit owns.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cache;
pub mod clock;
pub mod element;
pub mod error;
pub mod geometry;
pub mod render;
pub mod side;

pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use element::{is_live, ElementRef, FakeElement, ScreenElement};
pub use error::{AltarError, AltarResult, StaleReason};
pub use geometry::{Point, Rect};
pub use render::{Color, DrawQueue, FrameRequest, TextAlign, TextRequest};
pub use side::Side;
