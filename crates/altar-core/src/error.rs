use core::fmt;

use thiserror::Error;

use crate::Side;

pub type AltarResult<T> = Result<T, AltarError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AltarError {
    /// A computation needs the on-screen panel, but the scanner did not hand one over.
    #[error("{side} panel element is missing")]
    MissingElement { side: Side },

    /// The chosen button (or its panel) went away between selection and click.
    #[error("{side} selection is stale: {reason}")]
    StaleHandle { side: Side, reason: StaleReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    MissingButton,
    InvalidButton,
    MissingElement,
    InvalidElement,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StaleReason::MissingButton => "button handle is missing",
            StaleReason::InvalidButton => "button is no longer valid",
            StaleReason::MissingElement => "panel element is missing",
            StaleReason::InvalidElement => "panel element is no longer valid",
        })
    }
}
