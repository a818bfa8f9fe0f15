//! The layered altar decision policy.
//!
//! Rules run in a fixed order and the first one that applies decides:
//! geometry guard, mutual danger, unrecognized content, high-value override, low-value override,
//! minimum-weight gate, and finally the ratio comparison. "No winner" is an ordinary outcome,
//! not an error.
//!
//! [`decide`] is pure apart from the draw requests it appends to the queue.

use altar_core::{Color, DrawQueue, Point, Rect, Side, TextAlign};
use serde::Serialize;

use crate::config::DecisionConfig;
use crate::weights::{SideWeights, WeightSet};

/// Any single downside at or above this weight is considered dangerous.
pub const DANGER_THRESHOLD: i32 = 90;
/// An upside total at or above this wins outright.
pub const HIGH_VALUE_THRESHOLD: i32 = 100;

pub const WIN_FRAME_THICKNESS: f32 = 3.0;
pub const LOSE_FRAME_THICKNESS: f32 = 2.0;
pub const NEUTRAL_FRAME_THICKNESS: f32 = 2.0;
pub const DIAGNOSTIC_TEXT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    HighValue,
    OpponentLowValue,
    OpponentBelowMinimum,
    BetterRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDecision {
    InvalidGeometry,
    DualDanger,
    Unrecognized { side: Side },
    BothBelowMinimum,
    Tie,
    /// A panel or button is gone, hidden, or invalid; nothing is weighed or drawn.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner { side: Side, reason: WinReason },
    Neutral(NoDecision),
}

impl Outcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Winner { side, .. } => Some(*side),
            Outcome::Neutral(_) => None,
        }
    }
}

/// What the policy needs to know about one panel besides its weights.
#[derive(Debug, Clone, Copy)]
pub struct PanelView<'a> {
    pub rect: Rect,
    pub unmatched: &'a [String],
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub weights: &'a WeightSet,
    pub top: PanelView<'a>,
    pub bottom: PanelView<'a>,
}

impl<'a> DecisionInput<'a> {
    pub fn panel(&self, side: Side) -> &PanelView<'a> {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }
}

pub fn decide(
    input: &DecisionInput<'_>,
    config: &DecisionConfig,
    queue: &mut DrawQueue,
) -> Outcome {
    let outcome = evaluate(input, config);
    render(input, &outcome, queue);
    tracing::debug!(?outcome, "altar decision");
    outcome
}

fn evaluate(input: &DecisionInput<'_>, config: &DecisionConfig) -> Outcome {
    let top = &input.weights.top;
    let bottom = &input.weights.bottom;

    if input.top.rect.is_degenerate() || input.bottom.rect.is_degenerate() {
        return Outcome::Neutral(NoDecision::InvalidGeometry);
    }

    if is_dangerous(top) && is_dangerous(bottom) {
        return Outcome::Neutral(NoDecision::DualDanger);
    }

    for side in Side::BOTH {
        let weights = input.weights.side(side);
        // Zero because nothing was recognized, not because the upsides are worthless.
        if weights.upside_total == 0 && weights.upside_count == 0 {
            return Outcome::Neutral(NoDecision::Unrecognized { side });
        }
    }

    let high = |w: &SideWeights| w.upside_total >= i64::from(HIGH_VALUE_THRESHOLD);
    if let Some(side) = exactly_one(high(top), high(bottom)) {
        return Outcome::Winner {
            side,
            reason: WinReason::HighValue,
        };
    }

    if config.unvaluable_upside_enabled {
        let low =
            |w: &SideWeights| w.upside_total <= i64::from(config.unvaluable_upside_threshold);
        if let Some(side) = exactly_one(low(top), low(bottom)) {
            return Outcome::Winner {
                side: side.other(),
                reason: WinReason::OpponentLowValue,
            };
        }
    }

    if config.min_weight_threshold_enabled {
        let below = |w: &SideWeights| w.upside_total < i64::from(config.min_weight_threshold);
        match (below(top), below(bottom)) {
            (true, true) => return Outcome::Neutral(NoDecision::BothBelowMinimum),
            (true, false) => {
                return Outcome::Winner {
                    side: Side::Bottom,
                    reason: WinReason::OpponentBelowMinimum,
                }
            }
            (false, true) => {
                return Outcome::Winner {
                    side: Side::Top,
                    reason: WinReason::OpponentBelowMinimum,
                }
            }
            (false, false) => {}
        }
    }

    if top.ratio > bottom.ratio {
        Outcome::Winner {
            side: Side::Top,
            reason: WinReason::BetterRatio,
        }
    } else if bottom.ratio > top.ratio {
        Outcome::Winner {
            side: Side::Bottom,
            reason: WinReason::BetterRatio,
        }
    } else {
        Outcome::Neutral(NoDecision::Tie)
    }
}

fn is_dangerous(weights: &SideWeights) -> bool {
    weights.downside.iter().any(|&w| w >= DANGER_THRESHOLD)
}

/// The side for which the predicate alone holds. Both or neither falls through to later rules.
fn exactly_one(top: bool, bottom: bool) -> Option<Side> {
    match (top, bottom) {
        (true, false) => Some(Side::Top),
        (false, true) => Some(Side::Bottom),
        _ => None,
    }
}

fn render(input: &DecisionInput<'_>, outcome: &Outcome, queue: &mut DrawQueue) {
    match outcome {
        Outcome::Winner { side, reason } => {
            let winner = input.panel(*side);
            let loser = input.panel(side.other());
            queue.frame(winner.rect, Color::SUCCESS, WIN_FRAME_THICKNESS);
            queue.frame(loser.rect, Color::DANGER, LOSE_FRAME_THICKNESS);
            if *reason != WinReason::BetterRatio {
                queue.text(
                    win_label(*reason),
                    winner.rect.center(),
                    Color::SUCCESS,
                    DIAGNOSTIC_TEXT_SIZE,
                    TextAlign::Center,
                );
            }
        }
        Outcome::Neutral(reason @ NoDecision::InvalidGeometry) => {
            // Nothing to frame; anchor the message on whichever rect is usable.
            let anchor = [input.top.rect, input.bottom.rect]
                .into_iter()
                .find(|r| !r.is_degenerate())
                .map_or(Point::default(), |r| r.top_left());
            queue.text(
                neutral_message(input, *reason),
                anchor,
                Color::CAUTION,
                DIAGNOSTIC_TEXT_SIZE,
                TextAlign::Left,
            );
        }
        Outcome::Neutral(reason) => {
            for side in Side::BOTH {
                queue.frame(input.panel(side).rect, Color::CAUTION, NEUTRAL_FRAME_THICKNESS);
            }
            if let NoDecision::Unrecognized { side } = reason {
                tracing::warn!(
                    side = %side,
                    unmatched = ?input.panel(*side).unmatched,
                    "unrecognized altar content"
                );
            }
            queue.text(
                neutral_message(input, *reason),
                input.top.rect.center(),
                Color::CAUTION,
                DIAGNOSTIC_TEXT_SIZE,
                TextAlign::Center,
            );
        }
    }
}

fn neutral_message(input: &DecisionInput<'_>, reason: NoDecision) -> String {
    match reason {
        NoDecision::InvalidGeometry => "Altar skipped: invalid rectangles".to_string(),
        NoDecision::DualDanger => format!(
            "Both altars carry a dangerous modifier (>= {DANGER_THRESHOLD}), choose manually"
        ),
        NoDecision::Unrecognized { side } => {
            let unmatched = input.panel(side).unmatched;
            if unmatched.is_empty() {
                format!("Unrecognized {side} altar: no upsides matched")
            } else {
                format!("Unrecognized {side} altar: {}", unmatched.join(" | "))
            }
        }
        NoDecision::BothBelowMinimum => "Both altars are below the minimum weight".to_string(),
        NoDecision::Tie => "Altars are tied, choose manually".to_string(),
        NoDecision::Inactive => "Altar is no longer on screen".to_string(),
    }
}

fn win_label(reason: WinReason) -> &'static str {
    match reason {
        WinReason::HighValue => "High value upside",
        WinReason::OpponentLowValue => "Other upside not worth it",
        WinReason::OpponentBelowMinimum => "Other side below minimum weight",
        WinReason::BetterRatio => "Better ratio",
    }
}
