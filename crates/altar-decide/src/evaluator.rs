use std::sync::Arc;

use altar_core::{
    AltarError, AltarResult, Clock, Color, DrawQueue, ElementRef, Rect, Side, StaleReason,
    TextAlign,
};
use altar_mods::{ModCatalog, ModKind};

use crate::config::{AltarConfig, DecisionConfig};
use crate::decision::{decide, DecisionInput, NoDecision, Outcome, PanelView};
use crate::unit::AltarUnit;
use crate::weights::{SlotKey, TierTable, WeightSet};

const SUMMARY_TEXT_SIZE: f32 = 14.0;
const SLOT_TEXT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 14.0;

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub weights: WeightSet,
    /// Validated button for the winning side, if there is one to click.
    pub button: Option<ElementRef>,
}

/// Runs weights -> policy -> button validation for one unit at a time.
pub struct AltarEvaluator {
    tiers: TierTable,
    decision: DecisionConfig,
    clock: Arc<dyn Clock>,
}

impl AltarEvaluator {
    pub fn new(tiers: TierTable, decision: DecisionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            tiers,
            decision,
            clock,
        }
    }

    pub fn from_config(
        config: &AltarConfig,
        catalog: &ModCatalog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(config.tier_table(catalog), config.decision, clock)
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Fails only when a panel element is missing; every "no winner" case is an `Ok` outcome.
    ///
    /// A unit that is not live (see [`AltarUnit::is_valid`]) is neither weighed nor drawn: its
    /// outcome is [`NoDecision::Inactive`] with zeroed weights.
    pub fn evaluate(&self, unit: &AltarUnit, queue: &mut DrawQueue) -> AltarResult<Evaluation> {
        let top = panel_view(unit, Side::Top)?;
        let bottom = panel_view(unit, Side::Bottom)?;

        if !unit.is_valid(self.clock.as_ref()) {
            tracing::debug!(unit = %unit.id(), "altar not live, skipping");
            return Ok(Evaluation {
                outcome: Outcome::Neutral(NoDecision::Inactive),
                weights: WeightSet::default(),
                button: None,
            });
        }

        let weights = unit.weights(&self.tiers, self.clock.as_ref())?;
        let input = DecisionInput {
            weights: &weights,
            top,
            bottom,
        };

        for side in Side::BOTH {
            overlay_side(unit, side, &weights, input.panel(side).rect, queue);
        }

        let outcome = decide(&input, &self.decision, queue);
        tracing::info!(unit = %unit.id(), kind = %unit.kind(), ?outcome, "evaluated altar");

        let button = outcome.winner().and_then(|side| match select_button(unit, side) {
            Ok(button) => Some(button),
            Err(err) => {
                tracing::warn!(side = %side, error = %err, "not clicking altar");
                None
            }
        });

        Ok(Evaluation {
            outcome,
            weights,
            button,
        })
    }
}

fn panel_view(unit: &AltarUnit, side: Side) -> AltarResult<PanelView<'_>> {
    let panel = unit.panel(side);
    let element = panel
        .element()
        .ok_or(AltarError::MissingElement { side })?;
    Ok(PanelView {
        rect: element.rect(),
        unmatched: panel.unmatched(),
    })
}

/// The winning side's button, provided it and its panel are both still valid.
pub fn select_button(unit: &AltarUnit, side: Side) -> AltarResult<ElementRef> {
    let stale = |reason| AltarError::StaleHandle { side, reason };

    let button = unit
        .button(side)
        .ok_or_else(|| stale(StaleReason::MissingButton))?;
    if !button.is_valid() {
        return Err(stale(StaleReason::InvalidButton));
    }
    let element = unit
        .panel(side)
        .element()
        .ok_or_else(|| stale(StaleReason::MissingElement))?;
    if !element.is_valid() {
        return Err(stale(StaleReason::InvalidElement));
    }
    Ok(ElementRef::clone(button))
}

/// Summary line plus one line per weighted modifier, stacked down from the panel's corner.
fn overlay_side(
    unit: &AltarUnit,
    side: Side,
    weights: &WeightSet,
    rect: Rect,
    queue: &mut DrawQueue,
) {
    if rect.is_degenerate() {
        return;
    }
    let totals = weights.side(side);
    let ratio = if totals.ratio.is_finite() {
        format!("{:.2}", totals.ratio)
    } else {
        "inf".to_string()
    };
    let mut at = rect.top_left().offset(4.0, 4.0);
    queue.text(
        format!(
            "+{} / -{}  ratio {}",
            totals.upside_total, totals.downside_total, ratio
        ),
        at,
        Color::TEXT,
        SUMMARY_TEXT_SIZE,
        TextAlign::Left,
    );

    let panel = unit.panel(side);
    for kind in [ModKind::Beneficial, ModKind::Harmful] {
        let sign = if kind.is_beneficial() { '+' } else { '-' };
        let slots = weights.slots(SlotKey::new(side, kind));
        for (slot, weight) in panel.slots(kind).iter().zip(slots) {
            let Some(reference) = slot else { continue };
            at = at.offset(0.0, LINE_HEIGHT);
            queue.text(
                format!("{sign}{weight} {}", reference.id()),
                at,
                Color::TEXT,
                SLOT_TEXT_SIZE,
                TextAlign::Left,
            );
        }
    }
}
