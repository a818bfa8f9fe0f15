use std::sync::Arc;

use altar_core::{DrawQueue, ElementRef, FakeElement, ManualClock, Rect, Side};
use altar_decide::{
    AltarConfig, AltarEvaluator, AltarKind, AltarUnit, NoDecision, Outcome, SidePanel, SLOTS,
};
use altar_mods::{CanonicalRef, Classified, ModCatalog, Target};

fn element(id: u64, y: f32) -> ElementRef {
    FakeElement::new(id, Rect::new(0.0, y, 200.0, 100.0)).into_ref()
}

fn boss_refs(prefix: &str, n: usize) -> Vec<CanonicalRef> {
    (0..n)
        .map(|i| CanonicalRef::new(Target::Boss, &format!("{prefix}{i}")))
        .collect()
}

#[test]
fn refs_beyond_eight_become_unmatched() {
    let panel = SidePanel::from_classified(
        Classified {
            beneficial: boss_refs("m", SLOTS + 1),
            harmful: boss_refs("h", 2),
            unmatched: vec!["{Something new}".to_string()],
        },
        None,
    );

    assert_eq!(panel.upside_count(), SLOTS);
    assert!(panel.upsides().iter().all(Option::is_some));
    assert_eq!(
        panel.upsides()[SLOTS - 1].as_ref().map(|r| r.as_str()),
        Some("Boss|m7")
    );
    assert_eq!(panel.unmatched(), ["{Something new}", "Boss|m8"]);
    assert_eq!(panel.downsides().iter().flatten().count(), 2);
}

#[test]
fn side_with_only_unmatched_upsides_is_unrecognized() {
    let unmatched: Vec<String> = (0..SLOTS + 1).map(|i| format!("{{Mystery {i}}}")).collect();
    let top = SidePanel::from_classified(
        Classified {
            beneficial: Vec::new(),
            harmful: boss_refs("h", 1),
            unmatched,
        },
        Some(element(1, 0.0)),
    );
    let bottom = SidePanel::from_classified(
        Classified {
            beneficial: vec![CanonicalRef::new(
                Target::Boss,
                "Final Boss drops # additional Chaos Orbs",
            )],
            harmful: Vec::new(),
            unmatched: Vec::new(),
        },
        Some(element(2, 120.0)),
    );
    let unit = AltarUnit::new(AltarKind::Eater, top, bottom)
        .with_buttons(Some(element(3, 0.0)), Some(element(4, 120.0)));

    let evaluator = AltarEvaluator::from_config(
        &AltarConfig::default(),
        &ModCatalog::builtin(),
        Arc::new(ManualClock::new(0)),
    );
    let mut queue = DrawQueue::new();
    let eval = evaluator.evaluate(&unit, &mut queue).expect("evaluate");

    assert_eq!(
        eval.outcome,
        Outcome::Neutral(NoDecision::Unrecognized { side: Side::Top })
    );
    assert_eq!(eval.weights.top.upside_count, 0);
    assert!(eval.button.is_none());
    assert!(queue.texts().iter().any(|t| t.text.contains("Mystery 8")));
}
