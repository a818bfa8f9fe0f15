use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use altar_core::{ElementRef, FakeElement, ManualClock, Rect};
use altar_decide::{compute_unit_weights, AltarKind, AltarUnit, SidePanel, TierTable};
use altar_mods::{CachedMatcher, ModCatalog, ModMatcher, TextNormalizer};

fn matcher() -> CachedMatcher {
    CachedMatcher::new(
        ModMatcher::new(Arc::new(ModCatalog::builtin())),
        Arc::new(TextNormalizer::new()),
    )
}

fn element(id: u64, y: f32) -> Arc<FakeElement> {
    FakeElement::new(id, Rect::new(0.0, y, 300.0, 100.0)).into_ref()
}

fn build(matcher: &CachedMatcher) -> (AltarUnit, Arc<FakeElement>, Arc<FakeElement>) {
    let top = element(10, 0.0);
    let bottom = element(20, 120.0);
    let top_button = element(11, 0.0);
    let bottom_button = element(21, 120.0);
    let unit = AltarUnit::new(
        AltarKind::Exarch,
        SidePanel::from_panel_text(
            "Map boss gains:\n{Final Boss drops 2 additional Exalted Orbs}\n{Cannot be Stunned}",
            Some(top as ElementRef),
            matcher,
        ),
        SidePanel::from_panel_text(
            "Player gains:\n{Items dropped by Monsters have 10% chance to be Duplicated}\n{25% reduced Defences}",
            Some(bottom as ElementRef),
            matcher,
        ),
    )
    .with_buttons(
        Some(Arc::clone(&top_button) as ElementRef),
        Some(Arc::clone(&bottom_button) as ElementRef),
    );
    (unit, top_button, bottom_button)
}

#[test]
fn panels_are_parsed_into_slots() {
    let m = matcher();
    let (unit, _, _) = build(&m);
    let top = unit.panel(altar_core::Side::Top);
    assert_eq!(top.upside_count(), 1);
    assert_eq!(
        top.downsides()[0].as_ref().map(|r| r.as_str()),
        Some("Boss|Cannot be Stunned")
    );
    assert!(!top.has_unmatched());
    assert_eq!(unit.id().top, 10);
    assert_eq!(unit.id().bottom, 20);
}

#[test]
fn weight_cache_computes_once_per_ttl_window() {
    let m = matcher();
    let (mut unit, _, _) = build(&m);
    let tiers = TierTable::from_catalog(m.matcher().catalog());
    let clock = ManualClock::new(0);
    let calls = Cell::new(0);
    let counted = |u: &AltarUnit| {
        calls.set(calls.get() + 1);
        compute_unit_weights(u, &tiers)
    };

    let first = unit.weights_with(&clock, counted).expect("weights");
    clock.advance(500);
    let second = unit.weights_with(&clock, counted).expect("weights");
    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);
    assert_eq!(first.top.upside_total, 30);
    assert_eq!(first.top.downside_total, 2);

    clock.advance(500);
    unit.weights_with(&clock, counted).expect("weights");
    assert_eq!(calls.get(), 2, "expired after 1000ms");

    unit.invalidate_caches();
    unit.weights_with(&clock, counted).expect("weights");
    assert_eq!(calls.get(), 3, "explicit invalidation");

    let (replacement, _, _) = build(&m);
    unit.replace_panels(
        replacement.panel(altar_core::Side::Top).clone(),
        replacement.panel(altar_core::Side::Bottom).clone(),
    );
    unit.weights_with(&clock, counted).expect("weights");
    assert_eq!(calls.get(), 4, "structural change");
}

#[test]
fn failed_computation_is_not_cached() {
    let m = matcher();
    let unit = AltarUnit::new(
        AltarKind::Eater,
        SidePanel::new(Some(element(1, 0.0) as ElementRef)),
        SidePanel::new(None),
    );
    let tiers = TierTable::from_catalog(m.matcher().catalog());
    let clock = ManualClock::new(0);
    assert!(unit.weights(&tiers, &clock).is_err());
    assert!(unit.weights(&tiers, &clock).is_err());
}

#[test]
fn concurrent_callers_share_one_computation() {
    let m = matcher();
    let (unit, _, _) = build(&m);
    let unit = Arc::new(unit);
    let tiers = Arc::new(TierTable::from_catalog(m.matcher().catalog()));
    let clock = Arc::new(ManualClock::new(42));
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let (unit, tiers, clock, calls) = (
                Arc::clone(&unit),
                Arc::clone(&tiers),
                Arc::clone(&clock),
                Arc::clone(&calls),
            );
            std::thread::spawn(move || {
                unit.weights_with(clock.as_ref(), |u| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    compute_unit_weights(u, &tiers)
                })
            })
        })
        .collect();

    for h in handles {
        assert!(h.join().expect("thread").is_ok());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn validity_is_cached_until_ttl_or_invalidation() {
    let m = matcher();
    let (unit, top_button, _) = build(&m);
    let unit = unit.with_cache_ttl(Duration::from_millis(250));
    let clock = ManualClock::new(0);

    assert!(unit.is_valid(&clock));
    top_button.set_valid(false);
    assert!(unit.is_valid(&clock), "still cached");

    clock.advance(250);
    assert!(!unit.is_valid(&clock));

    top_button.set_valid(true);
    assert!(!unit.is_valid(&clock), "cached again");
    unit.invalidate_caches();
    assert!(unit.is_valid(&clock));
}
