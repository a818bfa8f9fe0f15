use std::sync::Arc;

use altar_core::{FakeElement, Rect};
use altar_mods::{
    classify, extract_mods_from_text, panel_text_of, ModCatalog, ModMatcher,
};

const PANEL: &str = "\
<valuedefault>{Map boss gains:}

<enchanted>{40% increased Damage}
   <enchanted>{Cannot be Stunned}
<rgb(0,0,0)>{}
{Final Boss drops 2 additional Divine Orbs}
{Some modifier nobody has heard of}
";

#[test]
fn extract_splits_header_and_candidates_in_order() {
    let panel = extract_mods_from_text(PANEL);
    assert_eq!(panel.header, "<valuedefault>{Map boss gains:}");
    assert_eq!(
        panel.candidates,
        vec![
            "<enchanted>{40% increased Damage}",
            "<enchanted>{Cannot be Stunned}",
            "{Final Boss drops 2 additional Divine Orbs}",
            "{Some modifier nobody has heard of}",
        ]
    );
}

#[test]
fn extract_handles_empty_text() {
    let panel = extract_mods_from_text("\n   \n");
    assert!(panel.header.is_empty());
    assert!(panel.candidates.is_empty());
}

#[test]
fn classify_keeps_every_candidate() {
    let matcher = ModMatcher::new(Arc::new(ModCatalog::builtin()));
    let panel = extract_mods_from_text(PANEL);
    let out = classify(&panel.candidates, &panel.header, |line, header| {
        matcher.match_mod(&altar_mods::clean(line), header)
    });

    let harmful: Vec<&str> = out.harmful.iter().map(|r| r.as_str()).collect();
    assert_eq!(harmful, vec!["Boss|#% increased Damage", "Boss|Cannot be Stunned"]);
    assert_eq!(out.beneficial.len(), 1);
    assert_eq!(out.beneficial[0].id(), "Final Boss drops # additional Divine Orbs");
    assert_eq!(out.unmatched, vec!["{Some modifier nobody has heard of}"]);
    assert!(out.has_unmatched());
    assert_eq!(
        out.beneficial.len() + out.harmful.len() + out.unmatched.len(),
        panel.candidates.len()
    );
}

#[test]
fn panel_text_falls_back_to_children() {
    let parent = FakeElement::new(1, Rect::new(0.0, 0.0, 10.0, 10.0)).into_ref();
    for (id, line) in [(2, "Player gains:"), (3, "#% reduced Defences")] {
        FakeElement::adopt(
            &parent,
            FakeElement::new(id, Rect::new(0.0, 0.0, 1.0, 1.0))
                .with_text(line)
                .into_ref(),
        );
    }
    assert_eq!(panel_text_of(parent.as_ref()), "Player gains:\n#% reduced Defences");

    let leaf = FakeElement::new(4, Rect::new(0.0, 0.0, 1.0, 1.0)).with_text("own");
    assert_eq!(panel_text_of(&leaf), "own");
}
