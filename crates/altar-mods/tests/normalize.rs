use altar_mods::{clean, TextNormalizer};
use proptest::prelude::*;

#[test]
fn clean_strips_tags_braces_and_decoration() {
    assert_eq!(
        clean("<valuedefault>{Final Boss drops} <enchanted>{2}  additional\tDivine Orbs"),
        "Final Boss drops 2 additional Divine Orbs"
    );
    assert_eq!(clean("  • Map boss gains: ★ "), "Map boss gains:");
    assert_eq!(clean("<rgb(255,0,0)>"), "");
    assert_eq!(clean(""), "");
}

#[test]
fn clean_leaves_unclosed_brackets_alone() {
    assert_eq!(clean("a < b"), "a < b");
}

#[test]
fn normalizer_memoizes_by_exact_input() {
    let normalizer = TextNormalizer::new();
    assert!(normalizer.is_empty());

    let a = normalizer.clean("<red>{Cannot be Stunned}");
    let b = normalizer.clean("<red>{Cannot be Stunned}");
    assert_eq!(a, "Cannot be Stunned");
    assert_eq!(a, b);
    assert_eq!(normalizer.len(), 1);

    normalizer.clean("Cannot be Stunned");
    assert_eq!(normalizer.len(), 2);
}

proptest! {
    #[test]
    fn clean_is_idempotent(raw in ".{0,64}") {
        let once = clean(&raw);
        prop_assert_eq!(clean(&once), once);
    }

    #[test]
    fn clean_is_idempotent_on_markup_heavy_text(raw in "[a-zA-Z0-9<>{}•★ \t\n%#]{0,64}") {
        let once = clean(&raw);
        prop_assert_eq!(clean(&once), once.clone());
        prop_assert!(!once.contains('{') && !once.contains('}'), "output still contains braces: {:?}", once);
        prop_assert_eq!(once.trim(), once.as_str());
    }
}
