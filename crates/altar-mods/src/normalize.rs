use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

static STYLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("style tag pattern is valid"));

/// Characters the game wraps around modifier text purely for decoration.
const DECORATION: &[char] = &['{', '}', '•', '◆', '►', '»', '«', '★'];

/// Strips `<...>` style tags, braces, and decoration glyphs, then collapses whitespace.
///
/// Idempotent: any `<` left after tag removal has no `>` after it, and the later steps only
/// delete characters.
pub fn clean(raw: &str) -> String {
    let untagged = STYLE_TAG.replace_all(raw, " ");
    let undecorated: String = untagged
        .chars()
        .map(|c| if DECORATION.contains(&c) { ' ' } else { c })
        .collect();
    undecorated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`clean`] memoized by exact input. Grows with the distinct texts seen in a session.
#[derive(Debug, Default)]
pub struct TextNormalizer {
    memo: Mutex<HashMap<String, String>>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clean(&self, raw: &str) -> String {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = memo.get(raw) {
            return hit.clone();
        }
        let cleaned = clean(raw);
        memo.insert(raw.to_string(), cleaned.clone());
        cleaned
    }

    pub fn len(&self) -> usize {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
