use altar_core::ScreenElement;

use crate::catalog::CanonicalRef;
use crate::matcher::ModMatch;
use crate::normalize::clean;

/// A modifier panel split into its directional header and the lines under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelText {
    pub header: String,
    pub candidates: Vec<String>,
}

/// First non-empty line is the header, every later non-empty line a candidate (order kept).
///
/// A line counts as empty when nothing is left after [`clean`]; kept lines are returned raw
/// (trimmed) so they can be shown verbatim if they fail to match.
pub fn extract_mods_from_text(panel_text: &str) -> PanelText {
    let mut lines = panel_text
        .lines()
        .map(str::trim)
        .filter(|line| !clean(line).is_empty())
        .map(str::to_string);

    let header = lines.next().unwrap_or_default();
    PanelText {
        header,
        candidates: lines.collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub beneficial: Vec<CanonicalRef>,
    pub harmful: Vec<CanonicalRef>,
    pub unmatched: Vec<String>,
}

impl Classified {
    pub fn has_unmatched(&self) -> bool {
        !self.unmatched.is_empty()
    }
}

/// Runs every candidate through `match_fn(line, header)`. Nothing is dropped: a line either lands
/// in one of the reference lists or in `unmatched`.
pub fn classify<F>(candidates: &[String], header: &str, mut match_fn: F) -> Classified
where
    F: FnMut(&str, &str) -> Option<ModMatch>,
{
    let mut out = Classified::default();
    for line in candidates {
        match match_fn(line, header) {
            Some(m) if m.is_beneficial() => out.beneficial.push(m.canonical),
            Some(m) => out.harmful.push(m.canonical),
            None => out.unmatched.push(line.clone()),
        }
    }
    out
}

/// The element's own text, or its children's texts one per line when it has none.
pub fn panel_text_of(element: &dyn ScreenElement) -> String {
    if let Some(text) = element.text() {
        return text;
    }
    element
        .children()
        .iter()
        .filter_map(|child| child.text())
        .collect::<Vec<_>>()
        .join("\n")
}
