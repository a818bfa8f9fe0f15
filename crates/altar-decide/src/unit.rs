use core::fmt;
use std::time::Duration;

use altar_core::{is_live, AltarResult, Clock, ElementRef, ScreenElement, Side, TtlCache};
use altar_mods::{
    classify, extract_mods_from_text, panel_text_of, CachedMatcher, CanonicalRef, Classified,
    ModKind,
};
use serde::{Deserialize, Serialize};

use crate::weights::{compute_unit_weights, TierTable, WeightSet, SLOTS};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(1000);

/// Which of the two recurring events put the altar on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltarKind {
    Exarch,
    Eater,
}

impl fmt::Display for AltarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AltarKind::Exarch => "exarch",
            AltarKind::Eater => "eater",
        })
    }
}

/// Identity of an altar: the pair of panel elements it was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    pub top: u64,
    pub bottom: u64,
}

impl UnitId {
    pub fn of(top: &dyn ScreenElement, bottom: &dyn ScreenElement) -> Self {
        Self {
            top: top.id(),
            bottom: bottom.id(),
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}/{:#x}", self.top, self.bottom)
    }
}

/// One side of an altar: 8 upside and 8 downside slots plus whatever could not be matched.
#[derive(Debug, Clone, Default)]
pub struct SidePanel {
    upsides: [Option<CanonicalRef>; SLOTS],
    downsides: [Option<CanonicalRef>; SLOTS],
    unmatched: Vec<String>,
    element: Option<ElementRef>,
}

impl SidePanel {
    pub fn new(element: Option<ElementRef>) -> Self {
        Self {
            element,
            ..Self::default()
        }
    }

    /// Fills slots in order. References beyond the eighth of a kind are kept as unmatched
    /// content rather than dropped.
    pub fn from_classified(classified: Classified, element: Option<ElementRef>) -> Self {
        let mut panel = Self::new(element);
        panel.unmatched = classified.unmatched;

        let mut fill = |slots: &mut [Option<CanonicalRef>; SLOTS], refs: Vec<CanonicalRef>| {
            for (i, reference) in refs.into_iter().enumerate() {
                match slots.get_mut(i) {
                    Some(slot) => *slot = Some(reference),
                    None => {
                        tracing::warn!(
                            modifier = %reference,
                            "more than {SLOTS} modifiers of one kind on a panel"
                        );
                        panel.unmatched.push(reference.to_string());
                    }
                }
            }
        };
        let mut upsides: [Option<CanonicalRef>; SLOTS] = Default::default();
        let mut downsides: [Option<CanonicalRef>; SLOTS] = Default::default();
        fill(&mut upsides, classified.beneficial);
        fill(&mut downsides, classified.harmful);
        panel.upsides = upsides;
        panel.downsides = downsides;
        panel
    }

    /// Parses raw panel text (header line first) through the cached matcher.
    pub fn from_panel_text(
        text: &str,
        element: Option<ElementRef>,
        matcher: &CachedMatcher,
    ) -> Self {
        let parsed = extract_mods_from_text(text);
        let classified = classify(&parsed.candidates, &parsed.header, |line, header| {
            matcher.match_raw(line, header)
        });
        Self::from_classified(classified, element)
    }

    /// Reads the text straight off the element (or its children).
    pub fn from_element(element: ElementRef, matcher: &CachedMatcher) -> Self {
        let text = panel_text_of(element.as_ref());
        Self::from_panel_text(&text, Some(element), matcher)
    }

    pub fn upsides(&self) -> &[Option<CanonicalRef>; SLOTS] {
        &self.upsides
    }

    pub fn downsides(&self) -> &[Option<CanonicalRef>; SLOTS] {
        &self.downsides
    }

    pub fn slots(&self, kind: ModKind) -> &[Option<CanonicalRef>; SLOTS] {
        match kind {
            ModKind::Beneficial => &self.upsides,
            ModKind::Harmful => &self.downsides,
        }
    }

    pub fn upside_count(&self) -> usize {
        self.upsides.iter().flatten().count()
    }

    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    pub fn has_unmatched(&self) -> bool {
        !self.unmatched.is_empty()
    }

    pub fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }
}

/// One altar decision instance.
///
/// Panels change only through `&mut self`, which also drops both caches. Everything else is
/// `&self`, so a unit can be shared between scan and render tasks.
#[derive(Debug)]
pub struct AltarUnit {
    id: UnitId,
    kind: AltarKind,
    top: SidePanel,
    bottom: SidePanel,
    top_button: Option<ElementRef>,
    bottom_button: Option<ElementRef>,
    validity: TtlCache<bool>,
    weights: TtlCache<WeightSet>,
}

impl AltarUnit {
    /// The id is taken from the panel elements; a missing element counts as id 0.
    pub fn new(kind: AltarKind, top: SidePanel, bottom: SidePanel) -> Self {
        let element_id = |panel: &SidePanel| panel.element().map_or(0, |e| e.id());
        Self {
            id: UnitId {
                top: element_id(&top),
                bottom: element_id(&bottom),
            },
            kind,
            top,
            bottom,
            top_button: None,
            bottom_button: None,
            validity: TtlCache::new(DEFAULT_CACHE_TTL),
            weights: TtlCache::new(DEFAULT_CACHE_TTL),
        }
    }

    pub fn with_buttons(mut self, top: Option<ElementRef>, bottom: Option<ElementRef>) -> Self {
        self.top_button = top;
        self.bottom_button = bottom;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.validity = TtlCache::new(ttl);
        self.weights = TtlCache::new(ttl);
        self
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn kind(&self) -> AltarKind {
        self.kind
    }

    pub fn panel(&self, side: Side) -> &SidePanel {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn button(&self, side: Side) -> Option<&ElementRef> {
        match side {
            Side::Top => self.top_button.as_ref(),
            Side::Bottom => self.bottom_button.as_ref(),
        }
    }

    /// Installs freshly scanned panels. The unit keeps its identity.
    pub fn replace_panels(&mut self, top: SidePanel, bottom: SidePanel) {
        self.top = top;
        self.bottom = bottom;
        self.invalidate_caches();
    }

    pub fn set_button(&mut self, side: Side, button: Option<ElementRef>) {
        match side {
            Side::Top => self.top_button = button,
            Side::Bottom => self.bottom_button = button,
        }
        self.invalidate_caches();
    }

    pub fn invalidate_caches(&self) {
        self.validity.invalidate();
        self.weights.invalidate();
    }

    /// Both panels and both buttons present, valid, and on screen.
    pub fn is_valid(&self, clock: &dyn Clock) -> bool {
        self.validity.get_or_insert_with(clock.now_ms(), || {
            Side::BOTH.into_iter().all(|side| {
                let panel_live = self
                    .panel(side)
                    .element()
                    .is_some_and(|e| is_live(e.as_ref()));
                let button_live = self.button(side).is_some_and(|b| is_live(b.as_ref()));
                panel_live && button_live
            })
        })
    }

    /// The cache is not keyed on `tiers`: after swapping the tier table (a config reload), call
    /// [`invalidate_caches`](Self::invalidate_caches) or
    /// [`AltarRepository::invalidate_all`](crate::AltarRepository::invalidate_all), otherwise
    /// weights from the old table are served until the TTL runs out.
    pub fn weights(&self, tiers: &TierTable, clock: &dyn Clock) -> AltarResult<WeightSet> {
        self.weights_with(clock, |unit| compute_unit_weights(unit, tiers))
    }

    /// Cached weights, computing with `compute` only on a miss.
    pub fn weights_with(
        &self,
        clock: &dyn Clock,
        compute: impl FnOnce(&AltarUnit) -> AltarResult<WeightSet>,
    ) -> AltarResult<WeightSet> {
        self.weights.get_or_try_insert_with(clock.now_ms(), || {
            tracing::trace!(unit = %self.id, "weight cache miss");
            compute(self)
        })
    }
}
