//! Tier lookup and per-side weight aggregation.

use std::collections::HashMap;

use altar_core::{AltarError, AltarResult, Side};
use altar_mods::{CanonicalRef, ModCatalog, ModKind};
use serde::Serialize;

use crate::unit::AltarUnit;

/// Slots per kind on one side of an altar.
pub const SLOTS: usize = 8;

/// Configured tier per modifier. Keys are either `Target|id` or a bare legacy id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierTable {
    tiers: HashMap<String, i32>,
}

impl TierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `Target|id -> default_tier` for every catalog descriptor.
    pub fn from_catalog(catalog: &ModCatalog) -> Self {
        let tiers = catalog
            .descriptors()
            .map(|(_, d)| (d.canonical().to_string(), d.default_tier))
            .collect();
        Self { tiers }
    }

    /// Qualified keys are normalized (`boss|x` becomes `Boss|x`) before insertion.
    pub fn set(&mut self, key: &str, tier: i32) {
        let key = key.trim();
        let key = match CanonicalRef::parse(key) {
            Some(qualified) => qualified.to_string(),
            None => key.to_string(),
        };
        self.tiers.insert(key, tier);
    }

    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a i32)>,
    ) -> Self {
        for (key, tier) in overrides {
            self.set(key, *tier);
        }
        self
    }

    /// Blank refs weigh 0. A qualified ref only ever reads its own qualified key (0 when absent),
    /// so a bare entry can never leak a weight onto a different target. Unconfigured bare ids
    /// weigh 1.
    pub fn tier(&self, reference: &str) -> i32 {
        let reference = reference.trim();
        if reference.is_empty() {
            return 0;
        }
        match CanonicalRef::parse(reference) {
            Some(qualified) => self.tiers.get(qualified.as_str()).copied().unwrap_or(0),
            None => self.tiers.get(reference).copied().unwrap_or(1),
        }
    }

    /// Totals are summed as `i64`; a configured tier can be anything up to `i32::MAX`.
    pub fn weigh_beneficial<S: AsRef<str>>(&self, ids: &[S]) -> i64 {
        self.weigh(ids)
    }

    pub fn weigh_harmful<S: AsRef<str>>(&self, ids: &[S]) -> i64 {
        self.weigh(ids)
    }

    fn weigh<S: AsRef<str>>(&self, ids: &[S]) -> i64 {
        ids.iter().map(|id| i64::from(self.tier(id.as_ref()))).sum()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// `beneficial / harmful` rounded to two decimals.
///
/// With no harmful weight the ratio is `f64::INFINITY` when there is any upside and `0.0`
/// otherwise.
pub fn side_ratio(beneficial: i64, harmful: i64) -> f64 {
    if harmful <= 0 {
        return if beneficial > 0 { f64::INFINITY } else { 0.0 };
    }
    let raw = beneficial as f64 / harmful as f64;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SideWeights {
    pub upside: [i32; SLOTS],
    pub downside: [i32; SLOTS],
    pub upside_total: i64,
    pub downside_total: i64,
    pub ratio: f64,
    /// Upside slots holding a matched modifier, whatever their weight.
    pub upside_count: usize,
}

impl SideWeights {
    pub fn from_slots(upside: [i32; SLOTS], downside: [i32; SLOTS], upside_count: usize) -> Self {
        let total = |slots: &[i32; SLOTS]| slots.iter().copied().map(i64::from).sum();
        Self::new(upside, downside, total(&upside), total(&downside), upside_count)
    }

    pub fn new(
        upside: [i32; SLOTS],
        downside: [i32; SLOTS],
        upside_total: i64,
        downside_total: i64,
        upside_count: usize,
    ) -> Self {
        Self {
            upside,
            downside,
            upside_total,
            downside_total,
            ratio: side_ratio(upside_total, downside_total),
            upside_count,
        }
    }

    pub fn max_downside(&self) -> i32 {
        self.downside.iter().copied().max().unwrap_or(0)
    }
}

/// Addresses one of the four slot arrays of a [`WeightSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    TopUpside,
    TopDownside,
    BottomUpside,
    BottomDownside,
}

impl SlotKey {
    pub const ALL: [SlotKey; 4] = [
        SlotKey::TopUpside,
        SlotKey::TopDownside,
        SlotKey::BottomUpside,
        SlotKey::BottomDownside,
    ];

    pub fn new(side: Side, kind: ModKind) -> Self {
        match (side, kind) {
            (Side::Top, ModKind::Beneficial) => SlotKey::TopUpside,
            (Side::Top, ModKind::Harmful) => SlotKey::TopDownside,
            (Side::Bottom, ModKind::Beneficial) => SlotKey::BottomUpside,
            (Side::Bottom, ModKind::Harmful) => SlotKey::BottomDownside,
        }
    }

    pub fn side(self) -> Side {
        match self {
            SlotKey::TopUpside | SlotKey::TopDownside => Side::Top,
            SlotKey::BottomUpside | SlotKey::BottomDownside => Side::Bottom,
        }
    }

    pub fn kind(self) -> ModKind {
        match self {
            SlotKey::TopUpside | SlotKey::BottomUpside => ModKind::Beneficial,
            SlotKey::TopDownside | SlotKey::BottomDownside => ModKind::Harmful,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeightSet {
    pub top: SideWeights,
    pub bottom: SideWeights,
}

impl WeightSet {
    pub fn side(&self, side: Side) -> &SideWeights {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn slots(&self, key: SlotKey) -> &[i32; SLOTS] {
        match key {
            SlotKey::TopUpside => &self.top.upside,
            SlotKey::TopDownside => &self.top.downside,
            SlotKey::BottomUpside => &self.bottom.upside,
            SlotKey::BottomDownside => &self.bottom.downside,
        }
    }
}

/// Weighs both sides slot by slot.
///
/// Both panels must still have their screen element: a unit whose panel vanished is not
/// something we can weigh or click.
pub fn compute_unit_weights(unit: &AltarUnit, tiers: &TierTable) -> AltarResult<WeightSet> {
    let mut set = WeightSet::default();
    for side in Side::BOTH {
        let panel = unit.panel(side);
        if panel.element().is_none() {
            return Err(AltarError::MissingElement { side });
        }

        let per_slot = |slots: &[Option<CanonicalRef>; SLOTS]| {
            let mut out = [0; SLOTS];
            for (weight, slot) in out.iter_mut().zip(slots) {
                if let Some(reference) = slot {
                    *weight = tiers.tier(reference.as_str());
                }
            }
            out
        };
        let present = |slots: &[Option<CanonicalRef>; SLOTS]| -> Vec<CanonicalRef> {
            slots.iter().flatten().cloned().collect()
        };

        let weights = SideWeights::new(
            per_slot(panel.upsides()),
            per_slot(panel.downsides()),
            tiers.weigh_beneficial(&present(panel.upsides())),
            tiers.weigh_harmful(&present(panel.downsides())),
            panel.upside_count(),
        );
        match side {
            Side::Top => set.top = weights,
            Side::Bottom => set.bottom = weights,
        }
    }
    tracing::trace!(unit = %unit.id(), "computed altar weights");
    Ok(set)
}
