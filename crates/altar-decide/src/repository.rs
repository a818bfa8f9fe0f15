use std::collections::HashSet;

use crate::unit::{AltarUnit, UnitId};

/// Active altars, at most one per element pair.
#[derive(Debug, Default)]
pub struct AltarRepository {
    units: Vec<AltarUnit>,
}

impl AltarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and drops `unit`) when an altar with the same identity is already held.
    pub fn add(&mut self, unit: AltarUnit) -> bool {
        if self.contains(unit.id()) {
            return false;
        }
        self.units.push(unit);
        true
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.iter().any(|u| u.id() == id)
    }

    pub fn get(&self, id: UnitId) -> Option<&AltarUnit> {
        self.units.iter().find(|u| u.id() == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut AltarUnit> {
        self.units.iter_mut().find(|u| u.id() == id)
    }

    /// Caches are invalidated before the unit is handed back.
    pub fn remove(&mut self, id: UnitId) -> Option<AltarUnit> {
        let idx = self.units.iter().position(|u| u.id() == id)?;
        let unit = self.units.remove(idx);
        unit.invalidate_caches();
        Some(unit)
    }

    /// Drops every altar whose element pair was not seen in the latest scan. Returns how many
    /// were removed.
    pub fn retain_observed(&mut self, observed: impl IntoIterator<Item = UnitId>) -> usize {
        let observed: HashSet<UnitId> = observed.into_iter().collect();
        let before = self.units.len();
        self.units.retain(|u| {
            let keep = observed.contains(&u.id());
            if !keep {
                tracing::debug!(unit = %u.id(), "altar left the screen");
                u.invalidate_caches();
            }
            keep
        });
        before - self.units.len()
    }

    /// Drops every cached validity and weight result, e.g. after the tier table changed.
    pub fn invalidate_all(&self) {
        for unit in &self.units {
            unit.invalidate_caches();
        }
    }

    pub fn clear(&mut self) {
        for unit in &self.units {
            unit.invalidate_caches();
        }
        self.units.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &AltarUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
