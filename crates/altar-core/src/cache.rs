use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Stamped<T> {
    value: T,
    at_ms: u64,
}

/// Single-value cache with a time-to-live.
///
/// The lock covers exactly "check -> maybe recompute -> store", so two tasks racing on the same
/// cache compute at most once per TTL window. Nothing else in the pipeline runs under it.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl_ms: u64,
    slot: Mutex<Option<Stamped<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: ttl.as_millis() as u64,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    fn fresh(&self, entry: &Stamped<T>, now_ms: u64) -> bool {
        now_ms.saturating_sub(entry.at_ms) < self.ttl_ms
    }

    /// Returns the cached value if it is still within its TTL.
    pub fn get(&self, now_ms: u64) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|e| self.fresh(e, now_ms))
            .map(|e| e.value.clone())
    }

    pub fn get_or_insert_with(&self, now_ms: u64, compute: impl FnOnce() -> T) -> T {
        match self.get_or_try_insert_with(now_ms, || Ok::<T, core::convert::Infallible>(compute()))
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Failed computations are not cached; the next call tries again.
    pub fn get_or_try_insert_with<E>(
        &self,
        now_ms: u64,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref().filter(|e| self.fresh(e, now_ms)) {
            return Ok(entry.value.clone());
        }
        let value = compute()?;
        *slot = Some(Stamped {
            value: value.clone(),
            at_ms: now_ms,
        });
        Ok(value)
    }

    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        self.get(now_ms).is_some()
    }
}
