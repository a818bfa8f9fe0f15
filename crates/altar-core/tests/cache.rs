use std::cell::Cell;
use std::time::Duration;

use altar_core::{Clock, ManualClock, TtlCache};

#[test]
fn ttl_cache_hits_within_ttl_and_recomputes_after() {
    let clock = ManualClock::new(10_000);
    let cache = TtlCache::<u32>::new(Duration::from_millis(1000));
    let calls = Cell::new(0u32);
    let compute = || {
        calls.set(calls.get() + 1);
        calls.get()
    };

    assert_eq!(cache.get_or_insert_with(clock.now_ms(), compute), 1);
    clock.advance(999);
    assert_eq!(cache.get_or_insert_with(clock.now_ms(), compute), 1);
    assert_eq!(calls.get(), 1);

    clock.advance(1);
    assert!(!cache.is_fresh(clock.now_ms()));
    assert_eq!(cache.get_or_insert_with(clock.now_ms(), compute), 2);
    assert_eq!(calls.get(), 2);
}

#[test]
fn ttl_cache_invalidate_forces_recompute() {
    let clock = ManualClock::new(0);
    let cache = TtlCache::<&'static str>::new(Duration::from_millis(1000));

    assert_eq!(cache.get_or_insert_with(clock.now_ms(), || "first"), "first");
    cache.invalidate();
    assert_eq!(cache.get(clock.now_ms()), None);
    assert_eq!(cache.get_or_insert_with(clock.now_ms(), || "second"), "second");
}

#[test]
fn ttl_cache_does_not_store_failures() {
    let cache = TtlCache::<u8>::new(Duration::from_millis(1000));

    let err: Result<u8, &str> = cache.get_or_try_insert_with(5, || Err("nope"));
    assert_eq!(err, Err("nope"));
    assert_eq!(cache.get(5), None);

    let ok: Result<u8, &str> = cache.get_or_try_insert_with(5, || Ok(7));
    assert_eq!(ok, Ok(7));
    assert_eq!(cache.get(6), Some(7));
}
