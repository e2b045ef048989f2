use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

#[test]
fn test_lazy_value_produces_once() {
    let calls = AtomicUsize::new(0);
    let lazy = LazyValue::new(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        "postgres://localhost:5432/db".to_string()
    });

    assert!(!lazy.is_loaded());
    assert_eq!(lazy.get_if_loaded(), None);

    assert_eq!(lazy.get(), "postgres://localhost:5432/db");
    assert_eq!(lazy.get(), "postgres://localhost:5432/db");

    assert!(lazy.is_loaded());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_value_is_loaded_does_not_load() {
    let calls = AtomicUsize::new(0);
    let lazy = LazyValue::new(|| calls.fetch_add(1, Ordering::SeqCst));
    for _ in 0..10 {
        assert!(!lazy.is_loaded());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(lazy.into_inner(), None);
}

#[test]
fn test_lazy_value_concurrent_first_access() {
    let calls = AtomicUsize::new(0);
    let lazy = LazyValue::new(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(10));
        42u64
    });
    let barrier = Barrier::new(16);

    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                barrier.wait();
                assert_eq!(*lazy.get(), 42);
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_value_retries_after_error() {
    let attempts = AtomicUsize::new(0);
    let lazy = LazyValue::fallible(|| {
        if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            Err("transient")
        } else {
            Ok(7)
        }
    });

    assert_eq!(lazy.try_get(), Err("transient"));
    assert!(!lazy.is_loaded());
    assert_eq!(lazy.try_get(), Ok(&7));
    assert_eq!(lazy.try_get(), Ok(&7));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_lazy_value_retries_after_panic() {
    let attempts = AtomicUsize::new(0);
    let lazy = LazyValue::new(|| {
        if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first load fails");
        }
        "ok"
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| *lazy.get()));
    assert!(result.is_err());
    assert!(!lazy.is_loaded());

    assert_eq!(*lazy.get(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_lazy_value_default_and_debug() {
    let lazy: LazyValue<Vec<u8>> = LazyValue::default();
    assert_eq!(format!("{lazy:?}"), "LazyValue { value: <unloaded> }");
    assert!(lazy.get().is_empty());
    assert_eq!(format!("{lazy:?}"), "LazyValue { value: [] }");
}

#[test]
fn test_lazy_value_registry_initialized_once() {
    // A service registry built on first lookup, shared by many callers.
    let builds = AtomicUsize::new(0);
    let registry = LazyValue::new(|| {
        builds.fetch_add(1, Ordering::SeqCst);
        HashMap::from([("database", 0u32), ("cache", 0), ("queue", 0)])
    });

    thread::scope(|s| {
        for _ in 0..5 {
            s.spawn(|| assert!(registry.get().contains_key("queue")));
        }
    });
    assert_eq!(registry.get().get("cache"), Some(&0));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_keyed_cache_loads_each_key_once() {
    let calls = AtomicUsize::new(0);
    let cache = KeyedLazyCache::new(|key: &String| {
        calls.fetch_add(1, Ordering::SeqCst);
        format!("value-{key}")
    });

    assert_eq!(cache.get("user:1"), "value-user:1");
    assert_eq!(cache.get("user:1"), "value-user:1");
    assert_eq!(cache.get("user:2"), "value-user:2");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);

    let stats = cache.stats();
    assert_eq!(stats.loads, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

#[test]
fn test_keyed_cache_peek_and_invalidate() {
    let calls = AtomicUsize::new(0);
    let cache = KeyedLazyCache::new(|key: &u32| {
        calls.fetch_add(1, Ordering::SeqCst);
        key * 10
    });

    assert_eq!(cache.peek(&3), None);
    assert!(!cache.contains_key(&3));
    assert_eq!(cache.get(&3), 30);
    assert_eq!(cache.peek(&3), Some(30));

    assert_eq!(cache.invalidate(&3), Some(30));
    assert_eq!(cache.invalidate(&3), None);
    assert_eq!(cache.get(&3), 30);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_keyed_cache_no_negative_caching() {
    let calls = AtomicUsize::new(0);
    let cache = KeyedLazyCache::fallible(|key: &String| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(format!("backend unavailable for {key}"))
        } else {
            Ok(key.len())
        }
    });

    assert_eq!(cache.try_get("abc"), Err("backend unavailable for abc".to_string()));
    assert!(!cache.contains_key("abc"));
    assert_eq!(cache.try_get("abc"), Ok(3));
    assert_eq!(cache.try_get("abc"), Ok(3));

    let stats = cache.stats();
    assert_eq!(stats.load_failures, 1);
    assert_eq!(stats.loads, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_keyed_cache_panicking_loader_leaves_cache_usable() {
    let cache = KeyedLazyCache::new(|key: &i32| {
        assert!(*key >= 0, "negative key");
        *key
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cache.get(&-1)));
    assert!(result.is_err());
    assert!(!cache.contains_key(&-1));
    assert_eq!(cache.get(&5), 5);

    // The panicking lookup recorded its miss and nothing else.
    let stats = cache.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.loads, 1);
    assert_eq!(stats.load_failures, 0);
    assert_eq!(stats.hits, 0);
}

#[test]
fn test_keyed_cache_preload() {
    let calls = AtomicUsize::new(0);
    let cache = KeyedLazyCache::new(|key: &u8| {
        calls.fetch_add(1, Ordering::SeqCst);
        u16::from(*key) * 2
    });
    cache.get(&1);
    cache.preload([1, 2, 3, 3]);
    assert_eq!(cache.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_keyed_cache_debug() {
    let cache = KeyedLazyCache::new(|key: &u8| *key);
    cache.get(&1);
    let debug = format!("{cache:?}");
    assert!(debug.starts_with("KeyedLazyCache { len: 1"));
}
