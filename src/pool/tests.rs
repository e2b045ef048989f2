use super::*;
use crate::config::PoolConfig;
use crate::error::ConfigError;
use std::io::Write;
use std::thread;

#[test]
fn test_buffer_append_truncates_at_capacity() {
    let mut buf = Buffer::with_capacity(8);
    assert_eq!(buf.append(b"hello"), 5);
    assert_eq!(buf.append(b"world"), 3);
    assert_eq!(buf.as_bytes(), b"hellowor");
    assert_eq!(buf.remaining(), 0);
    assert_eq!(buf.append(b"!"), 0);

    buf.reset();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), 8);
}

#[test]
fn test_buffer_io_write() {
    let mut buf = Buffer::with_capacity(4);
    write!(buf, "ab").unwrap();
    assert_eq!(buf.as_bytes(), b"ab");

    let err = buf.write_all(b"cde").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::WriteZero);
    assert_eq!(buf.as_bytes(), b"abcd");
}

#[test]
fn test_pool_reuses_returned_object() {
    let pool: ObjectPool<Buffer> = ObjectPool::default();
    {
        let mut buf = pool.get();
        buf.append(b"hello");
        assert_eq!(buf.len(), 5);
    }
    assert_eq!(pool.idle_count(), 1);

    let buf = pool.get();
    assert!(buf.is_empty(), "returned objects are recycled");
    assert_eq!(buf.capacity(), DEFAULT_BUFFER_CAPACITY);
    drop(buf);

    let stats = pool.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.reused, 1);
    assert_eq!(stats.recycled, 2);
}

#[test]
fn test_pool_discards_beyond_max_idle() {
    let config = PoolConfig {
        max_idle: 2,
        prefill: 0,
    };
    let pool = ObjectPool::with_config(Vec::<u8>::new, config).unwrap();

    let held: Vec<_> = (0..3).map(|_| pool.get()).collect();
    drop(held);

    assert_eq!(pool.idle_count(), 2);
    let stats = pool.stats();
    assert_eq!(stats.created, 3);
    assert_eq!(stats.recycled, 2);
    assert_eq!(stats.discarded, 1);
}

#[test]
fn test_pool_prefill() {
    let config = PoolConfig {
        max_idle: 4,
        prefill: 3,
    };
    let pool = ObjectPool::with_config(String::new, config).unwrap();
    assert_eq!(pool.idle_count(), 3);

    let s = pool.get();
    assert_eq!(pool.idle_count(), 2);
    drop(s);
    assert_eq!(pool.stats().created, 3);
    assert_eq!(pool.stats().reused, 1);
}

#[test]
fn test_pool_rejects_invalid_config() {
    let result = ObjectPool::with_config(
        String::new,
        PoolConfig {
            max_idle: 0,
            prefill: 0,
        },
    );
    assert!(matches!(result, Err(ConfigError::ZeroMaxIdle)));
}

#[test]
fn test_detach_leaves_pool() {
    let pool = ObjectPool::new(|| vec![1u32, 2, 3]);
    let owned = pool.get().detach();
    assert_eq!(owned, vec![1, 2, 3]);
    assert_eq!(pool.idle_count(), 0);
    assert_eq!(pool.stats().recycled, 0);
}

#[test]
fn test_pool_shared_across_threads() {
    let pool = ObjectPool::new(|| Buffer::with_capacity(64));

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    let mut buf = pool.get();
                    assert!(buf.is_empty());
                    buf.append(b"hello");
                }
            });
        }
    });

    let stats = pool.stats();
    assert!(stats.created <= 4);
    assert_eq!(stats.created + stats.reused, 400);
    assert_eq!(pool.idle_count() as u64, stats.created);
}
