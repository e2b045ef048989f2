use memokit::{BatchConfig, Batcher};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_batcher_preserves_items_and_order(
        items in proptest::collection::vec(any::<i32>(), 0..200),
        batch_size in 1usize..20,
    ) {
        let mut out = Vec::new();
        let batcher = Batcher::new(&mut out, BatchConfig::with_batch_size(batch_size)).unwrap();

        let mut flushed = 0;
        for &item in &items {
            let written = batcher.push(item).unwrap();
            prop_assert!(written == 0 || written == batch_size);
            flushed += written;
            prop_assert!(batcher.pending_len() < batch_size);
        }
        prop_assert_eq!(flushed, items.len() / batch_size * batch_size);

        let rest = batcher.flush().unwrap();
        prop_assert_eq!(flushed + rest, items.len());
        drop(batcher);

        prop_assert_eq!(out, items);
    }
}
