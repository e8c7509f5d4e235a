//! Property-based tests for the scratch strategies.
//!
//! Run with: cargo test -p platform --test scratch_proptest --features std

use platform::scratch::{PooledScratch, ScratchAlloc};

proptest::proptest! {
    /// A pool lends a buffer iff the request fits, and always the exact length.
    #[test]
    fn pool_lends_iff_request_fits(cap in 0usize..=2048, len in 0usize..=4096) {
        let mut backing = vec![0u8; cap];
        let mut pool = PooledScratch::new(&mut backing);
        let lent = pool.with_scratch(len, |buf| buf.len());
        if len <= cap {
            assert_eq!(lent, Some(len), "cap {} len {}", cap, len);
        } else {
            assert_eq!(lent, None, "cap {} len {}", cap, len);
        }
    }

    /// Consecutive requests see the same storage: nothing is lost between draws.
    #[test]
    fn pool_is_reused_across_requests(cap in 2usize..=512, byte in 0u8..=255u8) {
        let mut backing = vec![0u8; cap];
        let mut pool = PooledScratch::new(&mut backing);
        pool.with_scratch(cap, |buf| buf.fill(byte));
        let first = pool.with_scratch(2, |buf| buf.to_vec());
        assert_eq!(first, Some(vec![byte, byte]));
    }
}

#[cfg(feature = "alloc")]
proptest::proptest! {
    /// Heap scratch serves any reasonable length.
    #[test]
    fn heap_serves_requested_length(len in 0usize..=65_536) {
        let mut heap = platform::HeapScratch;
        assert_eq!(heap.with_scratch(len, |buf| buf.len()), Some(len));
    }
}
