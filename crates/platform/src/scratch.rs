//! Scratch buffer strategies for pixel transfers
//!
//! Every multi-pixel draw renders its payload into a scratch buffer before
//! streaming it over the bus. Where that buffer comes from is a board
//! decision made once, when the device is built:
//!
//! - [`PooledScratch`] lends slices of one fixed buffer (typically a
//!   `static` obtained through [`static_cell::StaticCell`]). Zero heap use;
//!   only one transfer may hold it at a time, which the `&mut self`
//!   receiver guarantees.
//! - [`HeapScratch`] (feature `alloc`) allocates per call and frees on
//!   return. Allocation failure is reported, never panics.
//!
//! The device owns exactly one strategy for its whole lifetime; the two
//! are never mixed.

use static_cell::StaticCell;

/// Lends a mutable byte buffer for the duration of a closure.
pub trait ScratchAlloc {
    /// Run `f` with a buffer of exactly `len` bytes.
    ///
    /// Returns `None` without calling `f` when no buffer of that size can be
    /// provided. Buffer contents on entry are unspecified.
    fn with_scratch<R>(&mut self, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Option<R>;

    /// Largest buffer this strategy can ever lend, or `None` if unbounded.
    ///
    /// Callers size their blocks to fit, so a small pool means more, shorter
    /// transactions rather than a refused request.
    fn max_len(&self) -> Option<usize> {
        None
    }
}

impl<S: ScratchAlloc> ScratchAlloc for &mut S {
    fn with_scratch<R>(&mut self, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        (**self).with_scratch(len, f)
    }

    fn max_len(&self) -> Option<usize> {
        (**self).max_len()
    }
}

// ---------------------------------------------------------------------------
// Pooled
// ---------------------------------------------------------------------------

/// Fixed-size buffer reused by every transfer.
pub struct PooledScratch<'a> {
    buf: &'a mut [u8],
}

impl<'a> PooledScratch<'a> {
    /// Wrap an existing buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl PooledScratch<'static> {
    /// Claim a `'static` pool from `cell`.
    ///
    /// Returns `None` if the cell was already claimed, so a second device can
    /// never alias the first one's buffer.
    ///
    /// ```
    /// use platform::scratch::PooledScratch;
    /// use static_cell::StaticCell;
    ///
    /// static POOL: StaticCell<[u8; 1024]> = StaticCell::new();
    /// let pool = PooledScratch::from_static(&POOL).unwrap();
    /// assert_eq!(pool.capacity(), 1024);
    /// assert!(PooledScratch::from_static(&POOL).is_none());
    /// ```
    pub fn from_static<const N: usize>(cell: &'static StaticCell<[u8; N]>) -> Option<Self> {
        #[allow(clippy::large_stack_arrays)]
        let buf = cell.try_init([0u8; N])?;
        Some(Self::new(buf.as_mut_slice()))
    }
}

impl ScratchAlloc for PooledScratch<'_> {
    fn with_scratch<R>(&mut self, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        let slot = self.buf.get_mut(..len)?;
        Some(f(slot))
    }

    fn max_len(&self) -> Option<usize> {
        Some(self.buf.len())
    }
}

// ---------------------------------------------------------------------------
// Heap
// ---------------------------------------------------------------------------

/// Per-call heap allocation.
#[cfg(feature = "alloc")]
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapScratch;

#[cfg(feature = "alloc")]
impl ScratchAlloc for HeapScratch {
    fn with_scratch<R>(&mut self, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        let mut buf = alloc::vec::Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0);
        Some(f(&mut buf))
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn pooled_lends_exact_length() {
        let mut backing = [0u8; 16];
        let mut pool = PooledScratch::new(&mut backing);
        let len = pool.with_scratch(6, |buf| buf.len());
        assert_eq!(len, Some(6));
    }

    #[test]
    fn pooled_refuses_oversized_request() {
        let mut backing = [0u8; 4];
        let mut pool = PooledScratch::new(&mut backing);
        let mut called = false;
        let out = pool.with_scratch(5, |_| called = true);
        assert!(out.is_none());
        assert!(!called, "closure must not run when the pool is too small");
    }

    #[test]
    fn pooled_reports_its_length_as_the_limit() {
        let mut backing = [0u8; 12];
        let mut pool = PooledScratch::new(&mut backing);
        assert_eq!(pool.max_len(), Some(12));
        fn limit_of<S: ScratchAlloc>(scratch: S) -> Option<usize> {
            scratch.max_len()
        }
        assert_eq!(limit_of(&mut pool), Some(12), "borrowed strategy forwards");
    }

    #[test]
    fn pooled_reuses_the_same_storage() {
        let mut backing = [0u8; 4];
        let mut pool = PooledScratch::new(&mut backing);
        pool.with_scratch(2, |buf| buf.copy_from_slice(&[0xAB, 0xCD]));
        let seen = pool.with_scratch(2, |buf| [buf[0], buf[1]]);
        assert_eq!(seen, Some([0xAB, 0xCD]));
    }

    #[test]
    fn static_pool_can_only_be_claimed_once() {
        static POOL: StaticCell<[u8; 32]> = StaticCell::new();
        let first = PooledScratch::from_static(&POOL);
        assert_eq!(first.map(|p| p.capacity()), Some(32));
        assert!(PooledScratch::from_static(&POOL).is_none());
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn heap_allocates_requested_length() {
        let mut heap = HeapScratch;
        assert_eq!(heap.with_scratch(1024, |buf| buf.len()), Some(1024));
        assert_eq!(heap.max_len(), None);
    }
}
