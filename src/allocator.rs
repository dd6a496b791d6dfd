//! The allocator's process-wide state and the five operations over it
//! (`init`, `malloc`, `free`, `realloc`, `calloc`). [`crate::api`] wraps a
//! single instance of this struct in a process-wide singleton and exposes
//! it as the conventional C-style free-function surface.

use std::ptr;

use crate::block::{self, BlockPtr, CHUNKSIZE, DSIZE, WSIZE};
use crate::coalesce;
use crate::freelist::NUM_CLASSES;
use crate::heap::{self, AllocError};
use crate::placement;

/// Holds the two heap anchors the whole allocator is built on: the base of
/// the ten-cell bucket-root array, and the "heap-list" pointer used as the
/// traversal start/stop sentinel (the prologue block's own `bp`, one word
/// past the prologue header).
///
/// Non-reentrant, not `Send`/`Sync` by construction (it isn't — the raw
/// pointers inside make it neither automatically, and no explicit impl is
/// provided): concurrent access is out of scope, per spec.
pub struct Allocator {
    heap_listp: BlockPtr,
    seg_free_listp: *mut u8,
    heap_lo: *mut u8,
}

impl Allocator {
    /// An allocator with no heap yet. `init` (or the first `malloc`) sets
    /// up the heap prefix and the first chunk.
    pub const fn new() -> Self {
        Self {
            heap_listp: ptr::null_mut(),
            seg_free_listp: ptr::null_mut(),
            heap_lo: ptr::null_mut(),
        }
    }

    fn is_initialized(&self) -> bool {
        !self.heap_listp.is_null()
    }

    /// Internal accessors used by [`crate::checkheap`]; not part of the
    /// public allocation API.
    pub(crate) fn heap_listp(&self) -> BlockPtr {
        self.heap_listp
    }

    pub(crate) fn seg_free_listp(&self) -> *mut u8 {
        self.seg_free_listp
    }

    pub(crate) fn heap_lo(&self) -> *mut u8 {
        self.heap_lo
    }

    /// Lays out the heap prefix (ten bucket roots, prologue, epilogue) and
    /// extends the heap once by `CHUNKSIZE` bytes.
    pub unsafe fn init(&mut self) -> Result<(), AllocError> {
        unsafe {
            let base = heap::extend(12 * DSIZE)?;

            for i in 0..NUM_CLASSES {
                *(base.add(i * DSIZE) as *mut usize) = 0;
            }

            // double-word 10: alignment pad, then the prologue header.
            let prologue_header = base.add(10 * DSIZE + WSIZE) as *mut u32;
            *prologue_header = block::pack(DSIZE as u32, true, false);

            // double-word 11: prologue footer, then the epilogue header.
            let prologue_footer = base.add(11 * DSIZE) as *mut u32;
            *prologue_footer = block::pack(DSIZE as u32, true, false);
            let epilogue_header = base.add(11 * DSIZE + WSIZE) as *mut u32;
            *epilogue_header = block::pack(0, true, true);

            self.seg_free_listp = base;
            self.heap_lo = base;
            self.heap_listp = base.add(11 * DSIZE);

            coalesce::extend_heap(self.seg_free_listp, CHUNKSIZE / WSIZE)?;
            Ok(())
        }
    }

    /// Allocates at least `size` bytes, returning a null pointer on
    /// out-of-memory or a zero-sized request.
    pub unsafe fn malloc(&mut self, size: usize) -> *mut u8 {
        unsafe {
            if !self.is_initialized() && self.init().is_err() {
                return ptr::null_mut();
            }
            if size == 0 {
                return ptr::null_mut();
            }

            let asize = block::align_request(size);

            if let Some(bp) = placement::find_fit(self.seg_free_listp, asize) {
                placement::place(self.seg_free_listp, bp, asize);
                return bp;
            }

            let extend_words = asize.max(CHUNKSIZE) / WSIZE;
            match coalesce::extend_heap(self.seg_free_listp, extend_words) {
                Ok(bp) => {
                    placement::place(self.seg_free_listp, bp, asize);
                    bp
                }
                Err(_) => ptr::null_mut(),
            }
        }
    }

    /// Frees a block previously returned by `malloc`/`realloc`/`calloc`.
    /// A null pointer is a no-op.
    pub unsafe fn free(&mut self, p: *mut u8) {
        unsafe {
            if p.is_null() {
                return;
            }

            let size = block::size_of(p);
            let prev_alloc = block::is_prev_allocated(p);
            let word = block::pack(size as u32, false, prev_alloc);
            *block::header(p) = word;
            *block::footer(p) = word;

            let next_bp = block::next_block(p);
            let next_word = *block::header(next_bp);
            *block::header(next_bp) =
                block::pack(block::size_field(next_word), block::alloc_field(next_word), false);

            coalesce::coalesce(self.seg_free_listp, p);
        }
    }

    /// Resizes a previously allocated block, preserving its contents up to
    /// `min(size, old_payload_size)`.
    ///
    /// `size == 0` frees `p` and returns null; `p == null` delegates to
    /// `malloc`. The "old payload size" is the block's header size minus
    /// header overhead (see DESIGN.md for why this isn't the source's
    /// 8-byte read at `p - 8`).
    pub unsafe fn realloc(&mut self, p: *mut u8, size: usize) -> *mut u8 {
        unsafe {
            if size == 0 {
                self.free(p);
                return ptr::null_mut();
            }
            if p.is_null() {
                return self.malloc(size);
            }

            let new_p = self.malloc(size);
            if new_p.is_null() {
                return ptr::null_mut();
            }

            let old_payload = block::size_of(p) - WSIZE;
            let copy_len = old_payload.min(size);
            ptr::copy_nonoverlapping(p, new_p, copy_len);

            self.free(p);
            new_p
        }
    }

    /// Allocates `n * size` zeroed bytes. Returns null (without zeroing
    /// anything) on allocation failure or on `n * size` overflow — an
    /// explicit strengthening over the source, which has no such check.
    pub unsafe fn calloc(&mut self, n: usize, size: usize) -> *mut u8 {
        unsafe {
            let bytes = match n.checked_mul(size) {
                Some(bytes) => bytes,
                None => return ptr::null_mut(),
            };

            let p = self.malloc(bytes);
            if !p.is_null() {
                ptr::write_bytes(p, 0, bytes);
            }
            p
        }
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}
