//! Coalescing adjacent free blocks, and growing the heap when a request
//! can't be satisfied from the free lists.

use crate::block::{self, BlockPtr, WSIZE};
use crate::freelist;
use crate::heap::{self, AllocError};

/// Merges a just-freed block with any free neighbors, then inserts the
/// (possibly larger) result into its bucket. `bp`'s header must already
/// report itself free with an accurate prev-alloc bit.
///
/// The four prev/next-alloc cases match the source's `coalesce` exactly:
/// merging toward the predecessor inherits the predecessor's prev-alloc
/// bit (the block's own prev-alloc bit is, by construction, accurate only
/// for its *current* physical position); merging toward the successor
/// leaves the successor's prev-alloc bit alone, since by assumption the
/// successor in that branch is allocated.
pub unsafe fn coalesce(seg_free_list_base: *mut u8, bp: BlockPtr) -> BlockPtr {
    unsafe {
        let prev_alloc = block::is_prev_allocated(bp);
        let next_bp = block::next_block(bp);
        let next_alloc = block::is_allocated(next_bp);
        let mut size = block::size_of(bp);
        let mut merged = bp;

        match (prev_alloc, next_alloc) {
            (true, true) => {}
            (true, false) => {
                freelist::remove(seg_free_list_base, next_bp);
                size += block::size_of(next_bp);
                let word = block::pack(size as u32, false, true);
                *block::header(merged) = word;
                *block::footer(merged) = word;
            }
            (false, true) => {
                let prev_bp = block::prev_block(bp);
                freelist::remove(seg_free_list_base, prev_bp);
                size += block::size_of(prev_bp);
                let prev_prev_alloc = block::is_prev_allocated(prev_bp);
                merged = prev_bp;
                let word = block::pack(size as u32, false, prev_prev_alloc);
                *block::header(merged) = word;
                *block::footer(merged) = word;
            }
            (false, false) => {
                let prev_bp = block::prev_block(bp);
                freelist::remove(seg_free_list_base, prev_bp);
                freelist::remove(seg_free_list_base, next_bp);
                size += block::size_of(prev_bp) + block::size_of(next_bp);
                let prev_prev_alloc = block::is_prev_allocated(prev_bp);
                merged = prev_bp;
                let word = block::pack(size as u32, false, prev_prev_alloc);
                *block::header(merged) = word;
                *block::footer(merged) = word;
            }
        }

        freelist::insert(seg_free_list_base, merged);
        merged
    }
}

/// Grows the heap by `words` words (padded up to an even count so the new
/// region stays double-word aligned), carves the new region into a free
/// block carrying the old epilogue's prev-alloc bit, writes a fresh
/// epilogue at the new end, and coalesces — which may immediately merge
/// the new block into the heap's previous last block if that was free.
///
/// Returns the final free block, or `AllocError::OutOfMemory` if the heap
/// primitive refused to grow.
pub unsafe fn extend_heap(
    seg_free_list_base: *mut u8,
    words: usize,
) -> Result<BlockPtr, AllocError> {
    unsafe {
        let words = if words % 2 != 0 { words + 1 } else { words };
        let size = words * WSIZE;

        let bp = heap::extend(size)? as BlockPtr;

        let prev_alloc = block::is_prev_allocated(bp);
        let word = block::pack(size as u32, false, prev_alloc);
        *block::header(bp) = word;
        *block::footer(bp) = word;

        // `bp` is free at this point (coalesce hasn't run yet), so the new
        // epilogue's prev-alloc bit must be clear — not the source's
        // implicit "always 1", which would wrongly mark the just-extended
        // free block as allocated and suppress coalescing on the next
        // `extend_heap` call.
        let new_epilogue = block::next_block(bp);
        *block::header(new_epilogue) = block::pack(0, true, false);

        block::set_prev_link(bp, None);
        block::set_next_link(bp, None);

        Ok(coalesce(seg_free_list_base, bp))
    }
}
