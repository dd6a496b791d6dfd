//! Placement policy: choosing a free block for a request (`find_fit`) and
//! carving it to size (`place`).

use crate::block::{self, BlockPtr, MIN_BLOCK_SIZE};
use crate::freelist::{self, NUM_CLASSES};

/// Finds a free block of at least `asize` bytes, starting at `asize`'s own
/// bucket and walking forward through larger buckets on a miss.
///
/// Because each bucket is sorted non-decreasing by size, the first block
/// found that is large enough is also the smallest adequate block in that
/// bucket — first-fit within a bucket *is* best-fit within a bucket.
pub unsafe fn find_fit(seg_free_list_base: *mut u8, asize: usize) -> Option<BlockPtr> {
    unsafe {
        let start = freelist::class_index(asize);
        for class in start..NUM_CLASSES {
            let mut bp = freelist::bucket_head_for_class(seg_free_list_base, class);
            while let Some(candidate) = bp {
                if block::size_of(candidate) >= asize {
                    return Some(candidate);
                }
                bp = block::next_link(candidate);
            }
        }
        None
    }
}

/// Removes `bp` from its bucket and carves out `asize` bytes, allocating
/// them. If the remainder is large enough to be its own block (>= 24
/// bytes) it is split off as a new free block and reinserted; otherwise
/// the whole block is allocated and the successor's prev-alloc bit (and,
/// if it's free, its footer) is updated to reflect that.
///
/// Precondition: `bp` is free and `block::size_of(bp) >= asize`.
pub unsafe fn place(seg_free_list_base: *mut u8, bp: BlockPtr, asize: usize) {
    unsafe {
        let csize = block::size_of(bp);
        debug_assert!(csize >= asize);
        freelist::remove(seg_free_list_base, bp);

        let rsize = csize - asize;
        let prev_alloc = block::is_prev_allocated(bp);

        if rsize >= MIN_BLOCK_SIZE {
            *block::header(bp) = block::pack(asize as u32, true, prev_alloc);

            let new_bp = block::next_block(bp);
            let word = block::pack(rsize as u32, false, true);
            *block::header(new_bp) = word;
            *block::footer(new_bp) = word;
            block::set_prev_link(new_bp, None);
            block::set_next_link(new_bp, None);

            freelist::insert(seg_free_list_base, new_bp);
        } else {
            *block::header(bp) = block::pack(csize as u32, true, prev_alloc);

            let next_bp = block::next_block(bp);
            let next_word = *block::header(next_bp);
            let updated = block::pack(block::size_field(next_word), block::alloc_field(next_word), true);
            *block::header(next_bp) = updated;
            if !block::alloc_field(next_word) {
                *block::footer(next_bp) = updated;
            }
        }
    }
}
