//! Segregated free-list index and the insert/remove operations over it.
//!
//! The ten bucket roots live in the heap itself, as a contiguous run of ten
//! 8-byte cells right after the heap prefix's alignment area (see
//! [`crate::allocator::Allocator::init`]). A root cell stores either a null
//! sentinel (`0`) or the address of the bucket's head block. Root cells are
//! *not* list nodes: they hold only a forward pointer, so insert/remove
//! both special-case "the block is (becoming) the head" rather than
//! treating the root uniformly with an in-list predecessor.

use crate::block::{self, BlockPtr, DSIZE};

/// Number of size-class buckets.
pub const NUM_CLASSES: usize = 10;

/// Inclusive upper bounds (in bytes) for buckets 0..=8. Bucket 9 is
/// "everything larger" and has no upper bound (spec.md §9 overrides the
/// source's `1 << 31` literal with this framing).
const CLASS_UPPER_BOUNDS: [usize; NUM_CLASSES - 1] =
    [32, 64, 128, 256, 512, 1024, 2048, 4096, 8192];

/// Maps a block size to its bucket index.
pub fn class_index(size: usize) -> usize {
    for (i, &bound) in CLASS_UPPER_BOUNDS.iter().enumerate() {
        if size <= bound {
            return i;
        }
    }
    NUM_CLASSES - 1
}

/// Address of the root cell for `size`'s bucket, given the base address of
/// the ten-cell root array. Bucket roots are monotonically addressable:
/// bucket `i`'s cell immediately precedes bucket `i + 1`'s, so walking
/// buckets forward during `find_fit` is plain pointer arithmetic.
pub unsafe fn root_cell(seg_free_list_base: *mut u8, size: usize) -> *mut usize {
    unsafe { seg_free_list_base.add(class_index(size) * DSIZE) as *mut usize }
}

unsafe fn read_root(root: *mut usize) -> Option<BlockPtr> {
    unsafe {
        let raw = *root;
        if raw == 0 { None } else { Some(raw as BlockPtr) }
    }
}

/// The head of bucket `class` (0-indexed), or `None` if that bucket is
/// empty. Exposed for [`crate::placement::find_fit`], which walks buckets
/// forward by class index without needing its own copy of the root-cell
/// arithmetic.
pub unsafe fn bucket_head_for_class(seg_free_list_base: *mut u8, class: usize) -> Option<BlockPtr> {
    unsafe {
        let root = seg_free_list_base.add(class * DSIZE) as *mut usize;
        read_root(root)
    }
}

unsafe fn write_root(root: *mut usize, bp: Option<BlockPtr>) {
    unsafe {
        *root = bp.map_or(0, |p| p as usize);
    }
}

/// Inserts a free block into its bucket, keeping the bucket sorted
/// non-decreasing by block size. Four cases, mirroring the source's
/// `insert_to_free_list` exactly: the new block becomes the sole entry,
/// the new tail, the new head, or an interior node.
pub unsafe fn insert(seg_free_list_base: *mut u8, bp: BlockPtr) {
    unsafe {
        let size = block::size_of(bp);
        let root = root_cell(seg_free_list_base, size);

        let mut prev: Option<BlockPtr> = None;
        let mut next = read_root(root);
        while let Some(candidate) = next {
            if block::size_of(candidate) >= size {
                break;
            }
            prev = next;
            next = block::next_link(candidate);
        }

        block::set_prev_link(bp, prev);
        block::set_next_link(bp, next);

        match prev {
            None => write_root(root, Some(bp)),
            Some(p) => block::set_next_link(p, Some(bp)),
        }
        if let Some(n) = next {
            block::set_prev_link(n, Some(bp));
        }
    }
}

/// Removes a free block from its bucket. Four cases by null-ness of each
/// side, mirroring the source's `remove_from_free_list`. Does not touch
/// `bp`'s header/footer/alloc flags.
pub unsafe fn remove(seg_free_list_base: *mut u8, bp: BlockPtr) {
    unsafe {
        let size = block::size_of(bp);
        let root = root_cell(seg_free_list_base, size);

        let prev = block::prev_link(bp);
        let next = block::next_link(bp);

        block::set_prev_link(bp, None);
        block::set_next_link(bp, None);

        match prev {
            None => write_root(root, next),
            Some(p) => block::set_next_link(p, next),
        }
        if let Some(n) = next {
            block::set_prev_link(n, prev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_index_matches_size_table() {
        assert_eq!(class_index(1), 0);
        assert_eq!(class_index(32), 0);
        assert_eq!(class_index(33), 1);
        assert_eq!(class_index(64), 1);
        assert_eq!(class_index(65), 2);
        assert_eq!(class_index(128), 2);
        assert_eq!(class_index(256), 3);
        assert_eq!(class_index(512), 4);
        assert_eq!(class_index(1024), 5);
        assert_eq!(class_index(2048), 6);
        assert_eq!(class_index(4096), 7);
        assert_eq!(class_index(8192), 8);
        assert_eq!(class_index(8193), 9);
        assert_eq!(class_index(1 << 20), 9);
    }

    #[test]
    fn root_cells_are_contiguous_and_monotonically_addressable() {
        unsafe {
            let mut backing = [0usize; NUM_CLASSES];
            let base = backing.as_mut_ptr() as *mut u8;
            for i in 0..NUM_CLASSES - 1 {
                let a = root_cell(base, CLASS_UPPER_BOUNDS[i]) as usize;
                let b = root_cell(base, CLASS_UPPER_BOUNDS[i] + 1) as usize;
                assert_eq!(b, a + DSIZE);
            }
        }
    }
}
