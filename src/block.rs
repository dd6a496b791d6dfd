//! Block layout & encoding.
//!
//! A *block pointer* (`BlockPtr`) always aliases a block's payload address,
//! exactly like `bp` in the textbook allocator this crate generalizes: the
//! 4-byte header sits at `bp - WSIZE`, and (for free blocks only) a 4-byte
//! footer copy of the header sits at the last word of the block. Free
//! blocks additionally store two 8-byte link fields at the start of their
//! own payload (`prev_link` at `bp`, `next_link` at `bp + DSIZE`).
//!
//! Every function here is `unsafe`: callers must supply a valid block
//! pointer in the state the function expects (e.g. `prev_block` is only
//! defined when the prev-alloc bit is clear).

/// Word size in bytes: header/footer width.
pub const WSIZE: usize = 4;
/// Double-word size in bytes: pointer-alignment unit and link-field width.
pub const DSIZE: usize = 8;
/// Minimum block size: 4-byte header + 8-byte prev link + 8-byte next link
/// + 4-byte footer.
pub const MIN_BLOCK_SIZE: usize = 24;
/// Default heap growth amount, in bytes.
pub const CHUNKSIZE: usize = 1 << 12;

/// A pointer to a block's payload. Doubles as the free-block's link-field
/// base address when the block is free.
pub type BlockPtr = *mut u8;

/// Packs a size and its two flag bits into a header/footer word.
///
/// `size` must already be a multiple of 8; the low 3 bits are reserved for
/// flags and bit 2 is always zero (unused).
pub fn pack(size: u32, alloc: bool, prev_alloc: bool) -> u32 {
    debug_assert_eq!(size & 0x7, 0, "block size must be a multiple of 8");
    size | (alloc as u32) | ((prev_alloc as u32) << 1)
}

/// Extracts the size field (bits 3..31) from a header/footer word.
pub fn size_field(word: u32) -> u32 {
    word & !0x7
}

/// Extracts the self-allocated flag (bit 0).
pub fn alloc_field(word: u32) -> bool {
    word & 0x1 != 0
}

/// Extracts the prev-allocated flag (bit 1).
pub fn prev_alloc_field(word: u32) -> bool {
    word & 0x2 != 0
}

/// Address of `bp`'s header.
pub unsafe fn header(bp: BlockPtr) -> *mut u32 {
    unsafe { bp.sub(WSIZE) as *mut u32 }
}

/// Address of `bp`'s footer. Only meaningful while `bp` is free.
pub unsafe fn footer(bp: BlockPtr) -> *mut u32 {
    unsafe { bp.add(size_of(bp) - DSIZE) as *mut u32 }
}

/// Total size of the block (header included), in bytes.
pub unsafe fn size_of(bp: BlockPtr) -> usize {
    unsafe { size_field(*header(bp)) as usize }
}

/// Whether `bp` itself is marked allocated.
pub unsafe fn is_allocated(bp: BlockPtr) -> bool {
    unsafe { alloc_field(*header(bp)) }
}

/// Whether the block physically preceding `bp` is marked allocated.
pub unsafe fn is_prev_allocated(bp: BlockPtr) -> bool {
    unsafe { prev_alloc_field(*header(bp)) }
}

/// The block physically following `bp`.
pub unsafe fn next_block(bp: BlockPtr) -> BlockPtr {
    unsafe { bp.add(size_of(bp)) }
}

/// The block physically preceding `bp`.
///
/// Only defined when `is_prev_allocated(bp)` is false: an allocated
/// predecessor carries no footer to read its size from.
pub unsafe fn prev_block(bp: BlockPtr) -> BlockPtr {
    unsafe {
        debug_assert!(!is_prev_allocated(bp), "predecessor has no footer to read");
        let prev_footer = bp.sub(DSIZE) as *mut u32;
        let prev_size = size_field(*prev_footer) as usize;
        bp.sub(prev_size)
    }
}

/// Reads the `prev_link` field of a free block, as an `Option` (null is
/// "no predecessor in this bucket").
pub unsafe fn prev_link(bp: BlockPtr) -> Option<BlockPtr> {
    unsafe {
        let raw = *(bp as *const usize);
        if raw == 0 { None } else { Some(raw as BlockPtr) }
    }
}

/// Reads the `next_link` field of a free block.
pub unsafe fn next_link(bp: BlockPtr) -> Option<BlockPtr> {
    unsafe {
        let raw = *(bp.add(DSIZE) as *const usize);
        if raw == 0 { None } else { Some(raw as BlockPtr) }
    }
}

/// Writes the `prev_link` field of a free block.
pub unsafe fn set_prev_link(bp: BlockPtr, val: Option<BlockPtr>) {
    unsafe {
        *(bp as *mut usize) = val.map_or(0, |p| p as usize);
    }
}

/// Writes the `next_link` field of a free block.
pub unsafe fn set_next_link(bp: BlockPtr, val: Option<BlockPtr>) {
    unsafe {
        *(bp.add(DSIZE) as *mut usize) = val.map_or(0, |p| p as usize);
    }
}

/// Rounds a requested payload size up to a valid block size: the smallest
/// multiple of 8 that is at least `size + WSIZE` (header overhead) and at
/// least `MIN_BLOCK_SIZE`.
pub fn align_request(size: usize) -> usize {
    if size <= 2 * DSIZE {
        MIN_BLOCK_SIZE
    } else {
        DSIZE * ((size + WSIZE + (DSIZE - 1)) / DSIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrip() {
        let w = pack(256, true, false);
        assert_eq!(size_field(w), 256);
        assert!(alloc_field(w));
        assert!(!prev_alloc_field(w));

        let w = pack(32, false, true);
        assert_eq!(size_field(w), 32);
        assert!(!alloc_field(w));
        assert!(prev_alloc_field(w));
    }

    #[test]
    fn align_request_minimum() {
        for size in 0..=16 {
            assert_eq!(align_request(size), MIN_BLOCK_SIZE);
        }
    }

    #[test]
    fn align_request_rounds_up_to_multiple_of_eight() {
        assert_eq!(align_request(17), 24);
        assert_eq!(align_request(20), 24);
        assert_eq!(align_request(24), 32);
        assert_eq!(align_request(25), 32);
        assert_eq!(align_request(100), 104);
    }

    #[test]
    fn align_request_is_always_multiple_of_eight_and_at_least_min() {
        for size in 0..300usize {
            let asize = align_request(size);
            assert!(asize >= MIN_BLOCK_SIZE);
            assert_eq!(asize % 8, 0);
            assert!(asize >= size + WSIZE);
        }
    }
}
