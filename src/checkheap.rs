//! The integrity checker: a debug-only traversal validating invariants
//! I1–I7 without mutating any allocator state.

use std::fmt;

use crate::allocator::Allocator;
use crate::block::{self, BlockPtr, DSIZE, MIN_BLOCK_SIZE};
use crate::freelist::NUM_CLASSES;
use crate::heap;

/// One invariant violation found by [`check`], naming the block (or
/// bucket) involved and which invariant it breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NotAligned { at: usize },
    NotInHeap { at: usize },
    BadSize { at: usize, size: usize },
    AdjacentFreeBlocks { at: usize },
    HeaderFooterMismatch { at: usize },
    PrevAllocMismatch { at: usize },
    LinkMismatch { at: usize },
    WrongBucket { at: usize, class: usize, size: usize },
    WrongBucketOrder { at: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotAligned { at } => write!(f, "block {:#x} is not 8-byte aligned", at),
            Violation::NotInHeap { at } => write!(f, "block {:#x} is not within heap bounds", at),
            Violation::BadSize { at, size } => {
                write!(f, "block {:#x} has invalid size {}", at, size)
            }
            Violation::AdjacentFreeBlocks { at } => {
                write!(f, "block {:#x} and its neighbor are both free", at)
            }
            Violation::HeaderFooterMismatch { at } => {
                write!(f, "free block {:#x}'s header and footer disagree", at)
            }
            Violation::PrevAllocMismatch { at } => write!(
                f,
                "block {:#x}'s prev-alloc bit disagrees with its predecessor's actual state",
                at
            ),
            Violation::LinkMismatch { at } => {
                write!(f, "free block {:#x}'s bucket links are inconsistent", at)
            }
            Violation::WrongBucket { at, class, size } => write!(
                f,
                "block {:#x} (size {}) is in bucket {}, which doesn't match its size",
                at, size, class
            ),
            Violation::WrongBucketOrder { at } => {
                write!(f, "bucket entry {:#x} is out of ascending-size order", at)
            }
        }
    }
}

fn lower_bound_for_class(class: usize) -> usize {
    match class {
        0 => 0,
        1 => 33,
        2 => 65,
        3 => 129,
        4 => 257,
        5 => 513,
        6 => 1025,
        7 => 2049,
        8 => 4097,
        _ => 8193,
    }
}

fn upper_bound_for_class(class: usize) -> Option<usize> {
    match class {
        0 => Some(32),
        1 => Some(64),
        2 => Some(128),
        3 => Some(256),
        4 => Some(512),
        5 => Some(1024),
        6 => Some(2048),
        7 => Some(4096),
        8 => Some(8192),
        _ => None,
    }
}

fn in_heap(a: &Allocator, p: *mut u8) -> bool {
    unsafe {
        let hi = heap::current_break();
        (p as usize) >= (a.heap_lo() as usize) && (p as usize) < (hi as usize)
    }
}

fn is_aligned(p: *mut u8) -> bool {
    (p as usize) % DSIZE == 0
}

/// Walks the heap from the prologue sentinel to the epilogue, then walks
/// each of the ten buckets, collecting every violation of I1–I7. Never
/// mutates allocator state.
pub fn check(a: &Allocator) -> Vec<Violation> {
    let mut violations = Vec::new();
    unsafe {
        let mut bp = a.heap_listp();
        // The prologue's own prev-alloc bit is a fixed sentinel (it has no
        // real predecessor), so I3 is only checked from the prologue's
        // successor onward — but it is checked all the way up to and
        // including the epilogue, whose prev-alloc bit must track whatever
        // block physically precedes it.
        let mut prev_self_alloc = block::is_allocated(bp);
        loop {
            let size = block::size_of(bp);

            // I3 is checked on every block up to and including the
            // epilogue (whose prev-alloc bit must track whatever block
            // physically precedes it), but alignment/bounds checks are not:
            // the epilogue (and prologue) are sentinels that terminate
            // traversal without a bounds check, per spec.md's Glossary.
            if bp != a.heap_listp() {
                let prev_alloc = block::is_prev_allocated(bp);
                if prev_alloc != prev_self_alloc {
                    violations.push(Violation::PrevAllocMismatch { at: bp as usize });
                }
            }

            if size == 0 {
                break;
            }

            if !is_aligned(bp) {
                violations.push(Violation::NotAligned { at: bp as usize });
            }
            if !in_heap(a, bp) {
                violations.push(Violation::NotInHeap { at: bp as usize });
            }
            if size % 8 != 0 || size < MIN_BLOCK_SIZE {
                violations.push(Violation::BadSize { at: bp as usize, size });
            }

            let self_alloc = block::is_allocated(bp);
            let prev_alloc = block::is_prev_allocated(bp);
            let next_bp = block::next_block(bp);
            let next_alloc = block::is_allocated(next_bp);

            if !self_alloc && !prev_alloc {
                violations.push(Violation::AdjacentFreeBlocks { at: bp as usize });
            }
            if !self_alloc && !next_alloc {
                violations.push(Violation::AdjacentFreeBlocks { at: bp as usize });
            }

            if !self_alloc {
                if *block::header(bp) != *block::footer(bp) {
                    violations.push(Violation::HeaderFooterMismatch { at: bp as usize });
                }

                let prev_link = block::prev_link(bp);
                let next_link = block::next_link(bp);
                if let Some(n) = next_link {
                    if block::prev_link(n) != Some(bp) {
                        violations.push(Violation::LinkMismatch { at: bp as usize });
                    }
                }
                if let Some(p) = prev_link {
                    if block::next_link(p) != Some(bp) {
                        violations.push(Violation::LinkMismatch { at: bp as usize });
                    }
                }
            }

            prev_self_alloc = self_alloc;
            bp = next_bp;
        }

        for class in 0..NUM_CLASSES {
            let root = a.seg_free_listp().add(class * DSIZE) as *mut usize;
            let min = lower_bound_for_class(class);
            let max = upper_bound_for_class(class);

            let mut bp = {
                let raw = *root;
                if raw == 0 { None } else { Some(raw as BlockPtr) }
            };
            while let Some(node) = bp {
                let size = block::size_of(node);
                let over_max = max.map(|m| size > m).unwrap_or(false);
                if size < min || over_max {
                    violations.push(Violation::WrongBucket { at: node as usize, class, size });
                }

                if let Some(next) = block::next_link(node) {
                    if block::size_of(next) < size {
                        violations.push(Violation::WrongBucketOrder { at: node as usize });
                    }
                }

                bp = block::next_link(node);
            }
        }
    }
    violations
}

/// Convenience entry point matching spec.md's `checkheap(lineno)`: runs
/// [`check`] and writes every violation to stderr, tagged with the call
/// site line number, the same way the teacher crate's `print_alloc` writes
/// debug information straight to a stream rather than through a logging
/// facade.
pub fn checkheap(a: &Allocator, lineno: u32) {
    for v in check(a) {
        eprintln!("checkheap({}): {}", lineno, v);
    }
}
