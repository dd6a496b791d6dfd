//! The public, conventional-API facade: a single process-wide allocator
//! instance behind five free functions, plus a [`GlobalAlloc`] adapter for
//! consumers that want to drop this crate in as `#[global_allocator]`.
//!
//! Per spec.md §5, there is exactly one instance, created once at first
//! use and never torn down, with no synchronization — this is the "thin
//! facade" the Design Notes ask for around the [`Allocator`] struct's
//! explicit state.

use std::alloc::{GlobalAlloc, Layout};
use std::ptr::addr_of_mut;

use crate::allocator::Allocator;
use crate::checkheap::{self, Violation};

static mut GLOBAL: Allocator = Allocator::new();

/// # Safety
/// Must not be called reentrantly or from more than one thread at a time;
/// the allocator keeps no locks (see spec.md §5).
unsafe fn global() -> &'static mut Allocator {
    unsafe { &mut *addr_of_mut!(GLOBAL) }
}

/// Explicitly initializes the global allocator. Safe to skip: `malloc`
/// initializes lazily on first use, exactly as the source's
/// `if (heap_listp == 0) mm_init();` does.
///
/// # Safety
/// See the module-level safety note.
pub unsafe fn init() -> bool {
    unsafe { global().init().is_ok() }
}

/// # Safety
/// See the module-level safety note.
pub unsafe fn malloc(size: usize) -> *mut u8 {
    unsafe { global().malloc(size) }
}

/// # Safety
/// `p` must be null or a pointer previously returned by `malloc`/`calloc`/
/// `realloc` on this allocator, not already freed. See also the
/// module-level safety note.
pub unsafe fn free(p: *mut u8) {
    unsafe { global().free(p) }
}

/// # Safety
/// See [`free`]'s and the module-level safety notes.
pub unsafe fn realloc(p: *mut u8, size: usize) -> *mut u8 {
    unsafe { global().realloc(p, size) }
}

/// # Safety
/// See the module-level safety note.
pub unsafe fn calloc(n: usize, size: usize) -> *mut u8 {
    unsafe { global().calloc(n, size) }
}

/// Validates I1–I7 against the global allocator's current state and
/// writes any violation to stderr, tagged with `lineno`. Never mutates
/// state; safe to call at any time, including from tests.
///
/// # Safety
/// See the module-level safety note.
pub unsafe fn checkheap(lineno: u32) {
    unsafe { checkheap::checkheap(global(), lineno) }
}

/// As [`checkheap`], but returns the violations instead of printing them.
///
/// # Safety
/// See the module-level safety note.
pub unsafe fn check() -> Vec<Violation> {
    unsafe { checkheap::check(global()) }
}

/// A zero-sized [`GlobalAlloc`] adapter over the facade above, so this
/// crate can be used as `#[global_allocator]`.
///
/// The allocator only ever hands out 8-byte-aligned memory (spec.md's
/// Non-goals exclude stronger alignment), so requests for a coarser
/// alignment are only checked in debug builds rather than rejected on the
/// hot path — matching the spec's framing of this as scope exclusion, not
/// an error condition to detect at runtime.
pub struct SegregatedAllocator;

unsafe impl GlobalAlloc for SegregatedAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        debug_assert!(layout.align() <= 8, "alignment beyond 8 bytes is out of scope");
        unsafe { malloc(layout.size()) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        unsafe { free(ptr) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        debug_assert!(layout.align() <= 8, "alignment beyond 8 bytes is out of scope");
        unsafe { realloc(ptr, new_size) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        debug_assert!(layout.align() <= 8, "alignment beyond 8 bytes is out of scope");
        unsafe { calloc(1, layout.size()) }
    }
}
