//! # rallocator — a segregated-fit heap allocator
//!
//! This crate is a general-purpose dynamic memory allocator over a single,
//! monotonically growable heap region obtained from `sbrk(2)`. It is the
//! segregated-free-list redesign of the bump allocator this crate started
//! life as: instead of handing out fresh heap every time and leaving freed
//! middle blocks as permanent holes, it reuses freed memory through ten
//! size-class free lists, splitting and coalescing blocks as needed.
//!
//! ## Overview
//!
//! ```text
//!   Heap layout:
//!
//!   ┌──────────────┬──────────┬──────────┬───────────────────────────────┐
//!   │ 10 bucket    │ prologue │  blocks…  │ epilogue (size 0, moves right  │
//!   │ root cells   │ hdr+ftr  │           │  as the heap grows)            │
//!   └──────────────┴──────────┴──────────┴───────────────────────────────┘
//!
//!   Each block:
//!   ┌────────┬──────────────────────────────┬────────┐
//!   │ header │            payload           │ footer │  ← free blocks only;
//!   └────────┴──────────────────────────────┴────────┘    allocated blocks
//!            ▲                                            have no footer.
//!            └── prev_link, next_link live here while free
//! ```
//!
//! ## Crate structure
//!
//! ```text
//!   rallocator
//!   ├── heap        — the sbrk-backed heap-extension primitive
//!   ├── block       — block header/footer encoding and traversal
//!   ├── freelist    — the ten size-class buckets: index, insert, remove
//!   ├── placement   — find_fit / place
//!   ├── coalesce    — coalesce / extend_heap
//!   ├── allocator   — the Allocator struct: init/malloc/free/realloc/calloc
//!   ├── checkheap   — the debug-only integrity checker
//!   └── api         — the process-wide singleton + GlobalAlloc adapter
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use rallocator::{malloc, free};
//!
//! unsafe {
//!     let p = malloc(64) as *mut u64;
//!     *p = 42;
//!     free(p as *mut u8);
//! }
//! ```
//!
//! Or as the process's global allocator:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOC: rallocator::SegregatedAllocator = rallocator::SegregatedAllocator;
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; not
//!   reentrant.
//! - **Never returns memory to the OS**: `sbrk` can only grow; coalescing
//!   keeps fragmentation down but the heap's high-water mark never drops.
//! - **8-byte alignment only**: sufficient for the block layout's own
//!   pointer fields, not for stricter SIMD-style requests.
//! - **Unix-only**: requires `libc` and `sbrk` (POSIX systems).
//!
//! ## Safety
//!
//! This crate is inherently unsafe: it manages raw memory and intrusive
//! pointer structures living inside that memory. Every function that reads
//! or writes block state is `unsafe`; callers must uphold the invariants
//! documented on each one. [`checkheap`] exists to audit those invariants
//! from the outside without adding any runtime cost to the hot path.

pub mod allocator;
pub mod api;
pub mod block;
pub mod checkheap;
pub mod coalesce;
pub mod freelist;
pub mod heap;
pub mod placement;

pub use allocator::Allocator;
pub use api::{SegregatedAllocator, calloc, check, checkheap, free, init, malloc, realloc};
pub use checkheap::Violation;
