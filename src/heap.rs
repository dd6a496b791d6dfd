//! The heap-extension primitive, realized over `sbrk(2)`.
//!
//! This is the "external collaborator (not specified here)" of the
//! allocator's design: something that can only grow a single contiguous
//! region and cannot give pages back to the OS. `libc::sbrk` is exactly
//! that shape, and is the same collaborator the allocator this crate
//! generalizes already leaned on.

use libc::{c_void, intptr_t, sbrk};

/// The allocator's own error taxonomy. Presently a single variant; kept as
/// an enum (rather than `()`) so the public API's fallible internals read
/// the same way a richer allocator's would, and so call sites don't need
/// to change if a second failure mode is ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The heap primitive refused to grow the region (out of memory, or a
    /// resource limit such as `RLIMIT_DATA`).
    OutOfMemory,
}

/// Extends the heap by `n_bytes` and returns the address of the *old*
/// break (the first byte of the newly available region), or
/// `AllocError::OutOfMemory` if the primitive refused.
pub unsafe fn extend(n_bytes: usize) -> Result<*mut u8, AllocError> {
    unsafe {
        let old_break = sbrk(n_bytes as intptr_t);
        if old_break == usize::MAX as *mut c_void {
            Err(AllocError::OutOfMemory)
        } else {
            Ok(old_break as *mut u8)
        }
    }
}

/// The current program break, without moving it. Used by the integrity
/// checker to bound "is this pointer in the heap" queries.
pub unsafe fn current_break() -> *mut u8 {
    unsafe { sbrk(0) as *mut u8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_moves_the_break_forward() {
        unsafe {
            let before = current_break();
            let old = extend(64).expect("sbrk should succeed for a small request");
            let after = current_break();
            assert_eq!(old, before);
            assert!((after as usize) >= (before as usize) + 64);
        }
    }
}
