//! Integration tests driving the public facade (`rallocator::{malloc, free,
//! realloc, calloc, checkheap}`) exactly as an external client would,
//! covering spec.md §8's concrete scenarios and testable properties.

use std::sync::Mutex;

use rallocator::{calloc, check, free, init, malloc, realloc};

// All of these tests share one process-wide allocator (`rallocator::api`'s
// singleton), which keeps no locks of its own by design (spec.md §5). This
// mutex exists purely to keep this binary's own tests from interleaving
// their calls into that singleton; it says nothing about the allocator's
// own (deliberately absent) thread safety.
static LOCK: Mutex<()> = Mutex::new(());

#[test]
fn fresh_init_allocate_one_byte() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        assert!(init());
        let p = malloc(1);
        assert!(!p.is_null());
        assert_eq!((p as usize) % 8, 0, "P1: pointer must be 8-byte aligned");
        free(p);
        assert!(check().is_empty(), "heap must be consistent after free");
    }
}

#[test]
fn split_then_coalesce() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let a = malloc(40);
        let b = malloc(40);
        assert!(!a.is_null() && !b.is_null());
        assert_ne!(a, b, "P2: distinct live allocations must not overlap");

        free(a);
        free(b);

        let violations = check();
        assert!(violations.is_empty(), "violations: {:?}", violations);
    }
}

#[test]
fn extend_heap_does_not_mark_its_own_free_remainder_allocated() {
    // Any allocation past the first chunk forces `extend_heap` to run after
    // `init`'s own initial chunk; the new region's split leaves a free
    // remainder directly against the epilogue. Regression test for a case
    // where the fresh epilogue's prev-alloc bit didn't track that remainder.
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let p = malloc(8000);
        assert!(!p.is_null());
        let violations = check();
        assert!(violations.is_empty(), "violations: {:?}", violations);
        free(p);
        assert!(check().is_empty());
    }
}

#[test]
fn extend_on_exhaustion() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let p = malloc(100_000);
        assert!(!p.is_null());
        assert_eq!((p as usize) % 8, 0);
        assert!(check().is_empty());
        free(p);
    }
}

#[test]
fn realloc_shrink_then_grow_preserves_prefix() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let p = malloc(200);
        assert!(!p.is_null());
        std::ptr::write_bytes(p, 0xAA, 200);

        let q = realloc(p, 50);
        assert!(!q.is_null());

        let r = realloc(q, 200);
        assert!(!r.is_null());

        for i in 0..50 {
            assert_eq!(*r.add(i), 0xAA, "P9: realloc must preserve min(old, new) bytes");
        }
        free(r);
    }
}

#[test]
fn fragmentation_churn_keeps_invariants() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let mut sixty_fours = Vec::new();
        let mut seventy_twos = Vec::new();

        for _ in 0..1000 {
            sixty_fours.push(malloc(64));
            seventy_twos.push(malloc(72));
        }
        for p in &sixty_fours {
            assert!(!p.is_null());
        }
        for p in &seventy_twos {
            assert!(!p.is_null());
        }

        for p in sixty_fours.drain(..) {
            free(p);
        }

        let violations = check();
        assert!(violations.is_empty(), "violations: {:?}", violations);

        for p in seventy_twos.drain(..) {
            free(p);
        }
        assert!(check().is_empty());
    }
}

#[test]
fn calloc_zeroes_every_byte() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let p = calloc(37, 3);
        assert!(!p.is_null());
        for i in 0..111 {
            assert_eq!(*p.add(i), 0, "P8: calloc must zero every byte");
        }
        free(p);
    }
}

#[test]
fn calloc_overflow_yields_null() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        assert!(calloc(usize::MAX, 2).is_null());
    }
}

#[test]
fn malloc_zero_is_null_and_free_of_null_is_noop() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        assert!(malloc(0).is_null());
        free(std::ptr::null_mut());
    }
}

#[test]
fn realloc_of_null_delegates_to_malloc_and_zero_size_frees() {
    let _guard = LOCK.lock().unwrap();
    unsafe {
        let p = realloc(std::ptr::null_mut(), 16);
        assert!(!p.is_null());
        assert!(realloc(p, 0).is_null());
    }
}
