use std::io::Read;
use std::ptr;

use rallocator::{calloc, checkheap, free, malloc, realloc};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, `gdb`, or just visually track how allocations change the
/// program break.
fn block_until_enter_pressed() {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
}

unsafe fn print_program_break(label: &str) {
    println!(
        "[{}] PID = {}, program break (sbrk(0)) = {:?}",
        label,
        std::process::id(),
        unsafe { libc::sbrk(0) },
    );
}

fn main() {
    unsafe {
        print_program_break("start");
        block_until_enter_pressed();

        // --------------------------------------------------------------
        // 1) Allocate a u32 and a 12-byte buffer; show the free list
        //    reuses freed space rather than always growing the heap.
        // --------------------------------------------------------------
        let first = malloc(4) as *mut u32;
        println!("\n[1] Allocate u32 at {:?}", first);
        first.write(0xDEADBEEF);

        let second = malloc(12);
        println!("[2] Allocate [u8; 12] at {:?}", second);
        ptr::write_bytes(second, 0xAB, 12);

        block_until_enter_pressed();

        // --------------------------------------------------------------
        // 2) Free the u32, then allocate something that fits in its
        //    place. Unlike a pure bump allocator, the segregated free
        //    list can hand this block right back out.
        // --------------------------------------------------------------
        free(first as *mut u8);
        println!("\n[3] Freed first block at {:?}", first);

        let reused = malloc(4) as *mut u32;
        println!(
            "[4] Allocate another u32 at {:?} (reused = {})",
            reused,
            reused == first
        );

        block_until_enter_pressed();

        // --------------------------------------------------------------
        // 3) realloc growing past the original block's capacity.
        // --------------------------------------------------------------
        let grown = realloc(second, 128);
        println!("\n[5] realloc([u8; 12] -> 128) = {:?}", grown);
        for i in 0..12 {
            assert_eq!(*grown.add(i), 0xAB);
        }

        block_until_enter_pressed();

        // --------------------------------------------------------------
        // 4) calloc, and a validity check with checkheap.
        // --------------------------------------------------------------
        let zeroed = calloc(16, 4);
        println!("\n[6] calloc(16, 4) = {:?}", zeroed);

        checkheap(line!());
        println!("[7] checkheap ran; any violations were printed above this line.");

        block_until_enter_pressed();

        // --------------------------------------------------------------
        // 5) A large allocation to observe heap growth.
        // --------------------------------------------------------------
        print_program_break("before large alloc");
        let big = malloc(64 * 1024);
        println!("\n[8] Allocate large 64 KiB block at {:?}", big);
        print_program_break("after large alloc");

        free(big);
        free(grown);
        free(reused);
        free(zeroed);

        println!("\n[9] End of demo. Process will exit and the OS will reclaim all memory.");
    }
}
