//! Drives the allocator through `#[global_allocator]`, the way
//! `jfrimmel-emballoc`'s own integration tests do, to exercise the
//! `GlobalAlloc` adapter end to end against ordinary collection types
//! rather than against the raw `malloc`/`free` facade.

use std::collections::BTreeMap;

use rallocator::SegregatedAllocator;

#[global_allocator]
static ALLOCATOR: SegregatedAllocator = SegregatedAllocator;

// Every allocation in this process — including the test harness's own —
// now flows through `ALLOCATOR`. Kept to a single test function so no two
// test bodies ever run concurrently against the same non-reentrant
// allocator state.
#[test]
fn collections_round_trip_through_the_global_allocator() {
    let mut v = vec![1, 2, 3];
    v.push(4);
    assert_eq!(v, vec![1, 2, 3, 4]);

    let mut map = BTreeMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);
    assert_eq!(map.values().sum::<i32>(), 6);

    let s = format!("{:?} has {} entries", map, map.len());
    assert!(s.contains("3 entries"));

    let big: Vec<u64> = (0..10_000).collect();
    assert_eq!(big.len(), 10_000);
    assert_eq!(big.iter().sum::<u64>(), 10_000 * 9_999 / 2);

    drop(big);
    drop(v);
    drop(map);
}
