use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use strand::prelude::*;

#[test]
fn test_eight_cells_at_64_byte_boundaries() {
    let array = AlignedArray::<i32>::with_alignment(8, 64);
    assert_eq!(array.len(), 8);
    assert_eq!(array.alignment(), 64);

    let mut addrs: Vec<usize> = array.iter().map(|c| c as *const i32 as usize).collect();
    for &addr in &addrs {
        assert_eq!(addr % 64, 0);
    }
    addrs.sort_unstable();
    addrs.dedup();
    assert_eq!(addrs.len(), 8);
}

#[test]
fn test_wider_alignment() {
    let array = AlignedArray::<u8>::with_alignment(4, 4096);
    for cell in &array {
        assert_eq!(cell as *const u8 as usize % 4096, 0);
    }
}

#[test]
fn test_resize_discards_values() {
    let mut array = AlignedArray::<i32>::new(8);
    for cell in &mut array {
        *cell = 42;
    }

    array.resize(8);
    assert!(array.iter().all(|&v| v == 0));

    array.resize(3);
    assert_eq!(array.len(), 3);
    assert!(array.iter().all(|&v| v == 0));
}

#[test]
fn test_resize_with_alignment_takes_effect() {
    let mut array = AlignedArray::<u8>::with_alignment(2, 64);
    array.resize_with_alignment(2, 256);
    assert_eq!(array.alignment(), 256);
    for cell in &array {
        assert_eq!(cell as *const u8 as usize % 256, 0);
    }
}

#[test]
fn test_concurrent_per_thread_counters() {
    const THREADS: usize = 4;
    const INCREMENTS: u64 = 10_000;

    let counters = AlignedArray::<AtomicU64>::new(THREADS);

    thread::scope(|s| {
        for i in 0..THREADS {
            let counters = &counters;
            s.spawn(move || {
                for _ in 0..INCREMENTS {
                    counters[i].fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    for cell in &counters {
        assert_eq!(cell.load(Ordering::Relaxed), INCREMENTS);
    }
}

#[test]
fn test_clone_keeps_values_and_alignment() {
    let mut array = AlignedArray::<String>::with_alignment(3, 128);
    array[0] = "zero".to_string();
    array[2] = "two".to_string();

    let copy = array.clone();
    assert_eq!(copy.alignment(), 128);
    assert_eq!(copy[0], "zero");
    assert_eq!(copy[1], "");
    assert_eq!(copy[2], "two");

    for cell in &copy {
        assert_eq!(cell as *const String as usize % 128, 0);
    }
}

#[test]
fn test_unchecked_access_matches_indexing() {
    let mut array = AlignedArray::<u32>::new(4);
    array[3] = 9;
    // Safety: 3 < len.
    assert_eq!(unsafe { *array.get_unchecked(3) }, 9);
    unsafe { *array.get_unchecked_mut(3) = 10 };
    assert_eq!(array[3], 10);
}
