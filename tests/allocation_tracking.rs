// Allocation tracking tests for the queue arena
//
// Note: Tests using dhat are marked with #[serial_test::serial] because
// dhat only allows one profiler to run at a time.
//
// # Run all allocation tracking tests
// cargo test --test allocation_tracking -- --nocapture

use dmxp_queue_arena::Core::alloc::QueueArena;
use dmxp_queue_arena::Core::hooks::NoopHooks;
use dmxp_queue_arena::Core::HeapMemory;

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[test]
#[serial_test::serial]
fn test_queue_operations_do_not_allocate() {
    let _profiler = dhat::Profiler::builder().testing().build();

    let mut arena =
        QueueArena::new(Box::new(HeapMemory::new(2048)), Box::new(NoopHooks)).unwrap();
    let queues: Vec<_> = (0..4).map(|_| arena.create_queue().unwrap()).collect();

    // warm up: first use of each log callsite may register it
    for &q in &queues {
        arena.enqueue_byte(q, 0).unwrap();
        arena.dequeue_byte(q).unwrap();
    }
    let q = arena.create_queue().unwrap();
    arena.destroy_queue(q).unwrap();

    let before = dhat::HeapStats::get();

    for i in 0..10_000u32 {
        let q = queues[(i % 4) as usize];
        arena.enqueue_byte(q, i as u8).unwrap();
        if arena.len(q).unwrap() > 16 {
            arena.dequeue_byte(q).unwrap();
        }
    }
    let q = arena.create_queue().unwrap();
    arena.destroy_queue(q).unwrap();

    let after = dhat::HeapStats::get();
    println!("Heap before: {:?}", before);
    println!("Heap after: {:?}", after);

    assert_eq!(
        after.total_blocks, before.total_blocks,
        "enqueue/dequeue/create/destroy should not touch the heap"
    );
}
