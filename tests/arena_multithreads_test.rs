use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use dmxp_queue_arena::Arena::layout::DATA_START;
use dmxp_queue_arena::Arena::{ArenaBuilder, SharedArena};
use dmxp_queue_arena::Core::hooks::NoopHooks;

fn shared(capacity: u16) -> Arc<SharedArena> {
    let arena = ArenaBuilder::new()
        .with_capacity(capacity)
        .with_hooks(Box::new(NoopHooks))
        .build()
        .expect("arena should build");
    Arc::new(SharedArena::new(arena))
}

#[test]
fn test_concurrent_queues_stay_isolated() {
    let threads = 8;
    let per_thread = 200;
    let arena = shared(4096);
    let barrier = Arc::new(Barrier::new(threads));
    let success = Arc::new(AtomicBool::new(true));

    let mut handles = vec![];
    for thread_id in 0..threads {
        let arena = arena.clone();
        let barrier = barrier.clone();
        let success = success.clone();

        handles.push(thread::spawn(move || {
            let queue = arena.create_queue().expect("create should succeed");
            barrier.wait();

            let tag = (thread_id as u8) << 5;
            let mut expected = std::collections::VecDeque::new();
            for i in 0..per_thread {
                let byte = tag | (i % 32) as u8;
                arena.enqueue_byte(queue, byte).expect("enqueue should succeed");
                expected.push_back(byte);

                // keep the queue short and interleave with other threads
                if fastrand::bool() {
                    let want = expected.pop_front().unwrap();
                    let got = arena.dequeue_byte(queue).expect("dequeue should succeed");
                    if got != want {
                        eprintln!("Thread {} expected {} got {}", thread_id, want, got);
                        success.store(false, Ordering::SeqCst);
                    }
                }
            }

            while let Some(want) = expected.pop_front() {
                if arena.dequeue_byte(queue).ok() != Some(want) {
                    success.store(false, Ordering::SeqCst);
                }
            }
            arena.destroy_queue(queue).expect("destroy should succeed");
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(success.load(Ordering::SeqCst), "One or more threads saw foreign bytes");
    assert_eq!(arena.with(|a| a.usage()), DATA_START);
    assert_eq!(arena.with(|a| a.queue_count()), 0);
}

#[test]
fn test_multi_step_sequence_under_one_lock() {
    let arena = shared(1024);
    let queue = arena.create_queue().unwrap();

    let drained = arena.with(|a| {
        for b in b"hello" {
            a.enqueue_byte(queue, *b).unwrap();
        }
        let mut out = Vec::new();
        while !a.is_empty(queue).unwrap() {
            out.push(a.dequeue_byte(queue).unwrap());
        }
        out
    });
    assert_eq!(drained, b"hello");

    let debug = format!("{:?}", arena);
    assert!(debug.contains("SharedArena"));
    assert!(debug.contains("queues: 1"));

    let inner = Arc::try_unwrap(arena).expect("no other owners").into_inner();
    assert_eq!(inner.queue_count(), 1);
}

#[test]
fn test_concurrent_create_destroy_churn() {
    let arena = shared(2048);
    let mut handles = vec![];

    for _ in 0..4 {
        let arena = arena.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                match arena.create_queue() {
                    Ok(queue) => {
                        let n = fastrand::u8(0..10);
                        for b in 0..n {
                            arena.enqueue_byte(queue, b).unwrap();
                        }
                        if fastrand::bool() {
                            for b in 0..n {
                                assert_eq!(arena.dequeue_byte(queue).unwrap(), b);
                            }
                        }
                        arena.destroy_queue(queue).unwrap();
                    }
                    Err(e) => panic!("create failed: {}", e),
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert_eq!(arena.with(|a| a.usage()), DATA_START);
}
