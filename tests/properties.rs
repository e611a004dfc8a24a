//! Property-based tests for the queue arena.
//!
//! Uses proptest to drive random operation sequences against a plain
//! `VecDeque` model and check the arena agrees after every step.

use std::collections::VecDeque;

use dmxp_queue_arena::Arena::layout::{DATA_START, MAX_QUEUES, OVERHEAD};
use dmxp_queue_arena::Arena::QueueHandle;
use dmxp_queue_arena::Core::alloc::QueueArena;
use dmxp_queue_arena::Core::hooks::NoopHooks;
use dmxp_queue_arena::Core::HeapMemory;
use proptest::prelude::*;

fn arena(capacity: u16) -> QueueArena {
    QueueArena::new(Box::new(HeapMemory::new(capacity as usize)), Box::new(NoopHooks)).unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Create,
    Destroy(usize),
    Enqueue(usize, u8),
    Dequeue(usize),
}

/// Strategy for generating operations; queue picks are resolved modulo the
/// live queue count when applied.
fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Create),
        1 => any::<usize>().prop_map(Op::Destroy),
        6 => (any::<usize>(), any::<u8>()).prop_map(|(q, b)| Op::Enqueue(q, b)),
        4 => any::<usize>().prop_map(Op::Dequeue),
    ]
}

/// Every live queue's contents, usage, and compaction match the model.
fn check_against_model(arena: &QueueArena, model: &[(QueueHandle, VecDeque<u8>)]) {
    let expected_usage: usize = DATA_START as usize
        + model
            .iter()
            .map(|(_, q)| q.len() + OVERHEAD as usize)
            .sum::<usize>();
    assert_eq!(arena.usage() as usize, expected_usage);
    assert_eq!(arena.queue_count(), model.len());

    let mut sorted: Vec<_> = model.iter().collect();
    sorted.sort_by_key(|(h, _)| h.index());

    let mut offset = DATA_START as usize;
    for (handle, queue) in sorted {
        assert_eq!(arena.offset_of(*handle).unwrap() as usize, offset);
        let contents = arena.contents(*handle).unwrap();
        assert!(contents.iter().eq(queue.iter()));
        offset += queue.len() + OVERHEAD as usize;
    }
    assert_eq!(offset, arena.usage() as usize);
}

proptest! {
    /// Arena behaves like one VecDeque per live queue
    #[test]
    fn arena_matches_model(ops in prop::collection::vec(op(), 1..400)) {
        let mut arena = arena(400);
        let mut model: Vec<(QueueHandle, VecDeque<u8>)> = Vec::new();

        for op in ops {
            match op {
                Op::Create => {
                    let fits = arena.usage() <= arena.capacity() - OVERHEAD - 2;
                    match arena.create_queue() {
                        Ok(handle) => {
                            prop_assert!(fits);
                            model.push((handle, VecDeque::new()));
                        }
                        Err(e) => {
                            prop_assert!(!fits && e.is_out_of_memory() || model.len() == MAX_QUEUES);
                        }
                    }
                }
                Op::Destroy(pick) if !model.is_empty() => {
                    let (handle, _) = model.remove(pick % model.len());
                    arena.destroy_queue(handle).unwrap();
                    prop_assert!(arena.destroy_queue(handle).is_err());
                }
                Op::Enqueue(pick, byte) if !model.is_empty() => {
                    let i = pick % model.len();
                    let full = arena.usage() >= arena.capacity();
                    match arena.enqueue_byte(model[i].0, byte) {
                        Ok(()) => {
                            prop_assert!(!full);
                            model[i].1.push_back(byte);
                        }
                        Err(e) => {
                            prop_assert!(full && e.is_out_of_memory());
                        }
                    }
                }
                Op::Dequeue(pick) if !model.is_empty() => {
                    let i = pick % model.len();
                    match model[i].1.pop_front() {
                        Some(expected) => {
                            prop_assert_eq!(arena.dequeue_byte(model[i].0).unwrap(), expected);
                        }
                        None => {
                            prop_assert!(arena.dequeue_byte(model[i].0).unwrap_err().is_illegal_operation());
                        }
                    }
                }
                _ => {}
            }
            check_against_model(&arena, &model);
        }
    }

    /// Bytes come out in the order they went in
    #[test]
    fn fifo_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..1500)) {
        let mut arena = arena(2048);
        let _before = arena.create_queue().unwrap();
        let q = arena.create_queue().unwrap();
        let _after = arena.create_queue().unwrap();

        for &b in &bytes {
            arena.enqueue_byte(q, b).unwrap();
        }
        let out: Vec<u8> = (0..bytes.len()).map(|_| arena.dequeue_byte(q).unwrap()).collect();
        prop_assert_eq!(out, bytes);
        prop_assert!(arena.is_empty(q).unwrap());
    }

    /// Interleaved traffic on two queues never crosses over
    #[test]
    fn queues_are_isolated(steps in prop::collection::vec((any::<bool>(), any::<bool>(), any::<u8>()), 0..600)) {
        let mut arena = arena(2048);
        let a = arena.create_queue().unwrap();
        let b = arena.create_queue().unwrap();
        let mut model_a = VecDeque::new();
        let mut model_b = VecDeque::new();

        for (use_a, push, byte) in steps {
            let (handle, model) = if use_a { (a, &mut model_a) } else { (b, &mut model_b) };
            if push {
                arena.enqueue_byte(handle, byte).unwrap();
                model.push_back(byte);
            } else if let Some(expected) = model.pop_front() {
                prop_assert_eq!(arena.dequeue_byte(handle).unwrap(), expected);
            }
        }
        prop_assert!(arena.contents(a).unwrap().iter().eq(model_a.iter()));
        prop_assert!(arena.contents(b).unwrap().iter().eq(model_b.iter()));
    }

    /// Creating then destroying a queue leaves the header untouched
    #[test]
    fn create_destroy_is_identity(fill in prop::collection::vec(0u8..20, 0..8)) {
        let mut arena = arena(2048);
        for (i, n) in fill.iter().enumerate() {
            let q = arena.create_queue().unwrap();
            for k in 0..*n {
                arena.enqueue_byte(q, (i as u8).wrapping_mul(31).wrapping_add(k)).unwrap();
            }
        }
        let header = arena.as_bytes()[..DATA_START as usize].to_vec();
        let live: Vec<Vec<u8>> = arena.queues().iter().map(|&q| arena.contents(q).unwrap().to_vec()).collect();

        let q = arena.create_queue().unwrap();
        arena.destroy_queue(q).unwrap();

        prop_assert_eq!(&arena.as_bytes()[..DATA_START as usize], header.as_slice());
        let after: Vec<Vec<u8>> = arena.queues().iter().map(|&q| arena.contents(q).unwrap().to_vec()).collect();
        prop_assert_eq!(after, live);
    }
}
