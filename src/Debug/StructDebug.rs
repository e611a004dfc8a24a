use std::fmt;
use crate::Arena::layout::OVERHEAD;
use crate::Arena::shared::SharedArena;
use crate::Core::alloc::QueueArena;

/// Debug function for QueueArena
///
/// Shows capacity, the usage counter, the backend handle and, per live
/// queue, its slot index and logical length. Queue contents are not printed.
pub fn debug_queue_arena(arena: &QueueArena, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let queues: Vec<(usize, u16)> = (0..crate::Arena::layout::MAX_QUEUES)
        .filter_map(|i| match arena.slot_state(i) {
            Some(crate::Arena::layout::SlotState::Size(n)) => Some((i, n - OVERHEAD)),
            _ => None,
        })
        .collect();

    f.debug_struct("QueueArena")
        .field("capacity", &arena.capacity())
        .field("usage", &arena.usage())
        .field("backend", &arena.backend().raw_handle())
        .field("queues", &queues)
        .finish()
}

/// Debug function for SharedArena
///
/// Does not block: a locked arena is shown as `<locked>`.
pub fn debug_shared_arena(shared: &SharedArena, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match shared.try_with(|arena| (arena.capacity(), arena.usage(), arena.queue_count())) {
        Some((capacity, usage, queues)) => f
            .debug_struct("SharedArena")
            .field("capacity", &capacity)
            .field("usage", &usage)
            .field("queues", &queues)
            .finish(),
        None => f
            .debug_struct("SharedArena")
            .field("arena", &"<locked>")
            .finish(),
    }
}
