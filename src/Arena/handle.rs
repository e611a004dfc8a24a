use super::layout::MAX_QUEUES;

/// Opaque reference to one queue in an arena.
///
/// The slot index is the queue's identity; the generation tells apart
/// successive queues that reuse the same slot, so a handle kept past
/// `destroy_queue` is rejected instead of addressing the new occupant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueueHandle {
    index: u8,
    generation: u32,
}

const _: () = assert!(MAX_QUEUES <= u8::MAX as usize + 1);

impl QueueHandle {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        debug_assert!(index < MAX_QUEUES);
        Self {
            index: index as u8,
            generation,
        }
    }

    /// Table slot this handle addresses.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
