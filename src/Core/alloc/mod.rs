use crate::Arena::handle::QueueHandle;
use crate::Arena::layout::{
    self, SlotState, CHUNK_WIDTH, DATA_START, MAX_CAPACITY, MAX_QUEUES, MIN_CAPACITY, OVERHEAD,
};
use crate::Core::hooks::{FailureHooks, TracingHooks};
use crate::Core::shift::shift;
use crate::Core::SharedMemory::{ArenaBackend, HeapMemory};
use crate::error::{ArenaError, IllegalOperation, Result};
mod debug;
mod getters;

/// A fixed-capacity buffer holding up to `MAX_QUEUES` FIFO byte queues.
///
/// Queue data is kept packed in slot order directly after the header:
/// every mutation shifts the bytes behind the affected queue so there is
/// never a gap between live spans and nothing live past the usage counter.
///
/// A rejected operation calls the matching failure hook and returns an
/// error without touching the image.
pub struct QueueArena {
    backend: Box<dyn ArenaBackend>,
    capacity: u16,
    /// Bumped when a slot's queue is destroyed; process-local.
    generations: [u32; MAX_QUEUES],
    hooks: Box<dyn FailureHooks>,
}

fn checked_capacity(size: usize) -> Result<u16> {
    if size < MIN_CAPACITY as usize || size > MAX_CAPACITY as usize {
        return Err(ArenaError::InvalidCapacity {
            capacity: size,
            min: MIN_CAPACITY,
            max: MAX_CAPACITY,
        });
    }
    Ok(size as u16)
}

impl QueueArena {
    /// Initialize a fresh arena over `backend`: every slot unused, usage at
    /// `DATA_START`. Capacity is the backend's size.
    pub fn new(backend: Box<dyn ArenaBackend>, hooks: Box<dyn FailureHooks>) -> Result<Self> {
        let capacity = checked_capacity(backend.size())?;

        let mut arena = Self {
            backend,
            capacity,
            generations: [0; MAX_QUEUES],
            hooks,
        };
        layout::initialize(arena.image_mut());

        tracing::info!(capacity, "Initialized queue arena");
        Ok(arena)
    }

    /// Heap-backed arena with default hooks.
    pub fn with_capacity(capacity: u16) -> Result<Self> {
        Self::new(
            Box::new(HeapMemory::new(capacity as usize)),
            Box::new(TracingHooks),
        )
    }

    /// Open an image that was initialized elsewhere (typically by another
    /// process sharing the same region). The table and counter are checked
    /// for consistency before the arena is handed out.
    ///
    /// Handle generations are tracked per view, not in the image: a handle
    /// from this view is not invalidated when another view destroys and
    /// re-creates its slot. Refresh handles with `queues()` or `handle_at()`
    /// after other views may have mutated the table.
    pub fn attach(backend: Box<dyn ArenaBackend>, hooks: Box<dyn FailureHooks>) -> Result<Self> {
        let capacity = checked_capacity(backend.size())?;

        let arena = Self {
            backend,
            capacity,
            generations: [0; MAX_QUEUES],
            hooks,
        };
        arena.check_image()?;

        tracing::info!(
            capacity,
            usage = arena.usage(),
            queues = arena.queue_count(),
            "Attached to queue arena"
        );
        Ok(arena)
    }

    /// Create an empty queue in the first unused slot.
    ///
    /// The new queue's span sits between the spans of its lower- and
    /// higher-indexed neighbours, so everything behind it moves forward by
    /// `OVERHEAD` bytes.
    pub fn create_queue(&mut self) -> Result<QueueHandle> {
        let usage = self.usage();
        if usage > self.capacity - OVERHEAD - 2 {
            return self.reject(ArenaError::OutOfMemory {
                usage,
                requested: OVERHEAD,
                capacity: self.capacity,
            });
        }

        let Some(index) = (0..MAX_QUEUES).find(|&i| self.state(i).is_unused()) else {
            return self.reject(IllegalOperation::TableFull.into());
        };

        let offset = self.offset_before(index);
        let image = self.image_mut();
        shift(
            image,
            offset as usize,
            (usage - offset) as usize,
            OVERHEAD as isize,
            CHUNK_WIDTH,
        );
        layout::write_slot(image, index, SlotState::Size(OVERHEAD));
        layout::write_usage(image, usage + OVERHEAD);

        tracing::debug!(slot = index, offset, usage = usage + OVERHEAD, "Created queue");
        Ok(QueueHandle::new(index, self.generations[index]))
    }

    /// Destroy a queue, closing its whole span (data and overhead).
    pub fn destroy_queue(&mut self, handle: QueueHandle) -> Result<()> {
        let size = self.resolve(handle)?;
        let index = handle.index();
        let usage = self.usage();
        let offset = self.offset_before(index);
        let tail = offset + size;

        let image = self.image_mut();
        shift(
            image,
            tail as usize,
            (usage - tail) as usize,
            -(size as isize),
            CHUNK_WIDTH,
        );
        layout::write_usage(image, usage - size);
        layout::write_slot(image, index, SlotState::Unused);
        self.generations[index] = self.generations[index].wrapping_add(1);

        tracing::debug!(slot = index, offset, freed = size, usage = usage - size, "Destroyed queue");
        Ok(())
    }

    /// Append `byte` to the back of the queue.
    pub fn enqueue_byte(&mut self, handle: QueueHandle, byte: u8) -> Result<()> {
        let size = self.resolve(handle)?;
        let usage = self.usage();
        if usage >= self.capacity {
            return self.reject(ArenaError::OutOfMemory {
                usage,
                requested: 1,
                capacity: self.capacity,
            });
        }

        let index = handle.index();
        // End of this queue's reserved span; the first overhead byte
        // (end - OVERHEAD) becomes the new last element.
        let end = self.offset_before(index) + size;

        let image = self.image_mut();
        shift(image, end as usize, (usage - end) as usize, 1, CHUNK_WIDTH);
        image[(end - OVERHEAD) as usize] = byte;
        layout::write_usage(image, usage + 1);
        layout::write_slot(image, index, SlotState::Size(size + 1));

        tracing::trace!(slot = index, byte, len = size + 1 - OVERHEAD, "Enqueued byte");
        Ok(())
    }

    /// Remove and return the byte at the front of the queue.
    pub fn dequeue_byte(&mut self, handle: QueueHandle) -> Result<u8> {
        let size = self.resolve(handle)?;
        let index = handle.index();
        if size <= OVERHEAD {
            return self.reject(IllegalOperation::EmptyQueue { index }.into());
        }

        let usage = self.usage();
        let offset = self.offset_before(index);

        let image = self.image_mut();
        let byte = image[offset as usize];
        shift(
            image,
            offset as usize + 1,
            (usage - offset - 1) as usize,
            -1,
            CHUNK_WIDTH,
        );
        layout::write_usage(image, usage - 1);
        layout::write_slot(image, index, SlotState::Size(size - 1));

        tracing::trace!(slot = index, byte, len = size - 1 - OVERHEAD, "Dequeued byte");
        Ok(byte)
    }

    /// Span size of the queue `handle` addresses, or why it addresses none.
    fn validate(&self, handle: QueueHandle) -> std::result::Result<u16, IllegalOperation> {
        let index = handle.index();
        if index >= MAX_QUEUES {
            return Err(IllegalOperation::InvalidHandle { index });
        }
        if self.generations[index] != handle.generation() {
            return Err(IllegalOperation::StaleHandle { index });
        }
        match self.state(index) {
            SlotState::Unused => Err(IllegalOperation::InvalidHandle { index }),
            SlotState::Size(size) => Ok(size),
        }
    }

    /// `validate`, reporting a failure through the hooks.
    fn resolve(&self, handle: QueueHandle) -> Result<u16> {
        match self.validate(handle) {
            Ok(size) => Ok(size),
            Err(reason) => self.reject(reason.into()),
        }
    }

    /// `handle_at` for callers that only carry a slot index; a failure is
    /// reported through the hooks like any other rejected operation.
    pub(crate) fn resolve_index(&self, index: usize) -> Result<QueueHandle> {
        match self.handle_at(index) {
            Ok(handle) => Ok(handle),
            Err(error) => self.reject(error),
        }
    }

    fn reject<T>(&self, error: ArenaError) -> Result<T> {
        if error.is_out_of_memory() {
            self.hooks.on_out_of_memory(&error);
        } else {
            self.hooks.on_illegal_operation(&error);
        }
        Err(error)
    }

    #[inline]
    fn state(&self, index: usize) -> SlotState {
        layout::read_slot(self.image(), index)
    }

    /// Data-region offset of slot `index`: `DATA_START` plus the spans of
    /// every occupied lower-indexed slot.
    fn offset_before(&self, index: usize) -> u16 {
        let image = self.image();
        (0..index).fold(DATA_START, |offset, i| {
            offset + layout::read_slot(image, i).span()
        })
    }

    #[inline]
    fn image(&self) -> &[u8] {
        self.backend.as_slice()
    }

    #[inline]
    fn image_mut(&mut self) -> &mut [u8] {
        self.backend.as_mut_slice()
    }

    fn check_image(&self) -> Result<()> {
        let usage = self.usage();
        if usage < DATA_START || usage > self.capacity {
            return Err(ArenaError::CorruptImage(format!(
                "usage counter {} outside {}..={}",
                usage, DATA_START, self.capacity
            )));
        }

        let mut total = DATA_START as u32;
        for index in 0..MAX_QUEUES {
            if let SlotState::Size(size) = self.state(index) {
                if size < OVERHEAD {
                    return Err(ArenaError::CorruptImage(format!(
                        "slot {} holds size {} below overhead {}",
                        index, size, OVERHEAD
                    )));
                }
                total += size as u32;
            }
        }

        if total != usage as u32 {
            return Err(ArenaError::CorruptImage(format!(
                "slot sizes sum to {} but usage counter is {}",
                total, usage
            )));
        }
        Ok(())
    }
}
