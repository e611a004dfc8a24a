use super::*;

/// Read-only views of the arena. None of these call the failure hooks.
impl QueueArena {
    /// Total size of the image in bytes.
    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Current value of the usage counter: `DATA_START` plus every occupied
    /// slot's span.
    pub fn usage(&self) -> u16 {
        layout::read_usage(self.image())
    }

    /// Bytes left before usage reaches capacity.
    pub fn available(&self) -> u16 {
        self.capacity.saturating_sub(self.usage())
    }

    /// Decoded table entry, `None` past the end of the table.
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        (index < MAX_QUEUES).then(|| self.state(index))
    }

    /// Byte offset of the queue's first element inside the image.
    pub fn offset_of(&self, handle: QueueHandle) -> Result<u16> {
        self.validate(handle)?;
        Ok(self.offset_before(handle.index()))
    }

    /// Number of bytes currently enqueued.
    pub fn len(&self, handle: QueueHandle) -> Result<usize> {
        let size = self.validate(handle)?;
        Ok((size - OVERHEAD) as usize)
    }

    pub fn is_empty(&self, handle: QueueHandle) -> Result<bool> {
        Ok(self.len(handle)? == 0)
    }

    /// The queue's elements, front first.
    pub fn contents(&self, handle: QueueHandle) -> Result<&[u8]> {
        let size = self.validate(handle)?;
        let start = self.offset_before(handle.index()) as usize;
        Ok(&self.image()[start..start + (size - OVERHEAD) as usize])
    }

    /// The front element without removing it.
    pub fn peek(&self, handle: QueueHandle) -> Result<Option<u8>> {
        Ok(self.contents(handle)?.first().copied())
    }

    /// Current handle for the queue in slot `index`.
    pub fn handle_at(&self, index: usize) -> Result<QueueHandle> {
        match self.slot_state(index) {
            Some(SlotState::Size(_)) => Ok(QueueHandle::new(index, self.generations[index])),
            _ => Err(IllegalOperation::InvalidHandle { index }.into()),
        }
    }

    /// Handles of every live queue, in slot order.
    pub fn queues(&self) -> Vec<QueueHandle> {
        (0..MAX_QUEUES)
            .filter(|&i| !self.state(i).is_unused())
            .map(|i| QueueHandle::new(i, self.generations[i]))
            .collect()
    }

    /// Number of occupied slots.
    pub fn queue_count(&self) -> usize {
        (0..MAX_QUEUES).filter(|&i| !self.state(i).is_unused()).count()
    }

    /// The raw image: table, counter and data region.
    pub fn as_bytes(&self) -> &[u8] {
        self.image()
    }

    /// Get a reference to the storage backend.
    pub fn backend(&self) -> &dyn ArenaBackend {
        &*self.backend
    }
}
