use super::layout::DEFAULT_CAPACITY;
use crate::error::Result;
use crate::Core::alloc::QueueArena;
use crate::Core::hooks::{FailureHooks, TracingHooks};
use crate::Core::SharedMemory::{
    attach_shared_memory, create_shared_memory, ArenaBackend, HeapMemory,
};

/// Configures and opens a `QueueArena`.
pub struct ArenaBuilder {
    capacity: u16,
    shm_name: Option<String>,
    hooks: Box<dyn FailureHooks>,
}

impl Default for ArenaBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            shm_name: None, // heap storage
            hooks: Box::new(TracingHooks),
        }
    }
}

impl ArenaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: u16) -> Self {
        self.capacity = capacity;
        self
    }

    /// Host the arena in `/dev/shm/<name>` instead of process memory.
    pub fn with_shared_memory(mut self, name: impl Into<String>) -> Self {
        self.shm_name = Some(name.into());
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn FailureHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Allocate storage and initialize an empty arena in it.
    pub fn build(self) -> Result<QueueArena> {
        let backend: Box<dyn ArenaBackend> = match &self.shm_name {
            Some(name) => create_shared_memory(self.capacity as usize, name)?,
            None => Box::new(HeapMemory::new(self.capacity as usize)),
        };
        QueueArena::new(backend, self.hooks)
    }

    /// Open an arena another process already initialized in shared memory.
    /// Requires `with_shared_memory`; the configured capacity is the
    /// minimum size the region must have.
    pub fn attach(self) -> Result<QueueArena> {
        let Some(name) = &self.shm_name else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "attach requires a shared memory name",
            )
            .into());
        };
        let backend = attach_shared_memory(name, self.capacity as usize)?;
        QueueArena::attach(backend, self.hooks)
    }
}
