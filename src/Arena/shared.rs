use std::fmt;

use parking_lot::Mutex;

use super::handle::QueueHandle;
use crate::error::Result;
use crate::Core::alloc::QueueArena;

/// A `QueueArena` behind one exclusive lock.
///
/// Every operation may move bytes belonging to any queue, so the whole arena
/// is guarded as a unit; there is no per-queue locking.
pub struct SharedArena {
    inner: Mutex<QueueArena>,
}

impl SharedArena {
    pub fn new(arena: QueueArena) -> Self {
        Self {
            inner: Mutex::new(arena),
        }
    }

    pub fn create_queue(&self) -> Result<QueueHandle> {
        self.inner.lock().create_queue()
    }

    pub fn destroy_queue(&self, handle: QueueHandle) -> Result<()> {
        self.inner.lock().destroy_queue(handle)
    }

    pub fn enqueue_byte(&self, handle: QueueHandle, byte: u8) -> Result<()> {
        self.inner.lock().enqueue_byte(handle, byte)
    }

    pub fn dequeue_byte(&self, handle: QueueHandle) -> Result<u8> {
        self.inner.lock().dequeue_byte(handle)
    }

    /// Run several operations under a single lock acquisition.
    pub fn with<R>(&self, f: impl FnOnce(&mut QueueArena) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Like `with`, but returns `None` instead of waiting if the arena is
    /// currently locked.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut QueueArena) -> R) -> Option<R> {
        let mut guard = self.inner.try_lock()?;
        Some(f(&mut guard))
    }

    pub fn into_inner(self) -> QueueArena {
        self.inner.into_inner()
    }
}

impl fmt::Debug for SharedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_shared_arena(self, f)
    }
}
