// Module naming follows project convention (Core = storage and queue engine,
// Arena = image layout and the types callers hold)
#[allow(non_snake_case)]
pub mod Arena {
    pub mod builder;
    pub mod handle;
    pub mod layout;
    pub mod shared;
    pub use builder::ArenaBuilder; // re-export for stable path
    pub use handle::QueueHandle;
    pub use layout::SlotState;
    pub use shared::SharedArena;
}
#[allow(non_snake_case)]
pub mod Core {
    pub mod SharedMemory;
    pub use SharedMemory::{
        attach_shared_memory, create_shared_memory, unlink_shared_memory, ArenaBackend,
        HeapMemory, RawHandle,
    };
    pub mod alloc;
    pub mod hooks;
    pub mod shift;
}
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}
pub mod error;
pub mod ffi;

pub use error::{ArenaError, IllegalOperation, Result};
