use crate::error::ArenaError;
use crate::Arena::ArenaBuilder;
use crate::Core::alloc::QueueArena;

// Error codes
const QARENA_SUCCESS: i32 = 0;
const QARENA_ERROR_NULL_POINTER: i32 = -1;
const QARENA_ERROR_INVALID_ARG: i32 = -2;
const QARENA_ERROR_OUT_OF_MEMORY: i32 = -3;
const QARENA_ERROR_ILLEGAL_OPERATION: i32 = -4;
const QARENA_ERROR_INTERNAL: i32 = -6;

/// Handle to an arena instance (opaque pointer)
pub struct ArenaHandle {
    inner: QueueArena,
}

fn error_code(err: &ArenaError) -> i32 {
    match err {
        ArenaError::OutOfMemory { .. } => QARENA_ERROR_OUT_OF_MEMORY,
        ArenaError::IllegalOperation(_) => QARENA_ERROR_ILLEGAL_OPERATION,
        ArenaError::InvalidCapacity { .. } => QARENA_ERROR_INVALID_ARG,
        _ => QARENA_ERROR_INTERNAL,
    }
}

/// Create a heap-backed arena.
///
/// # Arguments
/// * `capacity` - Total image size in bytes.
///
/// # Returns
/// * Pointer to `ArenaHandle`, or NULL on failure.
#[no_mangle]
pub extern "C" fn qarena_new(capacity: u16) -> *mut ArenaHandle {
    match ArenaBuilder::new().with_capacity(capacity).build() {
        Ok(arena) => Box::into_raw(Box::new(ArenaHandle { inner: arena })),
        Err(e) => {
            tracing::error!(error = %e, "FFI: failed to build arena");
            std::ptr::null_mut()
        }
    }
}

/// Free an arena handle.
#[no_mangle]
pub extern "C" fn qarena_free(handle: *mut ArenaHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle); // Dropped automatically
        }
    }
}

/// Create a queue.
///
/// # Arguments
/// * `out_index` - Receives the slot index identifying the queue.
///
/// # Returns
/// * 0 on success, negative error code otherwise.
#[no_mangle]
pub extern "C" fn qarena_create_queue(handle: *mut ArenaHandle, out_index: *mut u32) -> i32 {
    if handle.is_null() || out_index.is_null() {
        return QARENA_ERROR_NULL_POINTER;
    }

    let arena = unsafe { &mut (*handle).inner };
    match arena.create_queue() {
        Ok(queue) => {
            unsafe { *out_index = queue.index() as u32 };
            QARENA_SUCCESS
        }
        Err(e) => error_code(&e),
    }
}

/// Destroy the queue in slot `index`.
#[no_mangle]
pub extern "C" fn qarena_destroy_queue(handle: *mut ArenaHandle, index: u32) -> i32 {
    if handle.is_null() {
        return QARENA_ERROR_NULL_POINTER;
    }

    let arena = unsafe { &mut (*handle).inner };
    let result = arena
        .resolve_index(index as usize)
        .and_then(|queue| arena.destroy_queue(queue));
    match result {
        Ok(()) => QARENA_SUCCESS,
        Err(e) => error_code(&e),
    }
}

/// Append a byte to the queue in slot `index`.
#[no_mangle]
pub extern "C" fn qarena_enqueue(handle: *mut ArenaHandle, index: u32, byte: u8) -> i32 {
    if handle.is_null() {
        return QARENA_ERROR_NULL_POINTER;
    }

    let arena = unsafe { &mut (*handle).inner };
    let result = arena
        .resolve_index(index as usize)
        .and_then(|queue| arena.enqueue_byte(queue, byte));
    match result {
        Ok(()) => QARENA_SUCCESS,
        Err(e) => error_code(&e),
    }
}

/// Remove the front byte of the queue in slot `index`.
///
/// # Arguments
/// * `out_byte` - Receives the dequeued byte.
#[no_mangle]
pub extern "C" fn qarena_dequeue(handle: *mut ArenaHandle, index: u32, out_byte: *mut u8) -> i32 {
    if handle.is_null() || out_byte.is_null() {
        return QARENA_ERROR_NULL_POINTER;
    }

    let arena = unsafe { &mut (*handle).inner };
    let result = arena
        .resolve_index(index as usize)
        .and_then(|queue| arena.dequeue_byte(queue));
    match result {
        Ok(byte) => {
            unsafe { *out_byte = byte };
            QARENA_SUCCESS
        }
        Err(e) => error_code(&e),
    }
}

/// Current usage counter, or 0 for a NULL handle.
#[no_mangle]
pub extern "C" fn qarena_usage(handle: *const ArenaHandle) -> u16 {
    if handle.is_null() {
        return 0;
    }
    unsafe { (*handle).inner.usage() }
}
