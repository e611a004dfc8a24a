// Storage backends for an arena image.
// Heap storage for in-process use, /dev/shm + mmap for sharing one image
// between processes.

use std::fmt::Debug;
use std::io;

/// Byte storage an arena lives in.
pub trait ArenaBackend: Send + Sync + Debug {
    /// The whole mapped region.
    fn as_slice(&self) -> &[u8];

    /// The whole mapped region, writable.
    fn as_mut_slice(&mut self) -> &mut [u8];

    /// Size of the region in bytes.
    fn size(&self) -> usize {
        self.as_slice().len()
    }

    /// Get the underlying OS handle, if any.
    fn raw_handle(&self) -> RawHandle;
}

/// Platform-specific handle type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawHandle {
    /// Unix file descriptor (Linux)
    Fd(i32),
    /// Private process memory, no OS handle.
    Heap,
}

/// Zero-initialized process-private storage.
#[derive(Debug)]
pub struct HeapMemory {
    bytes: Box<[u8]>,
}

impl HeapMemory {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0u8; size].into_boxed_slice(),
        }
    }
}

impl ArenaBackend for HeapMemory {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    fn raw_handle(&self) -> RawHandle {
        RawHandle::Heap
    }
}

/// Create a new shared memory region with the specified size
///
/// # Arguments
/// * `size` - Size of the shared memory region in bytes
/// * `name` - Name of the file under /dev/shm other processes attach to
///
/// # Returns
/// A boxed trait object implementing ArenaBackend
#[cfg(target_os = "linux")]
pub fn create_shared_memory(size: usize, name: &str) -> io::Result<Box<dyn ArenaBackend>> {
    Ok(Box::new(LinuxSharedMemory::create(size, name)?))
}

/// Attach to an existing shared memory region
///
/// # Arguments
/// * `name` - Name of the shared memory region to attach to
/// * `size` - Minimum size the region must have
#[cfg(target_os = "linux")]
pub fn attach_shared_memory(name: &str, size: usize) -> io::Result<Box<dyn ArenaBackend>> {
    Ok(Box::new(LinuxSharedMemory::attach(name, size)?))
}

/// Remove a named region from /dev/shm. Existing mappings stay valid.
#[cfg(target_os = "linux")]
pub fn unlink_shared_memory(name: &str) -> io::Result<()> {
    std::fs::remove_file(shm_path(name))
}

#[cfg(not(target_os = "linux"))]
pub fn create_shared_memory(_size: usize, _name: &str) -> io::Result<Box<dyn ArenaBackend>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Shared memory only supported on Linux",
    ))
}

#[cfg(not(target_os = "linux"))]
pub fn attach_shared_memory(_name: &str, _size: usize) -> io::Result<Box<dyn ArenaBackend>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Shared memory only supported on Linux",
    ))
}

#[cfg(not(target_os = "linux"))]
pub fn unlink_shared_memory(_name: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Shared memory only supported on Linux",
    ))
}

#[cfg(target_os = "linux")]
fn shm_path(name: &str) -> String {
    format!("/dev/shm/{}", name)
}

#[cfg(target_os = "linux")]
pub use linux::LinuxSharedMemory;

#[cfg(target_os = "linux")]
mod linux {
    use super::{shm_path, ArenaBackend, RawHandle};
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::os::fd::{AsRawFd, IntoRawFd};
    use std::os::unix::fs::OpenOptionsExt;
    use std::ptr::{self, NonNull};

    /// A MAP_SHARED mapping of a file under /dev/shm.
    #[derive(Debug)]
    pub struct LinuxSharedMemory {
        ptr: NonNull<u8>,
        size: usize,
        fd: i32,
    }

    // The mapping is owned by this value; access goes through &self / &mut self.
    unsafe impl Send for LinuxSharedMemory {}
    unsafe impl Sync for LinuxSharedMemory {}

    impl LinuxSharedMemory {
        /// Create (or truncate) `/dev/shm/<name>` and map `size` bytes of it.
        pub fn create(size: usize, name: &str) -> io::Result<Self> {
            let path = shm_path(name);

            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("Failed to create shared memory file at {}: {}", path, e),
                    )
                })?;

            if unsafe { libc::ftruncate(file.as_raw_fd(), size as libc::off_t) } != 0 {
                return Err(io::Error::last_os_error());
            }

            Self::map(file, size)
        }

        /// Map an existing `/dev/shm/<name>` that is at least `min_size` bytes.
        pub fn attach(name: &str, min_size: usize) -> io::Result<Self> {
            let path = shm_path(name);

            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(&path)
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Failed to open shared memory at {}: {}", path, e),
                    )
                })?;

            let file_size = file.metadata()?.len() as usize;
            if file_size < min_size {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Shared memory size too small: expected at least {} bytes, got {}",
                        min_size, file_size
                    ),
                ));
            }

            Self::map(file, file_size)
        }

        fn map(file: File, size: usize) -> io::Result<Self> {
            if size == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Cannot map an empty shared memory region",
                ));
            }

            // Keep the file descriptor alive for the lifetime of the mapping
            let fd = file.into_raw_fd();

            let raw = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_SHARED,
                    fd,
                    0,
                )
            };

            if raw == libc::MAP_FAILED {
                let err = io::Error::last_os_error();
                unsafe { libc::close(fd) };
                return Err(err);
            }

            let ptr = match NonNull::new(raw as *mut u8) {
                Some(ptr) => ptr,
                None => {
                    unsafe { libc::close(fd) };
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        "mmap returned a null mapping",
                    ));
                }
            };

            Ok(Self { ptr, size, fd })
        }
    }

    impl Drop for LinuxSharedMemory {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.size);
                libc::close(self.fd);
            }
        }
    }

    impl ArenaBackend for LinuxSharedMemory {
        fn as_slice(&self) -> &[u8] {
            // The mapping is valid for `size` bytes until drop.
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
        }

        fn as_mut_slice(&mut self) -> &mut [u8] {
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
        }

        fn size(&self) -> usize {
            self.size
        }

        fn raw_handle(&self) -> RawHandle {
            RawHandle::Fd(self.fd)
        }
    }
}
