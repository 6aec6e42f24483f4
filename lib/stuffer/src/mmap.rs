//! Read-only private mappings of whole files.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::ptr;
use std::slice;

/// A private, read-only mapping of the first `len` bytes of a file.
///
/// The mapping is released with `munmap` when this value is dropped.
#[derive(Debug)]
pub struct Mmap {
    // Note that this is stored as a `usize` instead of a `*const` pointer to
    // allow this structure to be natively `Send` and `Sync` without
    // `unsafe impl`. The mapping is never written to after creation.
    ptr: usize,
    len: usize,
}

impl Mmap {
    /// Map `len` bytes of `fd`, starting at offset zero, as private and
    /// read-only memory.
    ///
    /// `len` must be non-zero; `mmap` rejects empty mappings with `EINVAL`.
    pub fn map_readonly(fd: BorrowedFd<'_>, len: usize) -> io::Result<Self> {
        if len == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "can not map an empty region",
            ));
        }

        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_PRIVATE,
                fd.as_raw_fd(),
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            ptr: ptr as usize,
            len,
        })
    }

    /// Return the mapped memory as a slice of u8.
    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr as *const u8, self.len) }
    }

    /// Return the length of the mapping.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for Mmap {
    fn drop(&mut self) {
        let r = unsafe { libc::munmap(self.ptr as *mut libc::c_void, self.len) };
        if r != 0 {
            tracing::error!(
                len = self.len,
                error = %io::Error::last_os_error(),
                "munmap failed"
            );
        }
    }
}

fn _assert() {
    fn _assert_send_sync<T: Send + Sync>() {}
    _assert_send_sync::<Mmap>();
}
