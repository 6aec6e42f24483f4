use std::os::fd::{AsFd, BorrowedFd};
use std::path::Path;

use crate::error::{Result, StufferError};
use crate::mmap::Mmap;
use crate::stuffer::Stuffer;
use crate::sys;

impl Stuffer<'static> {
    /// Map the whole file behind `fd` into a read-only stuffer.
    ///
    /// The file must be non-empty and no larger than `u32::MAX` bytes. The
    /// descriptor stays owned by the caller and may be closed afterwards;
    /// the mapping lives as long as the returned stuffer.
    pub fn alloc_ro_from_fd(fd: BorrowedFd<'_>) -> Result<Self> {
        let size = sys::file_size(fd).map_err(StufferError::Fstat)?;
        if size <= 0 || size > i64::from(u32::MAX) {
            return Err(StufferError::InvalidFileSize { size });
        }

        let map = Mmap::map_readonly(fd, size as usize).map_err(StufferError::Mmap)?;
        tracing::debug!(size, "mapped file into read-only stuffer");
        Stuffer::from_mmap(map)
    }

    /// Open `path` and map its whole content into a read-only stuffer.
    ///
    /// The descriptor opened here is always closed before returning.
    pub fn alloc_ro_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cpath = sys::path_to_cstring(path).ok_or(StufferError::InvalidPath)?;
        let fd = sys::retry_on_interrupt(|| sys::open_readonly(&cpath))
            .map_err(StufferError::Open)?;

        let loaded = Self::alloc_ro_from_fd(fd.as_fd());

        match (loaded, sys::close(fd)) {
            (Ok(stuffer), Ok(())) => Ok(stuffer),
            (Ok(_), Err(e)) => Err(StufferError::Close(e)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "close failed after a failed load");
                Err(err)
            }
        }
    }
}
