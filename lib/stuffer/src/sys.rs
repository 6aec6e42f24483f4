//! Thin wrappers around the libc calls used by the transfer and loading code.

use std::ffi::CString;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Call `f` again for as long as it fails with `ErrorKind::Interrupted`.
///
/// Every other outcome, including `WouldBlock`, is returned as is.
pub fn retry_on_interrupt<T>(mut f: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    loop {
        match f() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                tracing::trace!("interrupted system call, retrying");
            }
            result => return result,
        }
    }
}

fn cvt(r: libc::ssize_t) -> io::Result<usize> {
    if r < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(r as usize)
    }
}

/// One `read(2)` into `buf`.
pub fn read(fd: BorrowedFd<'_>, buf: &mut [u8]) -> io::Result<usize> {
    cvt(unsafe { libc::read(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) })
}

/// One `write(2)` from `buf`.
pub fn write(fd: BorrowedFd<'_>, buf: &[u8]) -> io::Result<usize> {
    cvt(unsafe { libc::write(fd.as_raw_fd(), buf.as_ptr().cast(), buf.len()) })
}

/// One `open(2)` of `path` for reading.
pub fn open_readonly(path: &CString) -> io::Result<OwnedFd> {
    let fd = unsafe { libc::open(path.as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Close `fd`, reporting the error `close(2)` returns instead of ignoring it
/// the way dropping an `OwnedFd` does.
pub fn close(fd: OwnedFd) -> io::Result<()> {
    let res = unsafe { libc::close(fd.into_raw_fd()) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// The size reported by `fstat(2)`.
pub fn file_size(fd: BorrowedFd<'_>) -> io::Result<i64> {
    let mut st = unsafe { mem::zeroed::<libc::stat>() };
    let res = unsafe { libc::fstat(fd.as_raw_fd(), &mut st) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(i64::from(st.st_size))
}

/// Convert a path for handing to libc.
pub fn path_to_cstring(path: &Path) -> Option<CString> {
    CString::new(path.as_os_str().as_bytes()).ok()
}
