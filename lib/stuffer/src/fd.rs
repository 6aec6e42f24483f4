//! Moving bytes between a [`Stuffer`] and a raw file descriptor.
//!
//! Each call performs at most one `read(2)` or `write(2)` (plus any retries
//! after `EINTR`), so a call may move fewer bytes than requested. Callers that
//! need an exact amount loop until the returned counts add up, or until a
//! zero count signals end of stream.

use std::io;
use std::os::fd::BorrowedFd;

use crate::error::{Result, StufferError, unbacked};
use crate::limits::TransferLimits;
use crate::stuffer::Stuffer;
use crate::sys;

impl Stuffer<'_> {
    /// Read up to `len` bytes from `fd` into the free space after the write
    /// cursor, returning how many bytes were read.
    ///
    /// Room for all `len` bytes is reserved up front (growing the stuffer if
    /// it is growable) even though the read itself may be shorter.
    pub fn recv_from_fd(&mut self, fd: BorrowedFd<'_>, len: u32) -> Result<u32> {
        self.recv_from_fd_with(fd, len, &TransferLimits::default())
    }

    /// [`recv_from_fd`](Self::recv_from_fd) with explicit transfer limits.
    pub fn recv_from_fd_with(
        &mut self,
        fd: BorrowedFd<'_>,
        len: u32,
        limits: &TransferLimits,
    ) -> Result<u32> {
        self.recv_with(len, limits, |buf| sys::read(fd, buf))
    }

    /// Write up to `len` readable bytes to `fd`, returning how many bytes
    /// were written. Only the written bytes are consumed.
    pub fn send_to_fd(&mut self, fd: BorrowedFd<'_>, len: u32) -> Result<u32> {
        self.send_to_fd_with(fd, len, &TransferLimits::default())
    }

    /// [`send_to_fd`](Self::send_to_fd) with explicit transfer limits.
    pub fn send_to_fd_with(
        &mut self,
        fd: BorrowedFd<'_>,
        len: u32,
        limits: &TransferLimits,
    ) -> Result<u32> {
        self.send_with(len, limits, |buf| sys::write(fd, buf))
    }

    pub(crate) fn recv_with(
        &mut self,
        len: u32,
        limits: &TransferLimits,
        mut read: impl FnMut(&mut [u8]) -> io::Result<usize>,
    ) -> Result<u32> {
        self.validate()?;
        limits.validate()?;

        // Make sure we have enough space to write
        self.skip_write(len)?;
        let rlen = limits.clamp(len);
        // Only what the read reports gets committed
        self.rewind_write(len)?;

        let buf = self
            .spare_mut(rlen)
            .ok_or_else(|| StufferError::Read(unbacked()))?;
        let r = sys::retry_on_interrupt(|| read(&mut *buf)).map_err(StufferError::Read)?;
        let r = checked_count(r, rlen).map_err(StufferError::Read)?;

        self.skip_write(r)?;
        tracing::trace!(requested = len, clamped = rlen, read = r, "recv_from_fd");
        Ok(r)
    }

    pub(crate) fn send_with(
        &mut self,
        len: u32,
        limits: &TransferLimits,
        mut write: impl FnMut(&[u8]) -> io::Result<usize>,
    ) -> Result<u32> {
        self.validate()?;
        limits.validate()?;

        // Make sure we even have the data
        self.skip_read(len)?;
        self.rewind_read(len)?;
        let wlen = limits
            .clamp(len)
            .min(u32::MAX - self.read_cursor());

        let buf = self
            .unread(wlen)
            .ok_or_else(|| StufferError::Write(unbacked()))?;
        let w = sys::retry_on_interrupt(|| write(buf)).map_err(StufferError::Write)?;
        let w = checked_count(w, wlen).map_err(StufferError::Write)?;

        self.skip_read(w)?;
        tracing::trace!(requested = len, clamped = wlen, written = w, "send_to_fd");
        Ok(w)
    }
}

fn checked_count(n: usize, limit: u32) -> io::Result<u32> {
    match u32::try_from(n) {
        Ok(n) if n <= limit => Ok(n),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("transferred {n} bytes but at most {limit} were requested"),
        )),
    }
}
