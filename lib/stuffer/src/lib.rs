//! `stuffer` bridges raw file descriptors and [`Stuffer`], a byte buffer
//! with independent read and write cursors.
//!
//! Four operations sit on top of the buffer:
//!
//! - [`Stuffer::recv_from_fd`] reads from a descriptor into free space,
//! - [`Stuffer::send_to_fd`] writes readable bytes out to a descriptor,
//! - [`Stuffer::alloc_ro_from_fd`] and [`Stuffer::alloc_ro_from_file`] map a
//!   whole file into a read-only stuffer without copying it.
//!
//! All calls block. A system call interrupted by a signal is retried, every
//! other failure is returned as a [`StufferError`].
//!
//! ```no_run
//! use std::os::fd::AsFd;
//! use stuffer::Stuffer;
//!
//! # fn main() -> stuffer::Result<()> {
//! let input = Stuffer::alloc_ro_from_file("/etc/hostname")?;
//! let mut output = Stuffer::new();
//! output.write_bytes(input.data())?;
//! let n = output.send_to_fd(std::io::stdout().as_fd(), output.data_available())?;
//! # let _ = n;
//! # Ok(())
//! # }
//! ```

#![cfg(unix)]

mod blob;
mod error;
mod fd;
mod file;
mod limits;
mod mmap;
mod stuffer;
mod sys;

pub use crate::blob::Blob;
pub use crate::error::{Result, StufferError};
pub use crate::limits::{PLATFORM_MAX_SINGLE_TRANSFER, TransferLimits};
pub use crate::mmap::Mmap;
pub use crate::stuffer::{MIN_GROWTH, Stuffer};
