use std::io;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = StufferError> = std::result::Result<T, E>;

/// Error type for external users
#[derive(Error, Debug)]
pub enum StufferError {
    /// The cursors no longer describe a region inside the backing blob.
    /// This is a programming error and is reported before anything is touched.
    #[error("stuffer failed validation (read={read_cursor}, write={write_cursor}, capacity={capacity})")]
    InvalidStuffer {
        read_cursor: u32,
        write_cursor: u32,
        capacity: u32,
    },
    /// Fewer readable bytes are available than were requested
    #[error("out of data: requested {requested} bytes but only {available} available")]
    OutOfData { requested: u32, available: u32 },
    /// A fixed-size stuffer has no room for the requested write
    #[error("stuffer is full: requested {requested} bytes but only {remaining} remaining")]
    StufferFull { requested: u32, remaining: u32 },
    /// The stuffer wraps a read-only mapping and can not be written to
    #[error("stuffer is read-only")]
    ReadOnly,
    /// Growing the backing region failed
    #[error("could not grow stuffer to {requested} bytes")]
    Alloc { requested: u64 },
    /// A read from the descriptor failed, or there was no region to read into
    #[error("read failed")]
    Read(#[source] io::Error),
    /// A write to the descriptor failed, or there was no region to write from
    #[error("write failed")]
    Write(#[source] io::Error),
    /// Querying the size of the file failed
    #[error("fstat failed")]
    Fstat(#[source] io::Error),
    /// The file is empty or too large to be described by a 32-bit length
    #[error("invalid file size {size}")]
    InvalidFileSize { size: i64 },
    /// The file could not be mapped into memory
    #[error("mmap failed")]
    Mmap(#[source] io::Error),
    /// The path could not be opened for reading
    #[error("open failed")]
    Open(#[source] io::Error),
    /// The path can not be handed to the operating system (it contains a NUL byte)
    #[error("invalid path")]
    InvalidPath,
    /// Closing a descriptor that was opened internally failed
    #[error("close failed")]
    Close(#[source] io::Error),
    /// A transfer limit of zero bytes was configured
    #[error("transfer limits must allow at least one byte per call")]
    InvalidLimits,
}

impl StufferError {
    /// The underlying operating system error, if there is one.
    pub fn os_error(&self) -> Option<&io::Error> {
        match self {
            Self::Read(e)
            | Self::Write(e)
            | Self::Fstat(e)
            | Self::Mmap(e)
            | Self::Open(e)
            | Self::Close(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the caller can recover by supplying more data or more room.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OutOfData { .. } | Self::StufferFull { .. } | Self::Alloc { .. }
        )
    }
}

/// The error reported when a transfer hits a stuffer without any backing
/// memory to transfer into or out of.
pub(crate) fn unbacked() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "stuffer has no backing region")
}
