use crate::mmap::Mmap;

/// The memory region behind a [`Stuffer`](crate::Stuffer).
///
/// Each variant knows how its memory is released: owned heap memory is
/// freed, borrowed memory is left to its owner and mappings are unmapped.
#[derive(Debug, Default)]
pub enum Blob<'a> {
    /// No backing region at all.
    #[default]
    Empty,
    /// Heap memory owned by the stuffer.
    Owned(Vec<u8>),
    /// Caller memory the stuffer writes into but never frees.
    Borrowed(&'a mut [u8]),
    /// A private read-only mapping of a file.
    Mapped(Mmap),
}

impl Blob<'_> {
    /// Size of the region in bytes.
    pub fn len(&self) -> usize {
        match self {
            Blob::Empty => 0,
            Blob::Owned(data) => data.len(),
            Blob::Borrowed(data) => data.len(),
            Blob::Mapped(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there is any memory behind this blob.
    pub fn is_backed(&self) -> bool {
        !matches!(self, Blob::Empty)
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Blob::Mapped(_))
    }

    /// The whole region, or `None` when unbacked.
    pub fn as_slice(&self) -> Option<&[u8]> {
        match self {
            Blob::Empty => None,
            Blob::Owned(data) => Some(data.as_slice()),
            Blob::Borrowed(data) => Some(&data[..]),
            Blob::Mapped(map) => Some(map.as_slice()),
        }
    }

    /// The whole region for writing, or `None` when unbacked or read-only.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            Blob::Empty | Blob::Mapped(_) => None,
            Blob::Owned(data) => Some(data.as_mut_slice()),
            Blob::Borrowed(data) => Some(&mut data[..]),
        }
    }
}
