use crate::blob::Blob;
use crate::error::{Result, StufferError};
use crate::mmap::Mmap;

/// Smallest amount a growable stuffer grows by when it runs out of space.
pub const MIN_GROWTH: u32 = 1024;

/// A byte buffer with independent read and write cursors.
///
/// Bytes in `read_cursor..write_cursor` are readable, bytes in
/// `write_cursor..capacity` are free space. Every method keeps
/// `read_cursor <= write_cursor <= capacity <= u32::MAX`.
#[derive(Debug, Default)]
pub struct Stuffer<'a> {
    blob: Blob<'a>,
    read_cursor: u32,
    write_cursor: u32,
    growable: bool,
}

impl Stuffer<'static> {
    /// An empty stuffer without backing memory that grows on first write.
    pub fn new() -> Self {
        Self {
            growable: true,
            ..Default::default()
        }
    }

    /// A fixed-size stuffer backed by `size` zeroed heap bytes.
    pub fn alloc(size: u32) -> Result<Self> {
        Ok(Self {
            blob: Blob::Owned(zeroed(size)?),
            read_cursor: 0,
            write_cursor: 0,
            growable: false,
        })
    }

    /// A heap-backed stuffer with `size` bytes of initial capacity that grows as needed.
    pub fn growable_alloc(size: u32) -> Result<Self> {
        let mut stuffer = Self::alloc(size)?;
        stuffer.growable = true;
        Ok(stuffer)
    }

    /// A read-only stuffer whose whole content is the mapped file.
    ///
    /// The mapping is the backing memory; nothing is copied.
    pub fn from_mmap(map: Mmap) -> Result<Self> {
        let len = u32::try_from(map.len()).map_err(|_| StufferError::InvalidFileSize {
            size: i64::try_from(map.len()).unwrap_or(i64::MAX),
        })?;
        Ok(Self {
            blob: Blob::Mapped(map),
            read_cursor: 0,
            write_cursor: len,
            growable: false,
        })
    }
}

impl<'a> Stuffer<'a> {
    /// A fixed-size stuffer that writes into caller memory.
    pub fn from_slice(data: &'a mut [u8]) -> Result<Self> {
        if u32::try_from(data.len()).is_err() {
            return Err(StufferError::Alloc {
                requested: data.len() as u64,
            });
        }
        Ok(Self {
            blob: Blob::Borrowed(data),
            read_cursor: 0,
            write_cursor: 0,
            growable: false,
        })
    }

    pub fn blob(&self) -> &Blob<'a> {
        &self.blob
    }

    pub fn read_cursor(&self) -> u32 {
        self.read_cursor
    }

    pub fn write_cursor(&self) -> u32 {
        self.write_cursor
    }

    pub fn capacity(&self) -> u32 {
        // from_slice, from_mmap and reserve_space never let the blob exceed u32::MAX
        self.blob.len() as u32
    }

    pub fn is_growable(&self) -> bool {
        self.growable
    }

    pub fn is_read_only(&self) -> bool {
        self.blob.is_read_only()
    }

    /// Number of bytes that can still be read.
    pub fn data_available(&self) -> u32 {
        self.write_cursor - self.read_cursor
    }

    /// Number of bytes that can be written without growing.
    pub fn space_remaining(&self) -> u32 {
        self.capacity() - self.write_cursor
    }

    /// Check the cursor and ownership invariants.
    pub fn validate(&self) -> Result<()> {
        let capacity = self.blob.len();
        let sized = u32::try_from(capacity).is_ok();
        let ordered = self.read_cursor <= self.write_cursor
            && self.write_cursor as usize <= capacity;
        let growable_ok = !self.growable || matches!(self.blob, Blob::Empty | Blob::Owned(_));

        if sized && ordered && growable_ok {
            Ok(())
        } else {
            Err(StufferError::InvalidStuffer {
                read_cursor: self.read_cursor,
                write_cursor: self.write_cursor,
                capacity: capacity.min(u32::MAX as usize) as u32,
            })
        }
    }

    /// Make sure `n` bytes can be written, growing if allowed.
    pub fn reserve_space(&mut self, n: u32) -> Result<()> {
        let remaining = self.space_remaining();
        if remaining >= n {
            return Ok(());
        }
        if self.blob.is_read_only() {
            return Err(StufferError::ReadOnly);
        }
        if !self.growable {
            return Err(StufferError::StufferFull {
                requested: n,
                remaining,
            });
        }

        let needed = u64::from(n - remaining);
        let capacity = u64::from(self.capacity());
        if capacity + needed > u64::from(u32::MAX) {
            return Err(StufferError::Alloc {
                requested: capacity + needed,
            });
        }
        let growth = needed.max(u64::from(MIN_GROWTH));
        let new_size = (capacity + growth).min(u64::from(u32::MAX));
        self.resize(new_size as usize)
    }

    fn resize(&mut self, new_size: usize) -> Result<()> {
        if let Blob::Empty = self.blob {
            self.blob = Blob::Owned(Vec::new());
        }
        let Blob::Owned(data) = &mut self.blob else {
            unreachable!("only owned stuffers grow");
        };
        data.try_reserve_exact(new_size - data.len())
            .map_err(|_| StufferError::Alloc {
                requested: new_size as u64,
            })?;
        data.resize(new_size, 0);
        Ok(())
    }

    /// Claim `n` bytes of write space, advancing the write cursor.
    pub fn skip_write(&mut self, n: u32) -> Result<()> {
        self.reserve_space(n)?;
        self.write_cursor += n;
        Ok(())
    }

    /// Consume `n` readable bytes, advancing the read cursor.
    pub fn skip_read(&mut self, n: u32) -> Result<()> {
        let available = self.data_available();
        if available < n {
            return Err(StufferError::OutOfData {
                requested: n,
                available,
            });
        }
        self.read_cursor += n;
        Ok(())
    }

    /// Give back `n` bytes claimed by [`skip_write`](Self::skip_write).
    ///
    /// The write cursor never moves behind the read cursor.
    pub fn rewind_write(&mut self, n: u32) -> Result<()> {
        if n > self.data_available() {
            return Err(self.invalid());
        }
        self.write_cursor -= n;
        Ok(())
    }

    /// Give back `n` bytes consumed by [`skip_read`](Self::skip_read).
    pub fn rewind_read(&mut self, n: u32) -> Result<()> {
        if n > self.read_cursor {
            return Err(self.invalid());
        }
        self.read_cursor -= n;
        Ok(())
    }

    /// Append `data`, growing if allowed.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let n = u32::try_from(data.len()).map_err(|_| StufferError::Alloc {
            requested: data.len() as u64,
        })?;
        let start = self.write_cursor as usize;
        self.skip_write(n)?;
        match self.blob.as_mut_slice() {
            Some(region) => {
                region[start..start + data.len()].copy_from_slice(data);
                Ok(())
            }
            None => {
                self.write_cursor -= n;
                Err(StufferError::ReadOnly)
            }
        }
    }

    /// Consume and return the next `n` readable bytes.
    pub fn read_bytes(&mut self, n: u32) -> Result<&[u8]> {
        let start = self.read_cursor as usize;
        self.skip_read(n)?;
        Ok(self
            .blob
            .as_slice()
            .map_or(&[][..], |region| &region[start..start + n as usize]))
    }

    /// The readable bytes, without consuming them.
    pub fn data(&self) -> &[u8] {
        self.blob.as_slice().map_or(&[][..], |region| {
            &region[self.read_cursor as usize..self.write_cursor as usize]
        })
    }

    /// Make everything written so far readable again.
    pub fn reread(&mut self) {
        self.read_cursor = 0;
    }

    /// Forget all content, zeroing it where the memory is writable.
    pub fn wipe(&mut self) {
        let written = self.write_cursor as usize;
        if let Some(region) = self.blob.as_mut_slice() {
            region[..written].fill(0);
        }
        self.read_cursor = 0;
        self.write_cursor = 0;
    }

    /// The `len` bytes of free space starting at the write cursor.
    pub(crate) fn spare_mut(&mut self, len: u32) -> Option<&mut [u8]> {
        let start = self.write_cursor as usize;
        let region = self.blob.as_mut_slice()?;
        region.get_mut(start..start + len as usize)
    }

    /// The `len` readable bytes starting at the read cursor.
    pub(crate) fn unread(&self, len: u32) -> Option<&[u8]> {
        let start = self.read_cursor as usize;
        let region = self.blob.as_slice()?;
        region.get(start..start + len as usize)
    }

    fn invalid(&self) -> StufferError {
        StufferError::InvalidStuffer {
            read_cursor: self.read_cursor,
            write_cursor: self.write_cursor,
            capacity: self.capacity(),
        }
    }
}

fn zeroed(size: u32) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(size as usize)
        .map_err(|_| StufferError::Alloc {
            requested: u64::from(size),
        })?;
    data.resize(size as usize, 0);
    Ok(data)
}
