//! File-backed archive variants: streaming write and streaming read.
//!
//! These share the operation contract of their in-memory counterparts but
//! move bytes through a buffered file handle instead of a span. The layout
//! they produce and expect is byte-identical to [`BufferWriter`] /
//! [`MapReader`](crate::MapReader): padding is computed against the same
//! accumulated offset, so a file written by one strategy loads through any
//! other.
//!
//! [`BufferWriter`]: crate::BufferWriter

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::mem;
use std::path::Path;

use crate::align::padding_for;
use crate::archive::{wrong_mode, Archive};
use crate::error::{MapbinError, Result};
use crate::mode::Mode;
use crate::source::{ByteView, DataSource};

/// Reusable zero block for padding gaps. Any single gap is smaller than the
/// largest alignment a description can declare, which is bounded by scalar
/// alignment (at most 16); 4 KiB leaves generous headroom.
const ZERO_PADDING: [u8; 4096] = [0; 4096];

// --- StreamWriter ---

/// The write archive whose sink is a file.
///
/// Padding and payload are emitted directly to the (buffered) file handle;
/// nothing is staged in memory beyond the `BufWriter` block, so values far
/// larger than RAM can be saved.
#[derive(Debug)]
pub struct StreamWriter {
    sink: BufWriter<File>,
    total: u64,
}

impl StreamWriter {
    /// Creates (truncating) the file at `path` and positions the archive at
    /// offset 0.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            sink: BufWriter::new(file),
            total: 0,
        })
    }

    /// Flushes buffered bytes to the file. Must be called after the
    /// description completes; dropping the archive without finishing may
    /// lose the tail of the stream.
    pub fn finish(mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

impl Archive for StreamWriter {
    const MODE: Mode = Mode::Write;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, bytes: &[u8], align: usize) -> Result<()> {
        let padding = padding_for(self.total, align);
        if padding > ZERO_PADDING.len() {
            return Err(MapbinError::misuse(format!(
                "padding gap of {padding} bytes (alignment {align}) exceeds the {}-byte pad buffer",
                ZERO_PADDING.len()
            )));
        }
        self.sink.write_all(&ZERO_PADDING[..padding])?;
        self.sink.write_all(bytes)?;
        self.total += (padding + bytes.len()) as u64;
        Ok(())
    }

    fn consume_aligned(&mut self, _dest: &mut [u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "consume_aligned"))
    }
}

// --- StreamReader ---

/// The read archive whose source is a file, consumed sequentially.
///
/// It runs in map-read mode: when a description requests a borrowed view,
/// the blob is read into a freshly allocated scratch buffer, over-allocated
/// so that the payload can start at a correctly aligned address, and the
/// returned view shares ownership of that scratch. Loaded values are
/// therefore self-keeping, exactly as on the mmap path.
#[derive(Debug)]
pub struct StreamReader {
    file: BufReader<File>,
    total: u64,
    // reusable sink for skipped padding bytes
    skip: Vec<u8>,
}

impl StreamReader {
    /// Opens the file at `path` and positions the archive at offset 0.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            file: BufReader::new(file),
            total: 0,
            skip: Vec::new(),
        })
    }

    fn skip_padding(&mut self, align: usize) -> Result<usize> {
        let padding = padding_for(self.total, align);
        if padding > 0 {
            self.skip.resize(padding, 0);
            self.file.read_exact(&mut self.skip[..padding])?;
        }
        Ok(padding)
    }
}

impl Archive for StreamReader {
    const MODE: Mode = Mode::MapRead;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, _bytes: &[u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "emit_aligned"))
    }

    fn consume_aligned(&mut self, dest: &mut [u8], align: usize) -> Result<()> {
        let padding = self.skip_padding(align)?;
        self.file.read_exact(dest)?;
        self.total += (padding + dest.len()) as u64;
        Ok(())
    }

    fn borrow_prefixed(&mut self, align: usize) -> Result<ByteView> {
        if !align.is_power_of_two() {
            return Err(MapbinError::misuse(format!(
                "borrowed views require a power-of-two alignment, got {align}"
            )));
        }
        let mut len = 0u64;
        self.consume_aligned(bytemuck::bytes_of_mut(&mut len), mem::align_of::<u64>())?;
        let len = usize::try_from(len)
            .map_err(|_| MapbinError::format(format!("blob length {len} exceeds usize")))?;

        let padding = self.skip_padding(align)?;

        // Over-allocate so the payload can sit at an address aligned for the
        // element type; the scratch travels inside the returned view.
        let mut scratch = vec![0u8; len + align];
        let offset = scratch.as_ptr().align_offset(align);
        self.file.read_exact(&mut scratch[offset..offset + len])?;
        self.total += (padding + len) as u64;
        Ok(ByteView::new(DataSource::from(scratch), offset, len))
    }
}
