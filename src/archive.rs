//! The archive abstraction: one operation contract, four modes.
//!
//! An archive is a one-shot session object carrying a cursor and a running
//! byte offset (`total_size`). A description walks a value exactly once and
//! issues sub-operations against the archive; depending on the archive's
//! [`Mode`], the same walk computes a size, produces bytes, copies bytes out,
//! or hands out borrowed views into a mapped source.
//!
//! ## Layout discipline
//!
//! Before each sub-operation of alignment `a`, every archive inserts
//! `(a - total_size % a) % a` zero bytes of padding, counted in
//! `total_size`. Padding is always computed against the accumulated offset
//! since the archive's origin (byte 0 of the file), never against an
//! internal boundary - resetting the origin between sub-operations would
//! break the in-place reinterpretation the map-read path performs.
//!
//! Because all variants share this one rule, the following holds for any
//! description: the sequence of `(length, alignment)` pairs - and therefore
//! the byte layout - is identical across all four modes. [`SizeMeasure`]
//! measures exactly what [`BufferWriter`] writes and what [`BufferReader`] /
//! [`MapReader`] expect.
//!
//! ## Mode resolution is static
//!
//! Descriptions branch on the mode queries ([`Archive::is_reading`],
//! [`Archive::is_map_reading`], [`Archive::is_writing`]), which are
//! associated functions answering from the associated `MODE` constant. Each
//! monomorphization sees constant conditions, so the branches not taken for
//! a given archive type compile away. Invoking an operation that the
//! archive's mode does not support (e.g. [`Archive::consume_aligned`] on a
//! writer) is a programmer error and reports [`MapbinError::Misuse`].

use std::mem;

use crate::align::padding_for;
use crate::error::{MapbinError, Result};
use crate::mode::Mode;
use crate::source::{ByteView, DataSource};

/// The operation contract every archive variant implements.
///
/// File-backed variants live in [`crate::stream`]; the four in-memory
/// variants are defined alongside this trait. The trait is public so that
/// callers can drive archives directly - the high-level entry points in
/// [`crate::api`] and [`crate::io`] are thin wrappers that construct an
/// archive, run one description, and tear it down.
pub trait Archive: Sized {
    /// The compile-time mode tag of this archive variant.
    const MODE: Mode;

    /// True while reconstructing by copy. Descriptions take their
    /// owned-reconstruction branch under this query.
    #[inline]
    fn is_reading() -> bool {
        Self::MODE.is_reading()
    }

    /// True while reconstructing in place over a mapped or scratch-backed
    /// source. Descriptions take their borrowed-view branch under this
    /// query.
    #[inline]
    fn is_map_reading() -> bool {
        Self::MODE.is_map_reading()
    }

    /// True while producing bytes. [`SizeMeasure`] answers false to all
    /// three queries and takes the same description branch as writers.
    #[inline]
    fn is_writing() -> bool {
        Self::MODE.is_writing()
    }

    /// Accumulated bytes produced or consumed since the archive's origin,
    /// padding included.
    fn total_size(&self) -> u64;

    /// Writes `bytes` after inserting zero padding up to `align`.
    ///
    /// On [`SizeMeasure`] this reserves space without touching bytes. On
    /// read archives it reports [`MapbinError::Misuse`].
    fn emit_aligned(&mut self, bytes: &[u8], align: usize) -> Result<()>;

    /// Copies the next `dest.len()` bytes into `dest` after skipping padding
    /// up to `align`.
    ///
    /// Present on both read modes: scalars and strings are materialized by
    /// copy even on the map path. Write-capable archives report
    /// [`MapbinError::Misuse`].
    fn consume_aligned(&mut self, dest: &mut [u8], align: usize) -> Result<()>;

    /// Reads a length-prefixed blob and returns a borrowed view of its
    /// payload, positioned after padding to `align`.
    ///
    /// Only map-read archives support borrowing; everything else reports
    /// [`MapbinError::Misuse`]. The returned view shares ownership of the
    /// archive's backing source and stays valid after the archive is gone.
    fn borrow_prefixed(&mut self, align: usize) -> Result<ByteView> {
        let _ = align;
        Err(MapbinError::misuse(format!(
            "borrowed views are only available on map-read archives (mode {:?})",
            Self::MODE
        )))
    }

    /// Writes a length-prefixed blob: the byte count as a self-aligned
    /// native-endian `u64`, then the payload at `align`.
    ///
    /// The default body serves writers, stream writers and the size measurer
    /// alike, since all three express it through [`Archive::emit_aligned`].
    fn emit_prefixed(&mut self, bytes: &[u8], align: usize) -> Result<()> {
        let len = bytes.len() as u64;
        self.emit_aligned(bytemuck::bytes_of(&len), mem::align_of::<u64>())?;
        self.emit_aligned(bytes, align)
    }
}

pub(crate) fn wrong_mode(mode: Mode, op: &str) -> MapbinError {
    MapbinError::misuse(format!("{op} is not supported in mode {mode:?}"))
}

// --- SizeMeasure ---

/// The size-computing archive: replays a description without a cursor and
/// accumulates the byte count the write modes will produce.
#[derive(Debug, Default)]
pub struct SizeMeasure {
    total: u64,
}

impl SizeMeasure {
    /// Creates a measurer positioned at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `len` bytes at `align`: advances the running total by the
    /// padding gap plus `len`.
    pub fn reserve_size(&mut self, len: usize, align: usize) {
        let padding = padding_for(self.total, align);
        self.total += (padding + len) as u64;
    }
}

impl Archive for SizeMeasure {
    const MODE: Mode = Mode::Size;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, bytes: &[u8], align: usize) -> Result<()> {
        self.reserve_size(bytes.len(), align);
        Ok(())
    }

    fn consume_aligned(&mut self, _dest: &mut [u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "consume_aligned"))
    }
}

// --- BufferWriter ---

/// The write archive over a caller-owned mutable byte span.
///
/// Padding bytes are explicitly zero-filled, so the produced image never
/// depends on the buffer's prior contents.
#[derive(Debug)]
pub struct BufferWriter<'a> {
    buf: &'a mut [u8],
    total: u64,
}

impl<'a> BufferWriter<'a> {
    /// Creates a writer over `buf`, positioned at offset 0.
    ///
    /// The buffer must hold at least
    /// [`measure_size`](crate::measure_size) bytes for the value about to be
    /// described; running out of room mid-description is reported as
    /// [`MapbinError::Misuse`].
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, total: 0 }
    }
}

impl Archive for BufferWriter<'_> {
    const MODE: Mode = Mode::Write;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, bytes: &[u8], align: usize) -> Result<()> {
        let padding = padding_for(self.total, align);
        let pos = self.total as usize;
        let end = pos + padding + bytes.len();
        if end > self.buf.len() {
            return Err(MapbinError::misuse(format!(
                "buffer too small: writing {} bytes (align {align}) at offset {} into a {}-byte buffer",
                bytes.len(),
                self.total,
                self.buf.len()
            )));
        }
        self.buf[pos..pos + padding].fill(0);
        self.buf[pos + padding..end].copy_from_slice(bytes);
        self.total = end as u64;
        Ok(())
    }

    fn consume_aligned(&mut self, _dest: &mut [u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "consume_aligned"))
    }
}

// --- BufferReader ---

/// The copying read archive over a caller-owned byte span.
///
/// Every payload is copied out of the source; the reconstructed value owns
/// all of its bytes and outlives the buffer freely.
#[derive(Debug)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
    total: u64,
}

impl<'a> BufferReader<'a> {
    /// Creates a reader over `buf`, positioned at offset 0.
    ///
    /// Trailing bytes beyond what the description consumes are ignored.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, total: 0 }
    }
}

impl Archive for BufferReader<'_> {
    const MODE: Mode = Mode::Read;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, _bytes: &[u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "emit_aligned"))
    }

    fn consume_aligned(&mut self, dest: &mut [u8], align: usize) -> Result<()> {
        let padding = padding_for(self.total, align);
        let pos = self.total as usize;
        let end = pos + padding + dest.len();
        if end > self.buf.len() {
            return Err(MapbinError::misuse(format!(
                "read past end: consuming {} bytes (align {align}) at offset {} from a {}-byte buffer",
                dest.len(),
                self.total,
                self.buf.len()
            )));
        }
        dest.copy_from_slice(&self.buf[pos + padding..end]);
        self.total = end as u64;
        Ok(())
    }
}

// --- MapReader ---

/// The in-place read archive over a shared byte source.
///
/// Scalar-sized payloads are copied out like [`BufferReader`] does; blob
/// payloads requested through [`Archive::borrow_prefixed`] are returned as
/// views into the source itself - the zero-copy path.
#[derive(Debug)]
pub struct MapReader {
    source: DataSource,
    total: u64,
}

impl MapReader {
    /// Creates a map reader over `source`, positioned at offset 0.
    pub fn new(source: DataSource) -> Self {
        Self { source, total: 0 }
    }
}

impl Archive for MapReader {
    const MODE: Mode = Mode::MapRead;

    fn total_size(&self) -> u64 {
        self.total
    }

    fn emit_aligned(&mut self, _bytes: &[u8], _align: usize) -> Result<()> {
        Err(wrong_mode(Self::MODE, "emit_aligned"))
    }

    fn consume_aligned(&mut self, dest: &mut [u8], align: usize) -> Result<()> {
        let padding = padding_for(self.total, align);
        let pos = self.total as usize;
        let end = pos + padding + dest.len();
        if end > self.source.len() {
            return Err(MapbinError::misuse(format!(
                "read past end: consuming {} bytes (align {align}) at offset {} from a {}-byte source",
                dest.len(),
                self.total,
                self.source.len()
            )));
        }
        dest.copy_from_slice(&self.source[pos + padding..end]);
        self.total = end as u64;
        Ok(())
    }

    fn borrow_prefixed(&mut self, align: usize) -> Result<ByteView> {
        let mut len = 0u64;
        self.consume_aligned(bytemuck::bytes_of_mut(&mut len), mem::align_of::<u64>())?;
        let len = usize::try_from(len)
            .map_err(|_| MapbinError::format(format!("blob length {len} exceeds usize")))?;

        let padding = padding_for(self.total, align);
        let pos = self.total as usize + padding;
        let end = pos + len;
        if end > self.source.len() {
            return Err(MapbinError::misuse(format!(
                "read past end: borrowing {len} bytes (align {align}) at offset {} from a {}-byte source",
                self.total,
                self.source.len()
            )));
        }
        self.total = end as u64;
        Ok(ByteView::new(self.source.clone(), pos, len))
    }
}
