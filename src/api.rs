//! Buffer-level entry points.
//!
//! Each function is a thin wrapper that constructs one archive, runs one
//! description against it, and tears it down; archives are single-use by
//! design. Note that every entry point takes `&mut T`, the write and size
//! paths included: one `describe` method serves all four modes, and its
//! receiver has to satisfy the read modes.

use crate::archive::{Archive, BufferReader, BufferWriter, MapReader, SizeMeasure};
use crate::describe::Describe;
use crate::error::Result;
use crate::source::{DataSource, Storage};

/// Computes the number of bytes `value` serializes to, padding included.
///
/// ```rust
/// assert_eq!(mapbin::measure_size(&mut 10u64)?, 8);
/// # Ok::<(), mapbin::MapbinError>(())
/// ```
pub fn measure_size<T: Describe>(value: &mut T) -> Result<u64> {
    let mut ar = SizeMeasure::new();
    value.describe(&mut ar)?;
    Ok(ar.total_size())
}

/// Serializes `value` into `buf`, which must hold at least
/// [`measure_size`] bytes; shortfall is reported as
/// [`Misuse`](crate::MapbinError::Misuse). Bytes beyond the serialized image
/// are left untouched.
pub fn write_into_buffer<T: Describe>(buf: &mut [u8], value: &mut T) -> Result<()> {
    let mut ar = BufferWriter::new(buf);
    value.describe(&mut ar)
}

/// Reconstructs a value from `buf` by copy.
///
/// The result owns all of its bytes and is independent of `buf`. Trailing
/// bytes beyond the serialized image are ignored.
pub fn read_from_buffer<T: Describe + Default>(buf: &[u8]) -> Result<T> {
    let mut ar = BufferReader::new(buf);
    let mut value = T::default();
    value.describe(&mut ar)?;
    Ok(value)
}

/// Reconstructs a value in place over a shared byte source.
///
/// Containers that support it ([`MapVec`](crate::MapVec)) come back as
/// borrowed views into the source's bytes - the zero-copy path. The
/// returned [`Storage`] pins the source; every borrowed view additionally
/// carries shared ownership of it, so the value stays valid at least as
/// long as either is alive.
///
/// The source is anything convertible to a [`DataSource`]: a `Vec<u8>`, a
/// shared buffer, or a memory map.
///
/// ```rust
/// let mut bytes = vec![0u8; 8];
/// mapbin::write_into_buffer(&mut bytes, &mut 11u64)?;
/// let (value, _storage): (u64, _) = mapbin::read_via_map(bytes)?;
/// assert_eq!(value, 11);
/// # Ok::<(), mapbin::MapbinError>(())
/// ```
pub fn read_via_map<T: Describe + Default, S: Into<DataSource>>(
    source: S,
) -> Result<(T, Storage)> {
    let source = source.into();
    let mut ar = MapReader::new(source.clone());
    let mut value = T::default();
    value.describe(&mut ar)?;
    Ok((value, Storage::new(source)))
}
