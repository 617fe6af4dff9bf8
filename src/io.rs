//! Whole-file save and load strategies.
//!
//! Three ways to save - build in memory then dump (`copy`), emit straight
//! to the file (`stream`), write through a read-write mapping (`map`) - and
//! three ways to load - read whole file then copy-reconstruct (`copy`),
//! sequential reads (`stream`), map read-only and reconstruct in place
//! (`map`). All six produce/accept the same byte layout, so any save
//! strategy pairs with any load strategy.
//!
//! Map load is the only strategy that preserves the zero-copy property end
//! to end; it is the default wherever memory mapping is available (the
//! `mmap` feature, on by default, off on wasm). Without it the defaults
//! fall back to streaming.
//!
//! A failed save leaves the target file in an unspecified state; callers
//! are expected to delete or retry. File handles are scoped and released on
//! every exit path.

use std::fs;
use std::path::Path;

use crate::api::{measure_size, read_from_buffer, write_into_buffer};
use crate::describe::Describe;
use crate::error::Result;
use crate::source::Storage;
use crate::stream::{StreamReader, StreamWriter};

#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
use crate::api::read_via_map;
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
use crate::archive::BufferWriter;
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
use crate::source::DataSource;
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
use std::sync::Arc;

/// Saves with the platform default strategy: map where available,
/// stream otherwise.
pub fn save_file<T: Describe, P: AsRef<Path>>(path: P, value: &mut T) -> Result<()> {
    #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
    {
        save_file_map(path, value)
    }
    #[cfg(not(all(feature = "mmap", not(target_arch = "wasm32"))))]
    {
        save_file_stream(path, value)
    }
}

/// Saves by building the whole image in a heap buffer, then writing it out
/// in one call.
pub fn save_file_copy<T: Describe, P: AsRef<Path>>(path: P, value: &mut T) -> Result<()> {
    let size = measure_size(value)?;
    let size = usize::try_from(size)
        .map_err(|_| crate::error::MapbinError::format(format!("image of {size} bytes exceeds usize")))?;
    let mut buf = vec![0u8; size];
    write_into_buffer(&mut buf, value)?;
    fs::write(path, &buf)?;
    Ok(())
}

/// Saves by emitting padding and payload directly to the file; nothing is
/// staged beyond the stream's block buffer, so values far larger than RAM
/// can be saved.
pub fn save_file_stream<T: Describe, P: AsRef<Path>>(path: P, value: &mut T) -> Result<()> {
    let mut ar = StreamWriter::create(path)?;
    value.describe(&mut ar)?;
    ar.finish()
}

/// Saves by sizing the file up front, mapping it read-write and writing the
/// image in place. The mapping is flushed before being unmapped.
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
#[allow(unsafe_code)]
pub fn save_file_map<T: Describe, P: AsRef<Path>>(path: P, value: &mut T) -> Result<()> {
    let size = measure_size(value)?;
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(size)?;
    if size > 0 {
        // SAFETY: the file was just created and sized by this call and is
        // not shared; the mapping does not outlive the handle.
        let mut map = unsafe { memmap2::MmapMut::map_mut(&file)? };
        let mut ar = BufferWriter::new(&mut map[..]);
        value.describe(&mut ar)?;
        map.flush()?;
    }
    Ok(())
}

/// Loads with the platform default strategy: map where available, stream
/// otherwise.
pub fn load_file<T: Describe + Default, P: AsRef<Path>>(path: P) -> Result<(T, Storage)> {
    #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
    {
        load_file_map(path)
    }
    #[cfg(not(all(feature = "mmap", not(target_arch = "wasm32"))))]
    {
        load_file_stream(path)
    }
}

/// Loads by reading the whole file into a heap buffer and reconstructing by
/// copy. The returned [`Storage`] holds nothing; the value owns its bytes.
pub fn load_file_copy<T: Describe + Default, P: AsRef<Path>>(path: P) -> Result<(T, Storage)> {
    let buf = fs::read(path)?;
    let value = read_from_buffer(&buf)?;
    Ok((value, Storage::empty()))
}

/// Loads through sequential file reads. Blob payloads land in per-blob
/// scratch buffers that travel inside the loaded value's views, so the
/// returned [`Storage`] holds nothing extra.
pub fn load_file_stream<T: Describe + Default, P: AsRef<Path>>(path: P) -> Result<(T, Storage)> {
    let mut ar = StreamReader::open(path)?;
    let mut value = T::default();
    value.describe(&mut ar)?;
    Ok((value, Storage::empty()))
}

/// Loads by mapping the file read-only and reconstructing in place - the
/// zero-copy path. The mapping is returned as the [`Storage`]; the loaded
/// value's borrowed views share ownership of it.
///
/// Zero-length files are loaded through an empty heap source, since mapping
/// an empty file is platform-defined.
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
#[allow(unsafe_code)]
pub fn load_file_map<T: Describe + Default, P: AsRef<Path>>(path: P) -> Result<(T, Storage)> {
    let file = fs::File::open(path)?;
    let len = file.metadata()?.len();
    let source = if len == 0 {
        DataSource::Memory(Arc::new(Vec::new()))
    } else {
        // SAFETY: the mapping is read-only and kept alive by the returned
        // Storage (and by every view into it); callers must not truncate
        // the file while the value is in use, which is the documented
        // contract of every mmap-based reader.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        DataSource::Mmap(Arc::new(map))
    };
    read_via_map(source)
}
