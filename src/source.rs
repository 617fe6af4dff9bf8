//! Shared byte backings, borrowed views, and the storage handle.
//!
//! A map-read archive does not copy payloads; it hands out [`ByteView`]s
//! pointing into its backing bytes. The backing is a [`DataSource`] - either
//! a memory-mapped file or a heap buffer - held behind an `Arc`, so every
//! view carries its own lifetime witness and can never dangle. The
//! [`Storage`] handle returned by the load APIs owns the same source and
//! keeps it alive for as long as the caller holds it.

use std::ops::Deref;
use std::sync::Arc;

#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
use memmap2::Mmap;

/// The byte backing a read archive works over.
///
/// Cloning is cheap (`Arc` bump) and shares the same underlying bytes.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A read-only memory mapping of a file.
    #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
    Mmap(Arc<Mmap>),
    /// A heap buffer.
    Memory(Arc<Vec<u8>>),
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
            Self::Mmap(mmap) => mmap.as_ref(),
            Self::Memory(vec) => vec.as_slice(),
        }
    }
}

impl From<Vec<u8>> for DataSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(Arc::new(bytes))
    }
}

impl From<Arc<Vec<u8>>> for DataSource {
    fn from(bytes: Arc<Vec<u8>>) -> Self {
        Self::Memory(bytes)
    }
}

#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
impl From<Arc<Mmap>> for DataSource {
    fn from(mmap: Arc<Mmap>) -> Self {
        Self::Mmap(mmap)
    }
}

#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
impl From<Mmap> for DataSource {
    fn from(mmap: Mmap) -> Self {
        Self::Mmap(Arc::new(mmap))
    }
}

/// A borrowed window into a [`DataSource`].
///
/// Returned by [`Archive::borrow_prefixed`](crate::Archive::borrow_prefixed)
/// on map-read archives. The view shares ownership of its source, so the
/// bytes it points at stay valid for the view's whole lifetime regardless of
/// what happens to the archive or the [`Storage`] handle.
#[derive(Debug, Clone)]
pub struct ByteView {
    source: DataSource,
    offset: usize,
    len: usize,
}

impl ByteView {
    pub(crate) fn new(source: DataSource, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= source.len());
        Self {
            source,
            offset,
            len,
        }
    }

    /// The bytes this view covers.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.source[self.offset..self.offset + self.len]
    }

    /// Length of the view in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the view covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shrinks the view to its first `len` bytes.
    pub(crate) fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.len);
        self.len = len;
    }
}

/// Move-only owner of the resources a loaded value may borrow from.
///
/// [`load_file_map`](crate::load_file_map) returns the memory mapping
/// wrapped in a `Storage`; holding it pins the mapping. Values loaded
/// through mapbin additionally carry shared ownership inside their own
/// borrowed views, so dropping the handle early can never invalidate them -
/// the handle exists to give callers a single token whose lifetime
/// demonstrably encloses every use of the loaded value.
#[derive(Debug)]
pub struct Storage {
    source: Option<DataSource>,
}

impl Storage {
    pub(crate) fn new(source: DataSource) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// A handle owning nothing; returned by loads whose output is fully
    /// owned (copy loads) or self-keeping (stream loads).
    pub(crate) fn empty() -> Self {
        Self { source: None }
    }

    /// True if this handle actually pins a byte region.
    pub fn holds_bytes(&self) -> bool {
        self.source.is_some()
    }
}
