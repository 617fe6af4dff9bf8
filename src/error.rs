//! Centralized error handling for mapbin.
//!
//! All fallible operations in the crate return [`Result`]. The library never
//! panics: misuse of an archive (writing past the end of a buffer, invoking a
//! read operation on a write archive) is reported as [`MapbinError::Misuse`]
//! rather than asserted, and I/O failures bubble up from the file wrappers
//! with their underlying cause preserved.
//!
//! Two whole classes of error from comparable serializers are absent by
//! construction: "unknown type" and "pointer-typed field" are compile-time
//! rejections here, because serializability is expressed through the
//! [`Describe`](crate::describe::Describe) trait and pointer types simply
//! have no implementation.

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for mapbin operations.
///
/// ```rust
/// fn measure() -> mapbin::Result<u64> {
///     mapbin::measure_size(&mut 7u32)
/// }
/// ```
pub type Result<T> = std::result::Result<T, MapbinError>;

/// The error type covering all failure domains in mapbin.
///
/// The type is `Clone` so errors can be stored or shared; the wrapped
/// `io::Error` sits behind an `Arc` to keep cloning cheap.
#[derive(Debug, Clone)]
pub enum MapbinError {
    /// Low-level I/O failure (file not openable, short read, mmap failure,
    /// flush failure).
    Io(Arc<io::Error>),

    /// Programmer error in the use of an archive: a buffer too small for the
    /// value being written, a read past the end of the source, an operation
    /// invoked on an archive of the wrong mode, or a padding gap exceeding
    /// the streaming pad buffer.
    ///
    /// These indicate a bug in the calling code or a description whose
    /// sub-operation sequence diverges between modes; they are not
    /// recoverable by retrying.
    Misuse(String),

    /// The payload violates an invariant of the format while decoding, e.g.
    /// a string payload that is not valid UTF-8 or a length prefix that does
    /// not fit in `usize` on this platform.
    Format(String),
}

impl MapbinError {
    pub(crate) fn misuse(msg: impl Into<String>) -> Self {
        Self::Misuse(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

impl fmt::Display for MapbinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Misuse(s) => write!(f, "archive misuse: {s}"),
            Self::Format(s) => write!(f, "format error: {s}"),
        }
    }
}

impl std::error::Error for MapbinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for MapbinError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
