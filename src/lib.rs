//! # mapbin
//!
//! A binary serialization library built around **zero-copy memory-mapped
//! deserialization**: data is laid out on disk so that, for bit-copyable
//! types, the in-memory representation *is* the file's bytes, accessed in
//! place through a read-only mapping.
//!
//! ## The four-mode archive
//!
//! One user-authored description per type drives every mode. A description
//! walks a value once and issues sub-operations against an [`Archive`]; the
//! archive's compile-time [`Mode`] decides what those sub-operations do:
//!
//! | Archive | Mode | Effect |
//! |---|---|---|
//! | [`SizeMeasure`] | Size | computes the byte count |
//! | [`BufferWriter`] / [`StreamWriter`] | Write | produces the bytes |
//! | [`BufferReader`] | Read | reconstructs by copy |
//! | [`MapReader`] / [`StreamReader`] | MapRead | reconstructs in place |
//!
//! Mode resolution is static - descriptions branch on associated-constant
//! queries, so each monomorphization compiles down to exactly one mode's
//! code path and all four share a single source of truth for the layout.
//!
//! ## On-disk format
//!
//! Sub-operations are concatenated in description order. Before each sub-op
//! of alignment `a`, `(a - offset % a) % a` zero bytes of padding are
//! inserted, measured from byte 0 of the file; that discipline is what
//! keeps on-disk offsets suitable for reinterpreting primitive arrays in
//! place. Length prefixes are self-aligned native-endian `u64`s. There is
//! no header, footer, type tag or checksum.
//!
//! **The format is native**: native byte order, native type widths.
//! Cross-endian or cross-width exchange is out of scope, and mapbin never
//! byte-swaps.
//!
//! ## Example
//!
//! ```rust
//! use mapbin::{Describe, MapVec};
//!
//! #[derive(Describe, Default, Clone, PartialEq, Debug)]
//! struct Index {
//!     generation: u64,
//!     positions: MapVec<u64>,
//! }
//!
//! let mut index = Index {
//!     generation: 7,
//!     positions: (0..1024u64).collect(),
//! };
//!
//! let dir = std::env::temp_dir();
//! let path = dir.join("mapbin-doc-example.idx");
//! mapbin::save_file(&path, &mut index)?;
//!
//! // Zero-copy load: `positions` is a view into the mapping.
//! let (loaded, _storage): (Index, _) = mapbin::load_file(&path)?;
//! assert_eq!(loaded, index);
//! # std::fs::remove_file(&path).ok();
//! # Ok::<(), mapbin::MapbinError>(())
//! ```
//!
//! ## The dual-state container
//!
//! [`MapVec<T>`] is the zero-copy container: after a map load it is a
//! borrowed view into the mapping; the first mutating operation promotes it
//! to an owned buffer. See the [`vector`] module docs for the state
//! machine.
//!
//! ## What cannot be serialized
//!
//! Pointer-shaped types - raw pointers, references, `Box`, `Rc`, `Arc` -
//! have no [`Describe`](describe::Describe) implementation and are rejected
//! at compile time,
//! transitively. There is no runtime type information anywhere in the
//! format.
//!
//! ## Safety and error handling
//!
//! * `unsafe` is confined to the two `memmap2` mapping calls in [`io`];
//!   everything else, the in-place reinterpretation included, goes through
//!   `bytemuck`'s checked casts.
//! * No `unwrap()` or `panic!()` in the library (enforced by lints); misuse
//!   and I/O failures are reported through [`MapbinError`].
//! * An archive instance is single-use and single-threaded by contract;
//!   distinct archives over distinct buffers are independent.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod align;
pub mod api;
pub mod archive;
pub mod describe;
pub mod error;
pub mod io;
pub mod mode;
pub mod source;
pub mod stream;
pub mod vector;

mod describe_impls;

pub use align::padding_for;
pub use api::{measure_size, read_from_buffer, read_via_map, write_into_buffer};
pub use archive::{Archive, BufferReader, BufferWriter, MapReader, SizeMeasure};
pub use describe::Describe;
pub use error::{MapbinError, Result};
pub use io::{load_file, load_file_copy, load_file_stream, save_file, save_file_copy, save_file_stream};
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
pub use io::{load_file_map, save_file_map};
pub use mode::Mode;
pub use source::{ByteView, DataSource, Storage};
pub use stream::{StreamReader, StreamWriter};
pub use vector::MapVec;

// Re-export the derive macro so it is accessible as `mapbin::Describe`.
pub use mapbin_derive::Describe;
