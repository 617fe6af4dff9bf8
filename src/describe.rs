//! The description seam: how a type teaches the archives its layout.
//!
//! A description is a routine that walks a value once and issues
//! sub-operations against an [`Archive`]. The same routine, compiled against
//! each archive variant, realizes size computation, writing, copying
//! reconstruction and in-place mapped reconstruction - one source of truth
//! for the layout, four behaviors.
//!
//! ## Dispatch
//!
//! Selection of a description is entirely structural and happens at compile
//! time, in this order:
//!
//! 1. a manual [`Describe`] impl on the type (or the equivalent
//!    [`#[derive(Describe)]`](mapbin_derive::Describe), which describes
//!    every field in declaration order);
//! 2. the library's impls for standard shapes - `String`, `[T; N]`, tuples,
//!    [`MapVec`](crate::MapVec);
//! 3. the automatic impls for bit-copyable scalars (integers, floats,
//!    `usize`/`isize`, `bool`), which treat the value's storage as one byte
//!    block of `size_of` bytes at `align_of` alignment.
//!
//! Anything else fails to compile. In particular, no pointer-shaped type -
//! `*const T`, `*mut T`, references, `Box`, `Rc`, `Arc` - implements
//! [`Describe`], so pointer serialization is rejected before the program
//! runs, transitively included: a struct containing a pointer field cannot
//! derive or hand-write an impl that describes it.
//!
//! ## Writing a description
//!
//! Describe each field in a fixed order and keep the walk identical across
//! modes; mode-dependent behavior belongs to containers, which branch on the
//! archive's mode queries. Most struct types should simply derive:
//!
//! ```rust
//! use mapbin::Describe;
//!
//! #[derive(Describe, Default, PartialEq, Debug)]
//! struct Header {
//!     generation: u64,
//!     flags: u16,
//! }
//!
//! let mut value = Header { generation: 3, flags: 7 };
//! // u64 at offset 0, u16 at offset 8
//! assert_eq!(mapbin::measure_size(&mut value)?, 10);
//! # Ok::<(), mapbin::MapbinError>(())
//! ```

use crate::archive::Archive;
use crate::error::Result;

/// A type that can be walked by an archive.
///
/// The single [`describe`](Describe::describe) method serves every mode,
/// which is why it takes `&mut self` even on the size and write paths: the
/// read modes reconstruct through the same signature.
pub trait Describe {
    /// Walks `self` once, issuing sub-operations against `ar`.
    ///
    /// Implementations must issue the same `(length, alignment)` sequence in
    /// every mode; the built-in containers uphold this by construction.
    fn describe<A: Archive>(&mut self, ar: &mut A) -> Result<()>;

    /// Walks a contiguous run of values.
    ///
    /// The default body describes element-wise. Bit-copyable scalars
    /// override it to move the whole run as a single aligned byte block,
    /// which is what makes fixed arrays and vector payloads one sub-op
    /// instead of `N`.
    fn describe_slice<A: Archive>(items: &mut [Self], ar: &mut A) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.describe(ar)?;
        }
        Ok(())
    }
}
