//! Built-in descriptions: scalars, fixed arrays, tuples, strings.

use std::mem;

use crate::archive::Archive;
use crate::describe::Describe;
use crate::error::{MapbinError, Result};

/// Bit-copyable scalars move as one byte block of `size_of` bytes at
/// `align_of` alignment, in both directions. The slice override collapses a
/// run of `L` elements into a single block of `L * size_of` bytes - no
/// length prefix; the element count is the caller's concern.
macro_rules! impl_describe_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
                    if A::is_reading() || A::is_map_reading() {
                        ar.consume_aligned(bytemuck::bytes_of_mut(self), mem::align_of::<$t>())
                    } else {
                        ar.emit_aligned(bytemuck::bytes_of(self), mem::align_of::<$t>())
                    }
                }

                fn describe_slice<A: Archive>(items: &mut [Self], ar: &mut A) -> Result<()> {
                    if A::is_reading() || A::is_map_reading() {
                        ar.consume_aligned(bytemuck::cast_slice_mut(items), mem::align_of::<$t>())
                    } else {
                        ar.emit_aligned(bytemuck::cast_slice(items), mem::align_of::<$t>())
                    }
                }
            }
        )*
    };
}

impl_describe_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

// Staged through u8: not every bit pattern is a valid bool, so the raw
// block treatment the scalars get would be unsound on the read path.
impl Describe for bool {
    fn describe<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        let mut raw = u8::from(*self);
        raw.describe(ar)?;
        if A::is_reading() || A::is_map_reading() {
            *self = raw != 0;
        }
        Ok(())
    }
}

/// A fixed-length array describes as a contiguous sequence of its elements:
/// one block for scalar elements, element-wise otherwise.
impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        T::describe_slice(self, ar)
    }
}

macro_rules! impl_describe_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Describe),+> Describe for ($($name,)+) {
            fn describe<Ar: Archive>(&mut self, ar: &mut Ar) -> Result<()> {
                $(self.$idx.describe(ar)?;)+
                Ok(())
            }
        }
    };
}

impl_describe_tuple!(T0: 0);
impl_describe_tuple!(T0: 0, T1: 1);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2, T3: 3);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
impl_describe_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);

/// Length-prefixed byte string: a self-aligned `u64` byte count, then the
/// payload at alignment 1.
///
/// Strings are always materialized by copy, on the map path included - a
/// borrowed `str` could not uphold ownership of its bytes, and the source
/// buffer carries no terminator or validity guarantees. Invalid UTF-8 in
/// the payload is a [`MapbinError::Format`] error.
impl Describe for String {
    fn describe<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        let mut len = self.len() as u64;
        len.describe(ar)?;
        if A::is_reading() || A::is_map_reading() {
            let len = usize::try_from(len)
                .map_err(|_| MapbinError::format(format!("string length {len} exceeds usize")))?;
            let mut bytes = vec![0u8; len];
            ar.consume_aligned(&mut bytes, 1)?;
            *self = String::from_utf8(bytes)
                .map_err(|e| MapbinError::format(format!("string payload is not valid UTF-8: {e}")))?;
        } else {
            ar.emit_aligned(self.as_bytes(), 1)?;
        }
        Ok(())
    }
}
