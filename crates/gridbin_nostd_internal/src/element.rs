//! Defines the [`OrdinalElement`] trait, which abstracts over the closed set of
//! numeric element types that can be ordinally binned.
//!
//! The trait is deliberately tiny. It only needs to describe how an element is
//! decoded from raw bytes, how its byte order is flipped, and how it is widened
//! to a signed 64-bit ordinal.

/// A fixed-width numeric type whose values can be mapped onto ordinals.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`, `f32`
/// and `f64`. The set is closed: the public crate instantiates one kernel per
/// implementer, so adding a type here also means adding it to the dispatch
/// table.
pub trait OrdinalElement: Copy + Send + Sync + 'static {
    /// number of bytes occupied by a single element
    const WIDTH: usize;

    /// a short, numpy-flavored name (used in log and error messages)
    const NAME: &'static str;

    /// decode a single element stored in native byte order.
    ///
    /// `chunk` must hold exactly [`Self::WIDTH`] bytes.
    fn decode_native(chunk: &[u8]) -> Self;

    /// reverse the byte order of the element
    fn swap_bytes(self) -> Self;

    /// widen the element to `i64` and subtract `min_value`.
    ///
    /// Returns `None` when the element is NaN (this can only happen for the
    /// floating point implementers).
    fn offset_ordinal(self, min_value: i64) -> Option<i64>;

    /// encode the element into native-order bytes. This is the inverse of
    /// [`Self::decode_native`].
    fn write_native(self, out: &mut [u8]);
}

macro_rules! impl_ordinal_int {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl OrdinalElement for $t {
                const WIDTH: usize = core::mem::size_of::<$t>();
                const NAME: &'static str = $name;

                #[inline(always)]
                fn decode_native(chunk: &[u8]) -> Self {
                    let mut buf = [0_u8; core::mem::size_of::<$t>()];
                    buf.copy_from_slice(chunk);
                    <$t>::from_ne_bytes(buf)
                }

                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::swap_bytes(self)
                }

                #[inline(always)]
                fn offset_ordinal(self, min_value: i64) -> Option<i64> {
                    // only u64 can fail to fit. Those values are larger than
                    // any representable ordinal count, so saturating is fine
                    let widened = i64::try_from(self).unwrap_or(i64::MAX);
                    Some(widened.saturating_sub(min_value))
                }

                #[inline(always)]
                fn write_native(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

macro_rules! impl_ordinal_float {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl OrdinalElement for $t {
                const WIDTH: usize = core::mem::size_of::<$t>();
                const NAME: &'static str = $name;

                #[inline(always)]
                fn decode_native(chunk: &[u8]) -> Self {
                    let mut buf = [0_u8; core::mem::size_of::<$t>()];
                    buf.copy_from_slice(chunk);
                    <$t>::from_ne_bytes(buf)
                }

                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::from_bits(self.to_bits().swap_bytes())
                }

                #[inline(always)]
                fn offset_ordinal(self, min_value: i64) -> Option<i64> {
                    let value = (self as f64) - (min_value as f64);
                    if value.is_nan() {
                        None
                    } else {
                        // truncates toward zero (and saturates at +/- inf)
                        Some(value as i64)
                    }
                }

                #[inline(always)]
                fn write_native(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_ordinal_int!(
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
);

impl_ordinal_float!(f32 => "float32", f64 => "float64");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(<i8 as OrdinalElement>::WIDTH, 1);
        assert_eq!(<u16 as OrdinalElement>::WIDTH, 2);
        assert_eq!(<f32 as OrdinalElement>::WIDTH, 4);
        assert_eq!(<u64 as OrdinalElement>::WIDTH, 8);
    }

    #[test]
    fn decode_and_swap() {
        let value: i32 = 0x0102_0304;
        let mut bytes = [0_u8; 4];
        value.write_native(&mut bytes);
        assert_eq!(i32::decode_native(&bytes), value);
        assert_eq!(OrdinalElement::swap_bytes(value), 0x0403_0201);

        let x = 3.5_f64;
        assert_eq!(OrdinalElement::swap_bytes(OrdinalElement::swap_bytes(x)), x);
    }

    #[test]
    fn integer_offsets() {
        assert_eq!(12_i32.offset_ordinal(10), Some(2));
        assert_eq!(9_u8.offset_ordinal(10), Some(-1));
        assert_eq!((-3_i8).offset_ordinal(-5), Some(2));
        // saturates rather than wrapping around
        assert_eq!(u64::MAX.offset_ordinal(0), Some(i64::MAX));
        assert_eq!(i64::MIN.offset_ordinal(1), Some(i64::MIN));
    }

    #[test]
    fn float_offsets() {
        assert_eq!(12.0_f64.offset_ordinal(10), Some(2));
        assert_eq!(12.9_f32.offset_ordinal(10), Some(2));
        assert_eq!((-0.5_f64).offset_ordinal(0), Some(0));
        assert_eq!((-1.5_f64).offset_ordinal(0), Some(-1));
        assert_eq!(f64::NAN.offset_ordinal(0), None);
        assert_eq!(f32::INFINITY.offset_ordinal(0), Some(i64::MAX));
    }
}
