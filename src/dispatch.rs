//! The kernel dispatch table.
//!
//! Every (element kind, byte order) pair gets its own monomorphized copy of
//! [`accumulate_ordinal_bins`]. A binner looks up the appropriate copy exactly
//! once, when it is configured, and stores the resulting function pointer. The
//! per-element loop therefore never branches on the type or byte order.

use gridbin_nostd_internal::{OrdinalElement, OrdinalParams, accumulate_ordinal_bins};
use serde::{Deserialize, Serialize};

/// The closed set of element types that can be binned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Int8,
        ElementKind::Int16,
        ElementKind::Int32,
        ElementKind::Int64,
        ElementKind::UInt8,
        ElementKind::UInt16,
        ElementKind::UInt32,
        ElementKind::UInt64,
        ElementKind::Float32,
        ElementKind::Float64,
    ];

    /// number of bytes per element
    pub fn itemsize(&self) -> usize {
        match self {
            ElementKind::Int8 => i8::WIDTH,
            ElementKind::Int16 => i16::WIDTH,
            ElementKind::Int32 => i32::WIDTH,
            ElementKind::Int64 => i64::WIDTH,
            ElementKind::UInt8 => u8::WIDTH,
            ElementKind::UInt16 => u16::WIDTH,
            ElementKind::UInt32 => u32::WIDTH,
            ElementKind::UInt64 => u64::WIDTH,
            ElementKind::Float32 => f32::WIDTH,
            ElementKind::Float64 => f64::WIDTH,
        }
    }

    /// the numpy-style name of the type (e.g. `"uint16"`)
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Int8 => i8::NAME,
            ElementKind::Int16 => i16::NAME,
            ElementKind::Int32 => i32::NAME,
            ElementKind::Int64 => i64::NAME,
            ElementKind::UInt8 => u8::NAME,
            ElementKind::UInt16 => u16::NAME,
            ElementKind::UInt32 => u32::NAME,
            ElementKind::UInt64 => u64::NAME,
            ElementKind::Float32 => f32::NAME,
            ElementKind::Float64 => f64::NAME,
        }
    }

    /// look up a kind from its numpy-style name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// only floating point kinds can hold NaN
    pub fn is_float(&self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }
}

// Sealed trait pattern to prevent external implementations
mod sealed {
    pub trait Sealed {}
}

/// Rust types that correspond to an [`ElementKind`].
///
/// This is sealed, since the set of kernels is closed. The [`bytemuck::Pod`]
/// bound lets [`crate::BufferView::from_slice`] view a slice of them as raw
/// bytes.
pub trait Element: OrdinalElement + bytemuck::Pod + sealed::Sealed {
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl Element for $t {
                const KIND: ElementKind = ElementKind::$variant;
            }
        )*
    };
}

impl_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);

/// Describes whether stored data uses the byte order of the machine we are
/// running on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Native,
    Foreign,
}

impl ByteOrder {
    /// the mode for data stored in little (`true`) or big (`false`) endian
    pub fn from_little_endian(little: bool) -> Self {
        if little == cfg!(target_endian = "little") {
            ByteOrder::Native
        } else {
            ByteOrder::Foreign
        }
    }

    /// interpret a numpy byte-order character (`'<'`, `'>'`, `'='` or `'|'`)
    pub fn from_dtype_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::from_little_endian(true)),
            '>' => Some(Self::from_little_endian(false)),
            '=' | '|' => Some(ByteOrder::Native),
            _ => None,
        }
    }

    pub fn is_foreign(&self) -> bool {
        *self == ByteOrder::Foreign
    }
}

/// Signature shared by every monomorphized kernel.
///
/// The arguments are: the raw data bytes, the optional mask, the binning
/// parameters, the offset, the length, the output and the stride.
pub(crate) type KernelFn = fn(
    &[u8],
    Option<&[u8]>,
    &OrdinalParams,
    usize,
    usize,
    &mut [u64],
    u64,
) -> Result<(), &'static str>;

macro_rules! kernel_table {
    ($kind:expr, $order:expr; $($variant:ident => $t:ty),* $(,)?) => {
        match ($kind, $order) {
            $(
                (ElementKind::$variant, ByteOrder::Native) => {
                    accumulate_ordinal_bins::<$t, false> as KernelFn
                }
                (ElementKind::$variant, ByteOrder::Foreign) => {
                    accumulate_ordinal_bins::<$t, true> as KernelFn
                }
            )*
        }
    };
}

/// pick the specialized kernel for `kind` and `order`
pub(crate) fn select_kernel(kind: ElementKind, order: ByteOrder) -> KernelFn {
    log::debug!("selecting the {:?} ordinal kernel for {}", order, kind.name());
    kernel_table!(
        kind, order;
        Int8 => i8,
        Int16 => i16,
        Int32 => i32,
        Int64 => i64,
        UInt8 => u8,
        UInt16 => u16,
        UInt32 => u32,
        UInt64 => u64,
        Float32 => f32,
        Float64 => f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ElementKind::from_name("complex128"), None);
    }

    #[test]
    fn itemsizes() {
        assert_eq!(ElementKind::Int8.itemsize(), 1);
        assert_eq!(ElementKind::UInt16.itemsize(), 2);
        assert_eq!(ElementKind::Float32.itemsize(), 4);
        assert_eq!(ElementKind::Int64.itemsize(), 8);
    }

    #[test]
    fn float_kinds() {
        let floats: Vec<_> = ElementKind::ALL.into_iter().filter(ElementKind::is_float).collect();
        assert_eq!(floats, vec![ElementKind::Float32, ElementKind::Float64]);
    }

    #[test]
    fn byte_order_from_dtype() {
        let little_is_native = cfg!(target_endian = "little");
        assert_eq!(
            ByteOrder::from_dtype_char('<').unwrap().is_foreign(),
            !little_is_native
        );
        assert_eq!(
            ByteOrder::from_dtype_char('>').unwrap().is_foreign(),
            little_is_native
        );
        assert_eq!(ByteOrder::from_dtype_char('='), Some(ByteOrder::Native));
        assert_eq!(ByteOrder::from_dtype_char('|'), Some(ByteOrder::Native));
        assert_eq!(ByteOrder::from_dtype_char('x'), None);
    }

    #[test]
    fn selected_kernel_respects_byte_order() {
        let params = OrdinalParams::new(300, 0).unwrap();
        // 258 is 0x0102
        let native = 258_u16.to_ne_bytes();
        let swapped = 258_u16.swap_bytes().to_ne_bytes();

        let mut out = [0_u64; 1];
        select_kernel(ElementKind::UInt16, ByteOrder::Native)(
            &native, None, &params, 0, 1, &mut out, 1,
        )
        .unwrap();
        assert_eq!(out, [260]);

        let mut out = [0_u64; 1];
        select_kernel(ElementKind::UInt16, ByteOrder::Foreign)(
            &swapped, None, &params, 0, 1, &mut out, 1,
        )
        .unwrap();
        assert_eq!(out, [260]);
    }
}
