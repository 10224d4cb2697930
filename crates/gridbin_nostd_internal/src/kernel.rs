//! The ordinal binning kernel.
//!
//! The bins produced by the kernel are laid out as
//! `[nan, null, ordinal_0, ..., ordinal_{n-1}, overflow]`, so an ordinal binner
//! with `ordinal_count = n` always has `n + 3` bins.
//!
//! The kernel *accumulates* `index * stride` into the output rather than
//! overwriting it. This lets several binners write into the same output buffer
//! to produce a flattened index into a multi-dimensional grid.

use crate::element::OrdinalElement;

/// bin index reserved for NaN values
pub const NAN_BIN: u64 = 0;

/// bin index reserved for null values (masked values and values that are
/// smaller than the configured minimum)
pub const NULL_BIN: u64 = 1;

/// number of bins that aren't associated with a valid ordinal
pub const N_RESERVED_BINS: u64 = 3;

/// mask byte that flags an element as null (this follows numpy's convention)
pub const MASKED: u8 = 1;

/// The parameters of an ordinal binning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrdinalParams {
    ordinal_count: i64,
    min_value: i64,
}

impl OrdinalParams {
    pub fn new(ordinal_count: i64, min_value: i64) -> Result<Self, &'static str> {
        if ordinal_count < 0 {
            Err("ordinal_count must not be negative")
        } else {
            Ok(Self {
                ordinal_count,
                min_value,
            })
        }
    }

    /// number of valid ordinal bins
    pub fn ordinal_count(&self) -> i64 {
        self.ordinal_count
    }

    /// the offset subtracted from every raw value
    pub fn min_value(&self) -> i64 {
        self.min_value
    }

    /// total number of bins, including the reserved bins
    pub fn n_bins(&self) -> u64 {
        (self.ordinal_count as u64) + N_RESERVED_BINS
    }

    /// the bin holding values that are too large to be a valid ordinal
    pub fn overflow_bin(&self) -> u64 {
        (self.ordinal_count as u64) + 2
    }
}

/// Map an offset value (i.e. `raw - min_value`) to a bin index.
///
/// `value` is `None` for NaN. The NaN check takes precedence over the mask,
/// which in turn takes precedence over the range checks.
#[inline(always)]
pub fn ordinal_bin_index(value: Option<i64>, masked: bool, ordinal_count: i64) -> u64 {
    match value {
        None => NAN_BIN,
        Some(v) if masked || v < 0 => NULL_BIN,
        Some(v) if v >= ordinal_count => (ordinal_count as u64) + 2,
        Some(v) => (v as u64) + 2,
    }
}

#[inline(always)]
fn decode<T: OrdinalElement, const FOREIGN: bool>(chunk: &[u8]) -> T {
    let value = T::decode_native(chunk);
    // FOREIGN is a compile-time constant, so this branch vanishes
    if FOREIGN { value.swap_bytes() } else { value }
}

/// Bins the elements `[offset, offset + length)` of `data` and accumulates
/// `index * stride` into `output[i - offset]`.
///
/// `data` holds the raw bytes of the elements. When `FOREIGN` is `true`, every
/// element is byte-swapped (at the element's width) before it is widened.
/// When `mask` is provided, an element whose mask byte equals [`MASKED`] is
/// sent to [`NULL_BIN`] (unless it's NaN).
///
/// # Errors
/// Fails if `data` isn't a whole number of elements or if the requested range
/// exceeds `data`, `mask` or `output`. Nothing is written when it fails.
pub fn accumulate_ordinal_bins<T: OrdinalElement, const FOREIGN: bool>(
    data: &[u8],
    mask: Option<&[u8]>,
    params: &OrdinalParams,
    offset: usize,
    length: usize,
    output: &mut [u64],
    stride: u64,
) -> Result<(), &'static str> {
    if data.len() % T::WIDTH != 0 {
        return Err("the data buffer doesn't hold a whole number of elements");
    }
    let stop = offset
        .checked_add(length)
        .ok_or("offset + length overflows")?;
    if stop > data.len() / T::WIDTH {
        return Err("the requested range exceeds the data buffer");
    }
    if output.len() < length {
        return Err("the output buffer is shorter than the requested range");
    }

    let elements = data[offset * T::WIDTH..stop * T::WIDTH].chunks_exact(T::WIDTH);
    let output = &mut output[..length];
    let OrdinalParams {
        ordinal_count,
        min_value,
    } = *params;

    match mask {
        Some(mask) => {
            if stop > mask.len() {
                return Err("the requested range exceeds the mask buffer");
            }
            let mask = &mask[offset..stop];
            for ((out, chunk), &flag) in output.iter_mut().zip(elements).zip(mask) {
                let value = decode::<T, FOREIGN>(chunk).offset_ordinal(min_value);
                *out += ordinal_bin_index(value, flag == MASKED, ordinal_count) * stride;
            }
        }
        None => {
            for (out, chunk) in output.iter_mut().zip(elements) {
                let value = decode::<T, FOREIGN>(chunk).offset_ordinal(min_value);
                *out += ordinal_bin_index(value, false, ordinal_count) * stride;
            }
        }
    }
    Ok(())
}
