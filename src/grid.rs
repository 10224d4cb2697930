//! Composes several 1D binners into a single, flattened N-dimensional grid.
//!
//! Given binners `B_0, ..., B_{k-1}` with shapes `S_0, ..., S_{k-1}`, the flat
//! index of an element is `sum_j index_j * stride_j` where
//! `stride_j = S_0 * ... * S_{j-1}` (and `stride_0 = 1`). In other words, the
//! first binner varies fastest. Because each binner accumulates
//! `index * stride` into a shared [`BinIndices`], we never need to materialize
//! the tuple of per-dimension indices.

use crate::{BinIndices, Binner, Error};

fn checked_strides<'a, 'b>(
    binners: &[&'b (dyn Binner<'a> + 'b)],
) -> Result<(Vec<u64>, u64), Error> {
    let mut strides = Vec::with_capacity(binners.len());
    let mut total: u64 = 1;
    for binner in binners {
        strides.push(total);
        total = total
            .checked_mul(binner.shape())
            .ok_or_else(|| Error::grid_overflow(binners.iter().map(|b| b.shape()).collect()))?;
    }
    Ok((strides, total))
}

/// The stride of each binner in a row-major flattening, where the first binner
/// varies fastest
pub fn grid_strides<'a, 'b>(binners: &[&'b (dyn Binner<'a> + 'b)]) -> Result<Vec<u64>, Error> {
    checked_strides(binners).map(|(strides, _)| strides)
}

/// The total number of bins in the grid (the product of the shapes)
pub fn grid_shape<'a, 'b>(binners: &[&'b (dyn Binner<'a> + 'b)]) -> Result<u64, Error> {
    checked_strides(binners).map(|(_, total)| total)
}

/// Compute the flat grid index of the elements `[offset, offset + length)`
/// attached to `thread` in every binner.
///
/// `output` is reset to `length` zeroed entries before the binners run, and
/// each binner is applied exactly once. On success, `output[i]` lies in
/// `[0, grid_shape(binners))`.
///
/// # Errors
/// Propagates the first error reported by a binner. In that case, the contents
/// of `output` are unspecified (but it is still safe to reuse it for another
/// call to this function).
pub fn bin_grid<'a, 'b>(
    binners: &[&'b (dyn Binner<'a> + 'b)],
    thread: usize,
    offset: usize,
    length: usize,
    output: &mut BinIndices,
) -> Result<(), Error> {
    let strides = grid_strides(binners)?;
    log::debug!(
        "binning {length} elements of thread {thread} into a {}-dimensional grid \
         (strides: {strides:?})",
        binners.len()
    );
    output.reset(length);
    for (binner, stride) in binners.iter().zip(strides) {
        binner.to_bins(thread, offset, output, length, stride)?;
    }
    Ok(())
}

/// Split a flat grid index into the per-dimension indices (the inverse of the
/// flattening performed by [`bin_grid`]).
///
/// Returns `None` if `flat_index` lies outside of the grid described by
/// `shapes` (or if any shape is 0).
pub fn unravel_index(flat_index: u64, shapes: &[u64]) -> Option<Vec<u64>> {
    let mut remainder = flat_index;
    let mut out = Vec::with_capacity(shapes.len());
    for &shape in shapes {
        if shape == 0 {
            return None;
        }
        out.push(remainder % shape);
        remainder /= shape;
    }
    if remainder == 0 { Some(out) } else { None }
}
