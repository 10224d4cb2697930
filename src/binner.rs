//! The capability contract shared by every binning strategy, and the output
//! type that binners accumulate into.

use crate::{BufferView, Error, MaskView};

/// An integer buffer that binners accumulate bin indices into.
///
/// The only way to build one is zero-initialized (see [`BinIndices::zeroed`]),
/// and the only way to modify its contents is through [`Binner::to_bins`],
/// which adds `index * stride` to each entry. Together, these properties make
/// sure that composing several binners (see [`crate::bin_grid`]) always starts
/// from a known state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinIndices {
    indices: Vec<u64>,
}

impl BinIndices {
    /// `len` zero-initialized entries
    pub fn zeroed(len: usize) -> Self {
        Self {
            indices: vec![0; len],
        }
    }

    /// Zero the buffer and resize it to `len` entries (this reuses the
    /// allocation)
    pub fn reset(&mut self, len: usize) {
        self.indices.clear();
        self.indices.resize(len, 0);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.indices
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.indices
    }

    /// Exposes the entries for accumulation. Binners must only ever add to
    /// the entries.
    pub(crate) fn accumulation_slice(&mut self) -> &mut [u64] {
        &mut self.indices
    }
}

/// The interface implemented by all binning strategies.
///
/// A binner maps each element of a column to a bin index in `[0, shape())`.
/// Binners are configured once and then re-used across chunks: before each
/// chunk, the coordinating actor attaches each worker thread's buffers (this
/// needs `&mut self`); afterwards, the workers concurrently call
/// [`Binner::to_bins`] (which only needs `&self`).
///
/// The `'a` lifetime is the lifetime of the attached buffers.
pub trait Binner<'a>: Send + Sync {
    /// For the elements `[offset, offset + length)` attached to `thread`,
    /// compute each element's bin index and add `index * stride` to
    /// `output[i - offset]`.
    ///
    /// # Errors
    /// Fails (without touching `output`) when `thread` is out of bounds, no
    /// data is attached to `thread`, the range exceeds an attached buffer,
    /// `output` holds fewer than `length` entries, or the largest bin index
    /// scaled by `stride` overflows a `u64`.
    ///
    /// The accumulated sums themselves are not checked: callers composing
    /// several binners should get their strides from
    /// [`crate::grid_strides`], which guarantees every flat index fits.
    fn to_bins(
        &self,
        thread: usize,
        offset: usize,
        output: &mut BinIndices,
        length: usize,
        stride: u64,
    ) -> Result<(), Error>;

    /// number of elements currently attached to `thread`
    fn data_length(&self, thread: usize) -> Result<usize, Error>;

    /// total number of bins, including the reserved bins
    fn shape(&self) -> u64;

    /// number of threads the binner was configured for
    fn n_threads(&self) -> usize;

    /// the (opaque) identifier of the expression that is being binned
    fn expression(&self) -> &str;

    /// attach a 1D element buffer to `thread`
    fn set_data(&mut self, thread: usize, data: BufferView<'a>) -> Result<(), Error>;

    /// attach a null-indicator buffer to `thread`
    fn set_data_mask(&mut self, thread: usize, mask: MaskView<'a>) -> Result<(), Error>;

    /// detach the null-indicator buffer of `thread`
    fn clear_data_mask(&mut self, thread: usize) -> Result<(), Error>;

    /// an independent binner with the same configuration and nothing
    /// attached
    fn copy(&self) -> Box<dyn Binner<'a> + 'a>;
}
