//! Non-owning views of the buffers that get attached to a binner.
//!
//! Both view types borrow the caller's memory for the lifetime `'a`. A binner
//! holding a view can't outlive the memory it refers to, so the "caller keeps
//! the buffer alive for every call that references it" contract is checked by
//! the compiler rather than by convention.

use crate::{Error, dispatch::Element};
use ndarray::{ArrayView, Dimension};

/// A borrowed, contiguous buffer of fixed-width elements.
///
/// The view stores the raw bytes plus the item size and the number of
/// dimensions reported by the producer. Whether the buffer is acceptable (1D,
/// the right item size) is decided when it gets attached to a binner.
#[derive(Clone, Copy, Debug)]
pub struct BufferView<'a> {
    bytes: &'a [u8],
    itemsize: usize,
    ndim: usize,
}

impl<'a> BufferView<'a> {
    /// View a slice of elements
    pub fn from_slice<T: Element>(values: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(values),
            itemsize: T::WIDTH,
            ndim: 1,
        }
    }

    /// View an ndarray. The array must be in standard (C-contiguous) layout.
    pub fn from_array<T: Element, D: Dimension>(
        array: ArrayView<'a, T, D>,
    ) -> Result<Self, Error> {
        let ndim = array.ndim();
        let values = array
            .to_slice()
            .ok_or(Error::buffer_layout("data", "the array isn't C-contiguous"))?;
        Ok(Self {
            ndim,
            ..Self::from_slice(values)
        })
    }

    /// View raw bytes described by an item size and a shape (this is how a
    /// host buffer protocol usually describes memory)
    pub fn from_raw_parts(
        bytes: &'a [u8],
        itemsize: usize,
        shape: &[usize],
    ) -> Result<Self, Error> {
        if itemsize == 0 {
            return Err(Error::buffer_layout("data", "the itemsize must be positive"));
        }
        let n_elements = shape
            .iter()
            .try_fold(1_usize, |acc, &len| acc.checked_mul(len))
            .ok_or(Error::buffer_layout("data", "the shape overflows"))?;
        if n_elements.checked_mul(itemsize) != Some(bytes.len()) {
            return Err(Error::buffer_layout(
                "data",
                "the number of bytes doesn't match the shape and itemsize",
            ));
        }
        Ok(Self {
            bytes,
            itemsize,
            ndim: shape.len(),
        })
    }

    /// the raw bytes of the buffer
    pub fn bytes(&self) -> &'a [u8] {
        debug_assert_eq!(self.bytes.len() % self.itemsize, 0);
        self.bytes
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// number of elements
    pub fn len(&self) -> usize {
        self.bytes.len() / self.itemsize
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A borrowed per-element null indicator. A byte equal to `1` flags the
/// element as null (numpy's convention); any other value means valid.
#[derive(Clone, Copy, Debug)]
pub struct MaskView<'a> {
    flags: &'a [u8],
    ndim: usize,
}

impl<'a> MaskView<'a> {
    pub fn from_slice(flags: &'a [u8]) -> Self {
        Self { flags, ndim: 1 }
    }

    /// View a slice of booleans, where `true` flags a null element
    pub fn from_bools(flags: &'a [bool]) -> Self {
        Self {
            flags: bytemuck::cast_slice::<bool, u8>(flags),
            ndim: 1,
        }
    }

    /// View an ndarray of mask bytes. The array must be in standard layout.
    pub fn from_array<D: Dimension>(array: ArrayView<'a, u8, D>) -> Result<Self, Error> {
        let ndim = array.ndim();
        let flags = array
            .to_slice()
            .ok_or(Error::buffer_layout("mask", "the array isn't C-contiguous"))?;
        Ok(Self { flags, ndim })
    }

    pub fn flags(&self) -> &'a [u8] {
        self.flags
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, ShapeBuilder};

    #[test]
    fn slice_view() {
        let values = [1_i32, 2, 3];
        let view = BufferView::from_slice(&values);
        assert_eq!(view.len(), 3);
        assert_eq!(view.itemsize(), 4);
        assert_eq!(view.ndim(), 1);
        assert_eq!(view.bytes().len(), 12);
        assert_eq!(&view.bytes()[..4], &1_i32.to_ne_bytes());
    }

    #[test]
    fn array_view() {
        let arr = Array1::from(vec![1.0_f64, 2.0]);
        let view = BufferView::from_array(arr.view()).unwrap();
        assert_eq!((view.len(), view.ndim(), view.itemsize()), (2, 1, 8));

        let arr2 = Array2::<u16>::zeros((2, 3));
        let view = BufferView::from_array(arr2.view()).unwrap();
        assert_eq!((view.len(), view.ndim()), (6, 2));

        // fortran ordering isn't C-contiguous
        let arr_f = Array2::<u16>::zeros((2, 3).f());
        assert!(BufferView::from_array(arr_f.view()).is_err());
    }

    #[test]
    fn raw_parts() {
        let bytes = [0_u8; 12];
        let view = BufferView::from_raw_parts(&bytes, 4, &[3]).unwrap();
        assert_eq!(view.len(), 3);
        let view = BufferView::from_raw_parts(&bytes, 2, &[2, 3]).unwrap();
        assert_eq!((view.len(), view.ndim()), (6, 2));

        assert!(BufferView::from_raw_parts(&bytes, 0, &[3]).is_err());
        assert!(BufferView::from_raw_parts(&bytes, 4, &[4]).is_err());
        assert!(BufferView::from_raw_parts(&bytes, 8, &[usize::MAX, 2]).is_err());
    }

    #[test]
    fn mask_view() {
        let flags = [0_u8, 1, 0];
        let mask = MaskView::from_slice(&flags);
        assert_eq!((mask.len(), mask.ndim()), (3, 1));

        let arr2 = Array2::<u8>::zeros((2, 2));
        let mask = MaskView::from_array(arr2.view()).unwrap();
        assert_eq!((mask.len(), mask.ndim()), (4, 2));

        let bools = [false, true, true];
        assert_eq!(MaskView::from_bools(&bools).flags(), &[0, 1, 1]);
    }
}
