/*!
Internal machinery for `gridbin`: the element abstraction and the
per-element ordinal binning kernel.

This crate is `no_std` and never allocates. Everything that needs to own
memory (per-thread partition tables, output buffers, configuration) lives in
the public `gridbin` crate, which wraps the kernels defined here.

# Developer Guide

The kernels in [`kernel`] are generic over an [`OrdinalElement`] and over a
`const FOREIGN: bool` flag that encodes the byte order of the stored data.
The public crate instantiates every (element, byte order) combination once,
ahead of time, and picks one of them when a binner is configured. As a
result, the hot loop never branches on the element type or byte order.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]

mod element;
pub mod kernel;

pub use element::OrdinalElement;
pub use kernel::{
    MASKED, NAN_BIN, NULL_BIN, N_RESERVED_BINS, OrdinalParams, accumulate_ordinal_bins,
    ordinal_bin_index,
};
