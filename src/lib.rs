/*!
Converts raw column values into discrete bin indices for out-of-core grouped
aggregations (histograms, group-by grids) over large tabular datasets.

# High-Level: Binning for grouped aggregations

A grouped aggregation over a column is computed in chunks, and each chunk is
split among worker threads. For every element, a [`Binner`] computes the index
of the bin that the element belongs to. The aggregation functions (counts,
sums, means, ...) are then applied per bin by external code.

Several binners can be composed into an N-dimensional grid (see
[`bin_grid`]): each binner adds `index * stride` into a shared
[`BinIndices`] buffer, so the result is already the flattened grid index.

Missing data never produces an error. Each [`BinnerOrdinal`] reserves bins for
NaN values, null values and values that are too large:

```
use gridbin::{BinIndices, Binner, BinnerOrdinal, BufferView, ByteOrder, OrdinalConfig};

let config = OrdinalConfig::new(1, "x", 5, 10).unwrap();
let mut binner = BinnerOrdinal::for_type::<f64>(config, ByteOrder::Native).unwrap();

let values = [10.0, 12.0, 25.0, 9.0, f64::NAN];
binner.set_data(0, BufferView::from_slice(&values)).unwrap();

let mut output = BinIndices::zeroed(values.len());
binner.to_bins(0, 0, &mut output, values.len(), 1).unwrap();
assert_eq!(output.as_slice(), &[2, 4, 7, 1, 0]);
```

# Developer Guide

The per-element kernels live in [`gridbin_nostd_internal`]. This crate owns
everything that needs to allocate (per-thread partition tables, outputs,
configuration) and picks a monomorphized kernel for each binner.

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the crates in this package
mod binner;
mod buffer;
mod dispatch;
mod error;
mod grid;
mod ordinal;
mod partition;

// pull in symbols that visible outside of the package
pub use binner::{BinIndices, Binner};
pub use buffer::{BufferView, MaskView};
pub use dispatch::{ByteOrder, Element, ElementKind};
pub use error::Error;
pub use gridbin_nostd_internal::{MASKED, N_RESERVED_BINS, NAN_BIN, NULL_BIN};
pub use grid::{bin_grid, grid_shape, grid_strides, unravel_index};
pub use ordinal::{BinnerOrdinal, MAX_THREADS, OrdinalConfig, OrdinalDescriptor};
pub use partition::{PartitionRegistry, ThreadPartition};
