//! Ordinal binning.
//!
//! An ordinal binner maps integer-like values onto `ordinal_count` sequential
//! bins after subtracting `min_value`. The bins are laid out as:
//!
//! | index                   | contents                                          |
//! |-------------------------|---------------------------------------------------|
//! | `0`                     | NaN values                                        |
//! | `1`                     | null values (masked, or smaller than `min_value`) |
//! | `2..=ordinal_count + 1` | ordinals `0..ordinal_count`                       |
//! | `ordinal_count + 2`     | ordinals `>= ordinal_count`                       |

use crate::{
    BinIndices, Binner, BufferView, Error, MaskView, PartitionRegistry, ThreadPartition,
    dispatch::{ByteOrder, Element, ElementKind, KernelFn, select_kernel},
};
use gridbin_nostd_internal::OrdinalParams;
use serde::{Deserialize, Serialize};

/// The largest number of threads a binner can be configured for
pub const MAX_THREADS: usize = 1 << 16;

/// The persistent configuration of an ordinal binner.
///
/// Attached buffers are transient, per-chunk state and are never part of the
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedOrdinalConfig")]
pub struct OrdinalConfig {
    n_threads: usize,
    expression: String,
    ordinal_count: i64,
    min_value: i64,
}

// mirrors OrdinalConfig, so that deserialization goes through the same
// validation as OrdinalConfig::new
#[derive(Deserialize)]
struct UncheckedOrdinalConfig {
    n_threads: usize,
    expression: String,
    ordinal_count: i64,
    min_value: i64,
}

impl TryFrom<UncheckedOrdinalConfig> for OrdinalConfig {
    type Error = Error;

    fn try_from(raw: UncheckedOrdinalConfig) -> Result<Self, Error> {
        OrdinalConfig::new(raw.n_threads, raw.expression, raw.ordinal_count, raw.min_value)
    }
}

impl OrdinalConfig {
    pub fn new(
        n_threads: usize,
        expression: impl Into<String>,
        ordinal_count: i64,
        min_value: i64,
    ) -> Result<Self, Error> {
        if !(1..=MAX_THREADS).contains(&n_threads) {
            return Err(Error::integer_range(
                "n_threads",
                i64::try_from(n_threads).unwrap_or(i64::MAX),
                1,
                MAX_THREADS as i64,
            ));
        }
        if ordinal_count < 0 {
            return Err(Error::integer_range(
                "ordinal_count",
                ordinal_count,
                0,
                i64::MAX,
            ));
        }
        Ok(Self {
            n_threads,
            expression: expression.into(),
            ordinal_count,
            min_value,
        })
    }

    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn ordinal_count(&self) -> i64 {
        self.ordinal_count
    }

    pub fn min_value(&self) -> i64 {
        self.min_value
    }

    fn params(&self) -> Result<OrdinalParams, Error> {
        OrdinalParams::new(self.ordinal_count, self.min_value).map_err(Error::internal)
    }
}

/// Everything needed to rebuild a [`BinnerOrdinal`]: the configuration plus
/// the element type and byte order it was specialized for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalDescriptor {
    pub config: OrdinalConfig,
    pub element_kind: ElementKind,
    pub byte_order: ByteOrder,
}

/// Bins integer-like values into ordinal bins (see the module docs for the
/// layout).
///
/// The binner is specialized for a single [`ElementKind`] and [`ByteOrder`]
/// when it is constructed.
pub struct BinnerOrdinal<'a> {
    config: OrdinalConfig,
    element_kind: ElementKind,
    byte_order: ByteOrder,
    params: OrdinalParams,
    kernel: KernelFn,
    partitions: PartitionRegistry<'a>,
}

impl<'a> BinnerOrdinal<'a> {
    pub fn new(
        config: OrdinalConfig,
        element_kind: ElementKind,
        byte_order: ByteOrder,
    ) -> Result<Self, Error> {
        let params = config.params()?;
        log::debug!(
            "configuring an ordinal binner for \"{}\": {} ordinals starting at {}, {} threads",
            config.expression,
            config.ordinal_count,
            config.min_value,
            config.n_threads
        );
        Ok(Self {
            partitions: PartitionRegistry::new(config.n_threads),
            kernel: select_kernel(element_kind, byte_order),
            config,
            element_kind,
            byte_order,
            params,
        })
    }

    /// Shorthand for [`BinnerOrdinal::new`] where the element kind is taken
    /// from `T`
    pub fn for_type<T: Element>(
        config: OrdinalConfig,
        byte_order: ByteOrder,
    ) -> Result<Self, Error> {
        Self::new(config, T::KIND, byte_order)
    }

    pub fn from_descriptor(descriptor: OrdinalDescriptor) -> Result<Self, Error> {
        Self::new(descriptor.config, descriptor.element_kind, descriptor.byte_order)
    }

    pub fn descriptor(&self) -> OrdinalDescriptor {
        OrdinalDescriptor {
            config: self.config.clone(),
            element_kind: self.element_kind,
            byte_order: self.byte_order,
        }
    }

    pub fn config(&self) -> &OrdinalConfig {
        &self.config
    }

    pub fn ordinal_count(&self) -> i64 {
        self.config.ordinal_count
    }

    pub fn min_value(&self) -> i64 {
        self.config.min_value
    }

    pub fn element_kind(&self) -> ElementKind {
        self.element_kind
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// the bin that holds ordinals that are `>= ordinal_count`
    pub fn overflow_bin(&self) -> u64 {
        self.params.overflow_bin()
    }

    /// the table of attached buffers
    pub fn partitions(&self) -> &PartitionRegistry<'a> {
        &self.partitions
    }

    /// A binner with the same configuration as `self` and no attached
    /// buffers. Unlike [`Binner::copy`], the new binner may borrow buffers
    /// with a different lifetime.
    pub fn detached<'b>(&self) -> BinnerOrdinal<'b> {
        BinnerOrdinal {
            config: self.config.clone(),
            element_kind: self.element_kind,
            byte_order: self.byte_order,
            params: self.params,
            kernel: self.kernel,
            partitions: PartitionRegistry::new(self.config.n_threads),
        }
    }

    /// Attach a fully described partition to `thread`, replacing whatever was
    /// attached before
    pub fn attach_partition(
        &mut self,
        thread: usize,
        partition: ThreadPartition<'a>,
    ) -> Result<(), Error> {
        if let Some(data) = partition.data() {
            self.check_data(data)?;
        }
        if let Some(mask) = partition.mask() {
            check_mask(mask)?;
        }
        self.partitions.attach(thread, partition)
    }

    fn check_data(&self, data: &BufferView) -> Result<(), Error> {
        if data.ndim() != 1 {
            Err(Error::buffer_shape("data", data.ndim()))
        } else if data.itemsize() != self.element_kind.itemsize() {
            Err(Error::item_size(
                self.element_kind.name(),
                self.element_kind.itemsize(),
                data.itemsize(),
            ))
        } else {
            Ok(())
        }
    }
}

fn check_mask(mask: &MaskView) -> Result<(), Error> {
    if mask.ndim() != 1 {
        Err(Error::buffer_shape("mask", mask.ndim()))
    } else {
        Ok(())
    }
}

impl core::fmt::Debug for BinnerOrdinal<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("BinnerOrdinal")
            .field("config", &self.config)
            .field("element_kind", &self.element_kind)
            .field("byte_order", &self.byte_order)
            .field("partitions", &self.partitions)
            .finish()
    }
}

impl<'a> Binner<'a> for BinnerOrdinal<'a> {
    fn to_bins(
        &self,
        thread: usize,
        offset: usize,
        output: &mut BinIndices,
        length: usize,
        stride: u64,
    ) -> Result<(), Error> {
        let partition = self.partitions.partition(thread)?;
        partition.check_range(thread, offset, length)?;
        if output.len() < length {
            return Err(Error::output_length(length, output.len()));
        }
        if (self.shape() - 1).checked_mul(stride).is_none() {
            return Err(Error::stride_overflow(stride, self.shape()));
        }
        let data = partition.data().ok_or(Error::missing_data(thread))?;

        (self.kernel)(
            data.bytes(),
            partition.mask().map(MaskView::flags),
            &self.params,
            offset,
            length,
            output.accumulation_slice(),
            stride,
        )
        .map_err(Error::internal)
    }

    fn data_length(&self, thread: usize) -> Result<usize, Error> {
        self.partitions.data_length(thread)
    }

    fn shape(&self) -> u64 {
        self.params.n_bins()
    }

    fn n_threads(&self) -> usize {
        self.config.n_threads
    }

    fn expression(&self) -> &str {
        &self.config.expression
    }

    fn set_data(&mut self, thread: usize, data: BufferView<'a>) -> Result<(), Error> {
        self.check_data(&data)?;
        self.partitions.set_data(thread, data)
    }

    fn set_data_mask(&mut self, thread: usize, mask: MaskView<'a>) -> Result<(), Error> {
        check_mask(&mask)?;
        self.partitions.set_mask(thread, mask)
    }

    fn clear_data_mask(&mut self, thread: usize) -> Result<(), Error> {
        self.partitions.clear_mask(thread)
    }

    fn copy(&self) -> Box<dyn Binner<'a> + 'a> {
        Box::new(self.detached())
    }
}
