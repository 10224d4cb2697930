//! Per-thread data partitions.
//!
//! Each worker thread owns one [`ThreadPartition`]: the (borrowed) data buffer
//! and optional mask buffer that it bins during the current chunk. The
//! [`PartitionRegistry`] is the table of partitions indexed by thread id.
//!
//! The registry has no interior mutability. Attaching buffers requires
//! `&mut PartitionRegistry`, while binning only needs `&PartitionRegistry`.
//! Consequently, the borrow checker guarantees that all attachments for a chunk
//! happen (in a single coordinating actor) before any worker starts binning, and
//! that no worker can modify another worker's partition.

use crate::{BufferView, Error, MaskView};

/// The buffers attached to a single thread
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPartition<'a> {
    data: Option<BufferView<'a>>,
    mask: Option<MaskView<'a>>,
}

impl<'a> ThreadPartition<'a> {
    /// A partition with `data` attached (and no mask)
    pub fn new(data: BufferView<'a>) -> Self {
        Self {
            data: Some(data),
            mask: None,
        }
    }

    /// A partition with both `data` and `mask` attached
    pub fn with_mask(data: BufferView<'a>, mask: MaskView<'a>) -> Self {
        Self {
            data: Some(data),
            mask: Some(mask),
        }
    }

    pub fn data(&self) -> Option<&BufferView<'a>> {
        self.data.as_ref()
    }

    pub fn mask(&self) -> Option<&MaskView<'a>> {
        self.mask.as_ref()
    }

    /// number of attached data elements (0 when nothing is attached)
    pub fn data_length(&self) -> usize {
        self.data.as_ref().map_or(0, BufferView::len)
    }

    /// Check that `[offset, offset + length)` is covered by the attached
    /// buffers. `thread` is only used to build the error.
    pub(crate) fn check_range(
        &self,
        thread: usize,
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        let data = self.data.as_ref().ok_or(Error::missing_data(thread))?;
        let exceeds = |available: usize| {
            offset
                .checked_add(length)
                .is_none_or(|stop| stop > available)
        };
        if exceeds(data.len()) {
            return Err(Error::data_range("data", thread, offset, length, data.len()));
        }
        if let Some(mask) = &self.mask {
            if exceeds(mask.len()) {
                return Err(Error::data_range("mask", thread, offset, length, mask.len()));
            }
        }
        Ok(())
    }
}

/// A table that maps each thread id in `[0, n_threads)` to its
/// [`ThreadPartition`]
#[derive(Clone, Debug)]
pub struct PartitionRegistry<'a> {
    rows: Vec<ThreadPartition<'a>>,
}

impl<'a> PartitionRegistry<'a> {
    /// A registry for `n_threads` threads, with nothing attached
    pub fn new(n_threads: usize) -> Self {
        Self {
            rows: vec![ThreadPartition::default(); n_threads],
        }
    }

    pub fn n_threads(&self) -> usize {
        self.rows.len()
    }

    pub fn partition(&self, thread: usize) -> Result<&ThreadPartition<'a>, Error> {
        self.rows
            .get(thread)
            .ok_or(Error::thread_index(thread, self.rows.len()))
    }

    fn partition_mut(&mut self, thread: usize) -> Result<&mut ThreadPartition<'a>, Error> {
        let n_threads = self.rows.len();
        self.rows
            .get_mut(thread)
            .ok_or(Error::thread_index(thread, n_threads))
    }

    /// Replace the whole partition of `thread`
    pub fn attach(&mut self, thread: usize, partition: ThreadPartition<'a>) -> Result<(), Error> {
        *self.partition_mut(thread)? = partition;
        Ok(())
    }

    pub fn set_data(&mut self, thread: usize, data: BufferView<'a>) -> Result<(), Error> {
        log::trace!("attaching {} elements to thread {thread}", data.len());
        self.partition_mut(thread)?.data = Some(data);
        Ok(())
    }

    pub fn set_mask(&mut self, thread: usize, mask: MaskView<'a>) -> Result<(), Error> {
        log::trace!("attaching a mask of {} elements to thread {thread}", mask.len());
        self.partition_mut(thread)?.mask = Some(mask);
        Ok(())
    }

    pub fn clear_mask(&mut self, thread: usize) -> Result<(), Error> {
        log::trace!("detaching the mask of thread {thread}");
        self.partition_mut(thread)?.mask = None;
        Ok(())
    }

    /// Detach everything from every thread
    pub fn clear(&mut self) {
        self.rows.fill(ThreadPartition::default());
    }

    pub fn data_length(&self, thread: usize) -> Result<usize, Error> {
        Ok(self.partition(thread)?.data_length())
    }

    /// iterate over `(thread id, partition)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ThreadPartition<'a>)> {
        self.rows.iter().enumerate()
    }
}
