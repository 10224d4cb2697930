// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

#![allow(dead_code)]

use gridbin::{BinIndices, Binner, BinnerOrdinal, BufferView, ByteOrder, Element, OrdinalConfig};
use gridbin_nostd_internal::OrdinalElement;
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

/// A deliberately naive restatement of the index policy, used to check the
/// kernels
pub fn reference_index(
    raw: Option<i64>,
    masked: bool,
    ordinal_count: i64,
    min_value: i64,
) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let value = raw - min_value;
    if masked || value < 0 {
        1
    } else if value >= ordinal_count {
        (ordinal_count + 2) as u64
    } else {
        (value + 2) as u64
    }
}

/// draw `n` integers uniformly from `[lo, hi)`
pub fn random_ints(seed: u64, n: usize, lo: i64, hi: i64) -> Vec<i64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::try_from(lo..hi).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

/// draw `n` mask bytes (roughly `1 / every` of them are masked)
pub fn random_mask(seed: u64, n: usize, every: u8) -> Vec<u8> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::try_from(0..every).unwrap();
    (0..n)
        .map(|_| if dist.sample(&mut rng) == 0 { 1 } else { 0 })
        .collect()
}

/// reverse the byte order of every element
pub fn byte_swapped<T: Element>(values: &[T]) -> Vec<T> {
    values.iter().map(|&v| OrdinalElement::swap_bytes(v)).collect()
}

/// build a single-thread binner
pub fn single_thread_binner<'a, T: Element>(
    ordinal_count: i64,
    min_value: i64,
    byte_order: ByteOrder,
) -> BinnerOrdinal<'a> {
    let config = OrdinalConfig::new(1, "col", ordinal_count, min_value).unwrap();
    BinnerOrdinal::for_type::<T>(config, byte_order).unwrap()
}

/// attach `values` to thread 0 of a fresh binner and return the indices
pub fn bin_values<T: Element>(
    values: &[T],
    mask: Option<&[u8]>,
    ordinal_count: i64,
    min_value: i64,
    byte_order: ByteOrder,
) -> Vec<u64> {
    let mut binner = single_thread_binner::<T>(ordinal_count, min_value, byte_order);
    binner.set_data(0, BufferView::from_slice(values)).unwrap();
    if let Some(mask) = mask {
        binner
            .set_data_mask(0, gridbin::MaskView::from_slice(mask))
            .unwrap();
    }
    let mut output = BinIndices::zeroed(values.len());
    binner
        .to_bins(0, 0, &mut output, values.len(), 1)
        .unwrap();
    output.into_vec()
}
