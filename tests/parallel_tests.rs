use gridbin::{
    BinIndices, Binner, BinnerOrdinal, BufferView, ByteOrder, MaskView, OrdinalConfig, bin_grid,
};

mod common;

use common::{bin_values, random_ints, random_mask};

/// split `[0, n)` into `n_threads` contiguous chunks (the last ones may be
/// shorter)
fn chunk_bounds(n: usize, n_threads: usize) -> Vec<(usize, usize)> {
    let chunk = n.div_ceil(n_threads);
    (0..n_threads)
        .map(|t| ((t * chunk).min(n), ((t + 1) * chunk).min(n)))
        .collect()
}

#[test]
fn threads_bin_their_own_partitions() {
    let n_threads = 4;
    let n = 1001;
    let raw = random_ints(7, n, -10, 60);
    let values: Vec<u32> = raw.iter().map(|&v| v.unsigned_abs() as u32).collect();
    let mask = random_mask(8, n, 6);

    let config = OrdinalConfig::new(n_threads, "col", 40, 5).unwrap();
    let mut binner = BinnerOrdinal::for_type::<u32>(config, ByteOrder::Native).unwrap();

    // the coordinator attaches every partition before any worker starts
    let bounds = chunk_bounds(n, n_threads);
    for (thread, &(start, stop)) in bounds.iter().enumerate() {
        binner
            .set_data(thread, BufferView::from_slice(&values[start..stop]))
            .unwrap();
        binner
            .set_data_mask(thread, MaskView::from_slice(&mask[start..stop]))
            .unwrap();
    }

    let binner = &binner;
    let per_thread: Vec<Vec<u64>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..n_threads)
            .map(|thread| {
                s.spawn(move || {
                    let length = binner.data_length(thread).unwrap();
                    let mut output = BinIndices::zeroed(length);
                    binner.to_bins(thread, 0, &mut output, length, 1).unwrap();
                    output.into_vec()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let parallel: Vec<u64> = per_thread.into_iter().flatten().collect();
    let serial = bin_values(&values, Some(&mask), 40, 5, ByteOrder::Native);
    assert_eq!(parallel, serial);
}

#[test]
fn copies_drive_independent_pipelines() {
    let n = 64;
    let xs: Vec<i16> = random_ints(21, n, -3, 12)
        .into_iter()
        .map(|v| v as i16)
        .collect();
    let ys: Vec<i16> = random_ints(22, n, -3, 12)
        .into_iter()
        .map(|v| v as i16)
        .collect();

    let config = OrdinalConfig::new(1, "col", 8, 0).unwrap();
    let template = BinnerOrdinal::for_type::<i16>(config, ByteOrder::Native).unwrap();

    // each pipeline gets its own copies of the binners
    let results: Vec<Vec<u64>> = std::thread::scope(|s| {
        let handles: Vec<_> = [(&xs, &ys), (&ys, &xs)]
            .into_iter()
            .map(|(first, second)| {
                let mut a = template.copy();
                let mut b = template.copy();
                s.spawn(move || {
                    a.set_data(0, BufferView::from_slice(first)).unwrap();
                    b.set_data(0, BufferView::from_slice(second)).unwrap();
                    let binners = [a.as_ref(), b.as_ref()];
                    let mut output = BinIndices::zeroed(0);
                    bin_grid(&binners, 0, 0, n, &mut output).unwrap();
                    output.into_vec()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let idx_x = bin_values(&xs, None, 8, 0, ByteOrder::Native);
    let idx_y = bin_values(&ys, None, 8, 0, ByteOrder::Native);
    let shape = template.shape();
    for e in 0..n {
        assert_eq!(results[0][e], idx_x[e] + shape * idx_y[e]);
        assert_eq!(results[1][e], idx_y[e] + shape * idx_x[e]);
    }
}

#[test]
fn chunk_bounds_cover_everything() {
    assert_eq!(chunk_bounds(10, 3), vec![(0, 4), (4, 8), (8, 10)]);
    assert_eq!(chunk_bounds(2, 4), vec![(0, 1), (1, 2), (2, 2), (2, 2)]);
}
