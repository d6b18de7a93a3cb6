//! FastDTW: multi-resolution approximation of DTW in linear time and space.
//!
//! Both sequences are halved by averaging neighbouring pairs, the coarse pair is
//! aligned recursively, and the coarse path, widened by `radius` cells and
//! projected back to full resolution, becomes the search window for a
//! [`dtw_windowed`] pass.

use crate::{
    align::dtw::{Window, dtw, dtw_windowed},
    models::AlignmentResult,
};

/// Approximate DTW. Falls back to exact DTW once either side is shorter than `radius + 2`.
pub fn fast_dtw<T, U, F>(x: &[T], y: &[U], radius: usize, dist: F) -> AlignmentResult
where
    T: AsRef<[f64]>,
    U: AsRef<[f64]>,
    F: Fn(&[f64], &[f64]) -> f64 + Copy,
{
    let min_size = radius + 2;
    if x.len() < min_size || y.len() < min_size {
        return dtw(x, y, dist);
    }

    let coarse = fast_dtw(&halve(x), &halve(y), radius, dist);
    let window = expand_window(&coarse.path, x.len(), y.len(), radius);
    dtw_windowed(x, y, &window, dist)
}

/// Averages consecutive pairs; a trailing odd element is dropped.
fn halve<T: AsRef<[f64]>>(seq: &[T]) -> Vec<Vec<f64>> {
    seq.chunks_exact(2)
        .map(|pair| {
            let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
            a.iter().zip(b).map(|(p, q)| (p + q) / 2.0).collect()
        })
        .collect()
}

/// Projects a coarse path onto an `n x m` grid, widened by `radius` coarse cells.
fn expand_window(path: &[(usize, usize)], n: usize, m: usize, radius: usize) -> Window {
    let r = radius as isize;
    let mut ranges: Vec<Option<(usize, usize)>> = vec![None; n];

    for &(pi, pj) in path {
        for di in -r..=r {
            for dj in -r..=r {
                let (ci, cj) = (pi as isize + di, pj as isize + dj);
                if ci < 0 || cj < 0 {
                    continue;
                }
                let (ci, cj) = (ci as usize, cj as usize);
                for i in [2 * ci, 2 * ci + 1] {
                    if i >= n {
                        continue;
                    }
                    for j in [2 * cj, 2 * cj + 1] {
                        if j >= m {
                            continue;
                        }
                        ranges[i] = Some(match ranges[i] {
                            Some((lo, hi)) => (lo.min(j), hi.max(j)),
                            None => (j, j),
                        });
                    }
                }
            }
        }
    }

    let mut prev = (0, m - 1);
    let mut filled: Vec<(usize, usize)> = ranges
        .into_iter()
        .map(|r| {
            prev = r.unwrap_or(prev);
            prev
        })
        .collect();
    // the path must be able to start at the origin and end at the corner
    filled[0].0 = 0;
    filled[n - 1].1 = m - 1;
    Window::from_ranges(filled)
}
