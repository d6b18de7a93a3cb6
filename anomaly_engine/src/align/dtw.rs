//! Dynamic time warping over an optional search window.
//!
//! The cost grid is `(n+1) x (m+1)` with infinite borders except the origin.
//! Only the cells inside a [`Window`] are evaluated; a full window gives exact
//! DTW, a narrow one gives the band search used by FastDTW.

use crate::models::AlignmentResult;

/// Per-row inclusive column ranges `(lo, hi)` of the cells to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    ranges: Vec<(usize, usize)>,
}

impl Window {
    /// Every cell of an `n x m` grid.
    pub fn full(n: usize, m: usize) -> Self {
        Self {
            ranges: vec![(0, m.saturating_sub(1)); n],
        }
    }

    pub(crate) fn from_ranges(ranges: Vec<(usize, usize)>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    pub fn cell_count(&self) -> usize {
        self.ranges.iter().map(|(lo, hi)| hi - lo + 1).sum()
    }
}

/// Cumulative costs for the cells of a window. Indices are 1-based grid coordinates.
struct CostGrid<'w> {
    window: &'w Window,
    rows: Vec<Vec<f64>>,
}

impl<'w> CostGrid<'w> {
    fn new(window: &'w Window) -> Self {
        let rows = window
            .ranges
            .iter()
            .map(|(lo, hi)| vec![f64::INFINITY; hi - lo + 1])
            .collect();
        Self { window, rows }
    }

    fn get(&self, gi: usize, gj: usize) -> f64 {
        if gi == 0 || gj == 0 {
            return if gi == 0 && gj == 0 { 0.0 } else { f64::INFINITY };
        }
        let (lo, hi) = self.window.ranges[gi - 1];
        let col = gj - 1;
        if col < lo || col > hi {
            f64::INFINITY
        } else {
            self.rows[gi - 1][col - lo]
        }
    }

    fn set(&mut self, gi: usize, gj: usize, cost: f64) {
        let lo = self.window.ranges[gi - 1].0;
        self.rows[gi - 1][gj - 1 - lo] = cost;
    }
}

/// Aligns `x` and `y` inside `window` under `dist`.
///
/// `cost[i][j] = dist(x[i-1], y[j-1]) + min(cost[i-1][j-1], cost[i-1][j], cost[i][j-1])`.
/// The path is recovered from `(n, m)` back to the origin, preferring the
/// diagonal, then up, then left when predecessors tie.
pub fn dtw_windowed<T, U, F>(x: &[T], y: &[U], window: &Window, dist: F) -> AlignmentResult
where
    T: AsRef<[f64]>,
    U: AsRef<[f64]>,
    F: Fn(&[f64], &[f64]) -> f64,
{
    let (n, m) = (x.len(), y.len());
    if n == 0 || m == 0 {
        return AlignmentResult {
            distance: 0.0,
            path: Vec::new(),
        };
    }
    debug_assert_eq!(window.ranges.len(), n);

    let mut grid = CostGrid::new(window);
    for (i, &(lo, hi)) in window.ranges.iter().enumerate() {
        let gi = i + 1;
        for j in lo..=hi {
            let gj = j + 1;
            let best = grid
                .get(gi - 1, gj - 1)
                .min(grid.get(gi - 1, gj))
                .min(grid.get(gi, gj - 1));
            grid.set(gi, gj, dist(x[i].as_ref(), y[j].as_ref()) + best);
        }
    }

    let distance = grid.get(n, m);
    let path = backtrack(&grid, n, m);
    AlignmentResult { distance, path }
}

/// Exact DTW over the full grid.
pub fn dtw<T, U, F>(x: &[T], y: &[U], dist: F) -> AlignmentResult
where
    T: AsRef<[f64]>,
    U: AsRef<[f64]>,
    F: Fn(&[f64], &[f64]) -> f64,
{
    dtw_windowed(x, y, &Window::full(x.len(), y.len()), dist)
}

fn backtrack(grid: &CostGrid<'_>, n: usize, m: usize) -> Vec<(usize, usize)> {
    let (mut gi, mut gj) = (n, m);
    let mut path = vec![(gi - 1, gj - 1)];

    while gi > 1 || gj > 1 {
        // candidate order is the tie-break order
        let candidates = [
            (gi > 1 && gj > 1, gi.wrapping_sub(1), gj.wrapping_sub(1)),
            (gi > 1, gi.wrapping_sub(1), gj),
            (gj > 1, gi, gj.wrapping_sub(1)),
        ];
        let mut next: Option<(usize, usize, f64)> = None;
        for (valid, ci, cj) in candidates {
            if !valid {
                continue;
            }
            let c = grid.get(ci, cj);
            if next.is_none_or(|(_, _, best)| c < best) {
                next = Some((ci, cj, c));
            }
        }
        let Some((ci, cj, _)) = next else { break };
        gi = ci;
        gj = cj;
        path.push((gi - 1, gj - 1));
    }

    path.reverse();
    path
}
