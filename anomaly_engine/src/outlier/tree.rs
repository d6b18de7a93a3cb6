//! A single isolation tree, stored as an arena of nodes.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Euler–Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// A node in an isolation tree. Children are indices into [`IsolationTree::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: u32,
        right: u32,
    },
    /// Number of training rows that reached this leaf.
    Leaf { size: usize },
}

/// One randomly partitioned tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    /// Grows a tree over `rows` (indices into `data`), splitting until a node
    /// holds one row, has no varying feature, or sits at `max_depth`.
    pub(crate) fn grow<R: AsRef<[f64]>>(
        data: &[R],
        rows: &mut [usize],
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(data, rows, 0, max_depth, rng);
        tree
    }

    fn grow_node<R: AsRef<[f64]>>(
        &mut self,
        data: &[R],
        rows: &mut [usize],
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> u32 {
        let id = self.push(Node::Leaf { size: rows.len() });
        if depth >= max_depth || rows.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can separate rows.
        let width = data[rows[0]].as_ref().len();
        let mut candidates = Vec::with_capacity(width);
        for feature in 0..width {
            let (lo, hi) = column_range(data, rows, feature);
            if hi > lo {
                candidates.push((feature, lo, hi));
            }
        }
        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.random_range(0..candidates.len())];
        let threshold = rng.random_range(lo..hi);

        let split = partition(rows, |r| data[r].as_ref()[feature] < threshold);
        // `threshold` is drawn from [lo, hi), so the row holding `hi` always goes right
        // and the row holding `lo` goes left unless threshold == lo.
        if split == 0 || split == rows.len() {
            return id;
        }

        let (left_rows, right_rows) = rows.split_at_mut(split);
        let left = self.grow_node(data, left_rows, depth + 1, max_depth, rng);
        let right = self.grow_node(data, right_rows, depth + 1, max_depth, rng);
        self.nodes[id as usize] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    fn push(&mut self, node: Node) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    /// Depth at which `sample` lands, plus the expected remaining depth of its leaf.
    pub fn path_length(&self, sample: &[f64]) -> f64 {
        let mut id = 0usize;
        let mut depth = 0usize;
        loop {
            match &self.nodes[id] {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if sample[*feature] < *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                    depth += 1;
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Average path length of an unsuccessful binary-search-tree lookup over `n` items.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn column_range<R: AsRef<[f64]>>(data: &[R], rows: &[usize], feature: usize) -> (f64, f64) {
    rows.iter()
        .map(|&r| data[r].as_ref()[feature])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Reorders `rows` so every row matching `goes_left` comes first; returns the split point.
fn partition(rows: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut split = 0;
    for i in 0..rows.len() {
        if goes_left(rows[i]) {
            rows.swap(i, split);
            split += 1;
        }
    }
    split
}
