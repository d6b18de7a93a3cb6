//! Per-step distances for the series aligner.

/// Norms below this are treated as zero vectors.
const DEGENERATE_NORM: f64 = 1e-12;

/// Angular separation in radians between two feature vectors.
///
/// Only direction matters: `v` and `k * v` for any positive `k` are zero apart.
/// If either vector is (numerically) zero the distance is defined as 0.
///
/// # Panics
/// If the two vectors have different widths.
pub fn angle_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "step distance called on vectors of different width"
    );
    if a == b {
        return 0.0;
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a < DEGENERATE_NORM || norm_b < DEGENERATE_NORM {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let cos = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    cos.acos()
}

/// Plain Euclidean distance.
///
/// # Panics
/// If the two vectors have different widths.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "step distance called on vectors of different width"
    );
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
