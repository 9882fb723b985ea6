//! 2-opt refinement of an open sequence with fixed endpoints.
//!
//! A move reverses the interior segment `[i, j]`, `0 < i < j < n - 1`. The
//! delta accounts for the reversed inner edges as well, so the refinement
//! stays monotone on asymmetric matrices.

use crate::distance::DistanceMatrix;
use crate::model::SolverPlace;

/// Improvements smaller than this are ignored.
const EPSILON: f64 = 1e-9;

/// Apply the best improving reversal of each pass until none is left or
/// `max_passes` passes were made.
///
/// Length and endpoints of `seq` are preserved and its total length never
/// grows. Reversals ignore precedence, so callers only refine sequences
/// whose interior order is unconstrained.
pub fn refine<D: DistanceMatrix + ?Sized>(
    mut seq: Vec<SolverPlace>,
    distance: &D,
    max_passes: usize,
) -> Vec<SolverPlace> {
    if seq.len() < 4 {
        return seq;
    }

    for _ in 0..max_passes {
        match best_move(&seq, distance) {
            Some((i, j)) => seq[i..=j].reverse(),
            None => break,
        }
    }
    seq
}

/// The reversal `(i, j)` with the most negative delta, if any improves.
fn best_move<D: DistanceMatrix + ?Sized>(seq: &[SolverPlace], distance: &D) -> Option<(usize, usize)> {
    let n = seq.len();
    let d = |a: usize, b: usize| distance.distance(seq[a].idx, seq[b].idx);

    // inner[m] = sum over t < m of (backward - forward) cost of edge (t, t + 1)
    let mut inner = vec![0.0; n];
    for m in 1..n {
        inner[m] = inner[m - 1] + d(m, m - 1) - d(m - 1, m);
    }

    let mut best: Option<(usize, usize, f64)> = None;

    for i in 1..n - 2 {
        for j in i + 1..n - 1 {
            let delta = d(i - 1, j) + d(i, j + 1) - d(i - 1, i) - d(j, j + 1) + (inner[j] - inner[i]);

            if delta < -EPSILON && best.is_none_or(|(_, _, best_delta)| delta < best_delta) {
                best = Some((i, j, delta));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}
