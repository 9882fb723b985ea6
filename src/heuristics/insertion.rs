//! Infrequent-first insertion heuristic.
//!
//! Categories are processed from the scarcest to the most populous. For each
//! one, the candidate and gap with the cheapest precedence-valid insertion
//! wins. See https://doi.org/10.1145/1463434.1463449.

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::trace;

use crate::distance::DistanceMatrix;
use crate::model::SolverPlace;
use crate::precedence::PrecedenceMatrix;

/// Costs closer than this are ties; the first one found is kept.
const EPSILON: f64 = 1e-9;

pub fn advise<D: DistanceMatrix + ?Sized>(
    source: SolverPlace,
    target: SolverPlace,
    candidates: &[SolverPlace],
    distance: &D,
    precedence: &PrecedenceMatrix,
) -> Vec<SolverPlace> {
    let mut seq = vec![source, target];

    for group in group_by_category(candidates, source.cat, target.cat) {
        match find_best(&seq, &group, distance, precedence) {
            Some((place, index)) => seq.insert(index, place),
            None => trace!(category = group[0].cat, "no precedence-valid gap, category dropped"),
        }
    }
    seq
}

/// Group candidates by category, scarcest category first.
///
/// Source and target categories are left out. Equal sizes keep ascending
/// category order.
pub(crate) fn group_by_category(
    candidates: &[SolverPlace],
    source_cat: usize,
    target_cat: usize,
) -> Vec<Vec<SolverPlace>> {
    let mut groups: BTreeMap<usize, Vec<SolverPlace>> = BTreeMap::new();
    for place in candidates {
        if place.cat == source_cat || place.cat == target_cat {
            continue;
        }
        groups.entry(place.cat).or_default().push(*place);
    }

    let mut groups: Vec<_> = groups.into_values().collect();
    groups.sort_by_key(|group| group.len());
    groups
}

/// Pick the candidate and insertion index with the smallest distance
/// increase among the precedence-valid gaps.
///
/// The returned index is where the candidate goes with `Vec::insert`.
pub(crate) fn find_best<D: DistanceMatrix + ?Sized>(
    seq: &[SolverPlace],
    group: &[SolverPlace],
    distance: &D,
    precedence: &PrecedenceMatrix,
) -> Option<(SolverPlace, usize)> {
    let mut best: Option<(SolverPlace, usize, f64)> = None;

    for place in group {
        for k in valid_gaps(seq, place.cat, precedence) {
            let (prev, next) = (seq[k].idx, seq[k + 1].idx);
            let cost = distance.distance(prev, place.idx) + distance.distance(place.idx, next)
                - distance.distance(prev, next);

            if best.is_none_or(|(_, _, best_cost)| cost < best_cost - EPSILON) {
                best = Some((*place, k + 1, cost));
            }
        }
    }

    best.map(|(place, index, _)| (place, index))
}

/// Gaps `k` (between `seq[k]` and `seq[k + 1]`) where `cat` may be inserted.
///
/// Everything up to `k` must not be required after `cat`, everything from
/// `k + 1` on must not be required before it. Since `seq` itself respects
/// the closure, the valid gaps form one contiguous range.
fn valid_gaps(seq: &[SolverPlace], cat: usize, precedence: &PrecedenceMatrix) -> Range<usize> {
    let last_pred = seq
        .iter()
        .rposition(|p| precedence.is_before(p.cat, cat))
        .unwrap_or(0);
    let first_succ = seq
        .iter()
        .position(|p| precedence.is_before(cat, p.cat))
        .unwrap_or(seq.len() - 1);

    last_pred..first_succ
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DenseMatrix;
    use crate::model::PrecedenceEdge;

    fn unit_matrix(order: usize) -> DenseMatrix {
        DenseMatrix::from_fn(order, |fr, to| if fr == to { 0.0 } else { 1.0 })
    }

    /// `count` places where place `idx` satisfies categories `0..count - idx`.
    fn staircase(count: usize) -> Vec<SolverPlace> {
        (0..count)
            .flat_map(|idx| (0..count - idx).map(move |cat| SolverPlace::new(idx, cat)))
            .collect()
    }

    #[test]
    fn test_groups_share_category() {
        let groups = group_by_category(&staircase(5), 5, 6);

        assert_eq!(groups.len(), 5);
        for group in &groups {
            assert!(group.iter().all(|p| p.cat == group[0].cat));
        }
    }

    #[test]
    fn test_groups_scarcest_first() {
        let groups = group_by_category(&staircase(5), 5, 6);

        for pair in groups.windows(2) {
            assert!(pair[0].len() < pair[1].len());
        }
        assert_eq!(groups[0][0].cat, 4);
        assert_eq!(groups[4][0].cat, 0);
    }

    #[test]
    fn test_groups_skip_terminals() {
        let places = vec![SolverPlace::new(0, 0), SolverPlace::new(1, 2), SolverPlace::new(2, 3)];
        let groups = group_by_category(&places, 2, 3);

        assert_eq!(groups, vec![vec![SolverPlace::new(0, 0)]]);
    }

    #[test]
    fn test_selects_cheapest_insertion() {
        let seq = vec![
            SolverPlace::new(4, 3), // s
            SolverPlace::new(0, 0),
            SolverPlace::new(3, 2),
            SolverPlace::new(5, 4), // t
        ];
        let group = vec![SolverPlace::new(1, 1), SolverPlace::new(2, 1)];

        let mut rows: Vec<Vec<f64>> = (0..6)
            .map(|i| (0..6).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        rows[2][3] = 0.9;
        let matrix = DenseMatrix::from_rows(rows).unwrap();
        let precedence = PrecedenceMatrix::new(3, &[]).unwrap();

        let (best, index) = find_best(&seq, &group, &matrix, &precedence).unwrap();

        assert_eq!(best.idx, 2);
        assert_eq!(index, 2);
    }

    #[test]
    fn test_insertion_index_forced_by_precedence() {
        // [s, 0, 1, 3, 4, t] with 3 -> 2 -> 4: category 2 must land between 3 and 4
        let seq = vec![
            SolverPlace::new(5, 5),
            SolverPlace::new(0, 0),
            SolverPlace::new(1, 1),
            SolverPlace::new(3, 3),
            SolverPlace::new(4, 4),
            SolverPlace::new(6, 6),
        ];
        let group = vec![SolverPlace::new(2, 2)];
        let precedence =
            PrecedenceMatrix::new(5, &[PrecedenceEdge::new(3, 2), PrecedenceEdge::new(2, 4)]).unwrap();

        let (best, index) = find_best(&seq, &group, &unit_matrix(7), &precedence).unwrap();

        assert_eq!(best, SolverPlace::new(2, 2));
        assert_eq!(index, 4);
    }

    #[test]
    fn test_totally_ordered_categories() {
        let source = SolverPlace::new(4, 4);
        let target = SolverPlace::new(5, 5);
        let places = vec![
            SolverPlace::new(2, 2),
            SolverPlace::new(0, 0),
            SolverPlace::new(3, 3),
            SolverPlace::new(1, 1),
        ];
        let edges: Vec<_> = (0..3).map(|c| PrecedenceEdge::new(c, c + 1)).collect();
        let precedence = PrecedenceMatrix::new(4, &edges).unwrap();

        let seq = advise(source, target, &places, &unit_matrix(6), &precedence);

        assert_eq!(
            seq,
            vec![
                source,
                SolverPlace::new(0, 0),
                SolverPlace::new(1, 1),
                SolverPlace::new(2, 2),
                SolverPlace::new(3, 3),
                target,
            ]
        );
    }

    #[test]
    fn test_empty_category_is_dropped() {
        // categories 2 and 3 have no candidates
        let places = vec![
            SolverPlace::new(0, 0),
            SolverPlace::new(1, 1),
            SolverPlace::new(4, 4),
            SolverPlace::new(5, 5),
        ];
        let source = SolverPlace::new(6, 6);
        let target = SolverPlace::new(7, 7);
        let precedence = PrecedenceMatrix::new(6, &[]).unwrap();

        let seq = advise(source, target, &places, &unit_matrix(8), &precedence);

        assert_eq!(seq.len(), places.len() + 2);
        assert!(seq.iter().all(|p| p.cat != 2 && p.cat != 3));
    }

    #[test]
    fn test_one_representative_per_category() {
        let source = SolverPlace::new(5, 3);
        let target = SolverPlace::new(6, 4);
        let places = staircase(3);
        let precedence = PrecedenceMatrix::new(3, &[]).unwrap();

        let seq = advise(source, target, &places, &unit_matrix(7), &precedence);

        let mut cats: Vec<_> = seq[1..seq.len() - 1].iter().map(|p| p.cat).collect();
        cats.sort();
        assert_eq!(cats, vec![0, 1, 2]);
    }
}
