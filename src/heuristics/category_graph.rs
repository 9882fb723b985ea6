//! Oriented greedy heuristic over the category graph.
//!
//! Categories are released in topological order of the direct precedence
//! edges; at each step the nearest candidate of any released category is
//! appended to the tail. See https://doi.org/10.14778/1920841.1920861.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::distance::DistanceMatrix;
use crate::model::{PrecedenceEdge, SolverPlace};
use crate::precedence::PrecedenceMatrix;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CategoryNode {
    /// Number of direct predecessors not yet placed.
    pub pred: usize,
    /// Direct successors.
    pub succ: BTreeSet<usize>,
    pub places: Vec<SolverPlace>,
}

pub fn advise<D: DistanceMatrix + ?Sized>(
    source: SolverPlace,
    target: SolverPlace,
    candidates: &[SolverPlace],
    distance: &D,
    precedence: &PrecedenceMatrix,
) -> Vec<SolverPlace> {
    let mut seq = vec![source];
    let mut cats = form_categories(candidates, precedence.edges(), source.cat, target.cat);

    loop {
        let ready: Vec<usize> = cats
            .iter()
            .filter(|(_, node)| node.pred == 0)
            .map(|(&cat, _)| cat)
            .collect();

        if ready.is_empty() {
            break;
        }

        let empty: Vec<usize> = ready
            .iter()
            .copied()
            .filter(|cat| cats[cat].places.is_empty())
            .collect();

        if !empty.is_empty() {
            for cat in empty {
                trace!(category = cat, "no candidates left, category dropped");
                remove_category(&mut cats, cat);
            }
            continue;
        }

        let last = seq[seq.len() - 1];
        let Some(best) = select_best(last, ready.iter().map(|cat| &cats[cat]), distance) else {
            break;
        };

        seq.push(best);
        remove_category(&mut cats, best.cat);
    }

    if !cats.is_empty() {
        trace!(remaining = cats.len(), "categories never released");
    }

    seq.push(target);
    seq
}

/// One node per category seen in the candidates or the edges.
///
/// Edges touching the source or target category are ignored; those two are
/// fixed at the ends anyway.
pub(crate) fn form_categories(
    candidates: &[SolverPlace],
    edges: &[PrecedenceEdge],
    source_cat: usize,
    target_cat: usize,
) -> BTreeMap<usize, CategoryNode> {
    let is_terminal = |cat: usize| cat == source_cat || cat == target_cat;
    let mut cats: BTreeMap<usize, CategoryNode> = BTreeMap::new();

    for place in candidates.iter().filter(|p| !is_terminal(p.cat)) {
        cats.entry(place.cat).or_default().places.push(*place);
    }

    for edge in edges.iter().filter(|e| !is_terminal(e.fr) && !is_terminal(e.to)) {
        cats.entry(edge.to).or_default();
        if cats.entry(edge.fr).or_default().succ.insert(edge.to) {
            if let Some(node) = cats.get_mut(&edge.to) {
                node.pred += 1;
            }
        }
    }
    cats
}

/// The candidate of any released category nearest to the current tail.
pub(crate) fn select_best<'a, D: DistanceMatrix + ?Sized>(
    last: SolverPlace,
    ready: impl Iterator<Item = &'a CategoryNode>,
    distance: &D,
) -> Option<SolverPlace> {
    let mut best: Option<(SolverPlace, f64)> = None;

    for node in ready {
        for place in &node.places {
            let dist = distance.distance(last.idx, place.idx);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((*place, dist));
            }
        }
    }
    best.map(|(place, _)| place)
}

fn remove_category(cats: &mut BTreeMap<usize, CategoryNode>, cat: usize) {
    if let Some(node) = cats.remove(&cat) {
        for succ in node.succ {
            if let Some(next) = cats.get_mut(&succ) {
                next.pred = next.pred.saturating_sub(1);
            }
        }
    }
}
