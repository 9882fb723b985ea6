//! Heuristic selection for one search request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::heuristics::{category_graph, insertion, two_opt};
use crate::model::SolverPlace;
use crate::precedence::PrecedenceMatrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Edge density (explicit edges over `k * (k - 1) / 2` category pairs)
    /// up to which the category-graph heuristic is used.
    pub density_threshold: f64,
    /// Refine unconstrained insertion results with 2-opt.
    pub two_opt: bool,
    /// Maximum 2-opt passes.
    pub two_opt_passes: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            density_threshold: 0.5,
            two_opt: true,
            two_opt_passes: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Insertion { refine: bool },
    CategoryGraph,
}

impl Strategy {
    /// Resolve the heuristic from the explicit precedence graph.
    ///
    /// Without explicit edges any interior order is valid, so 2-opt may
    /// reorder the insertion result freely. Sparse graphs go to the
    /// category-graph heuristic, dense ones to precedence-aware insertion.
    pub fn select(edge_count: usize, category_count: usize, options: &SolverOptions) -> Self {
        if edge_count == 0 {
            return Strategy::Insertion {
                refine: options.two_opt,
            };
        }

        let pairs = category_count * category_count.saturating_sub(1) / 2;
        let density = edge_count as f64 / pairs.max(1) as f64;

        if density <= options.density_threshold {
            Strategy::CategoryGraph
        } else {
            Strategy::Insertion { refine: false }
        }
    }
}

/// A request-scoped solver: fixed terminals, matrices and strategy.
#[derive(Debug, Clone)]
pub struct Solver<D> {
    distance: D,
    precedence: PrecedenceMatrix,
    source: SolverPlace,
    target: SolverPlace,
    strategy: Strategy,
    two_opt_passes: usize,
}

impl<D: DistanceMatrix> Solver<D> {
    pub fn new(
        distance: D,
        precedence: PrecedenceMatrix,
        source: SolverPlace,
        target: SolverPlace,
        options: &SolverOptions,
    ) -> Self {
        let category_count = precedence.order().saturating_sub(2);
        let strategy = Strategy::select(precedence.edges().len(), category_count, options);
        debug!(?strategy, edges = precedence.edges().len(), category_count, "solver strategy selected");

        Self {
            distance,
            precedence,
            source,
            target,
            strategy,
            two_opt_passes: options.two_opt_passes,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn distance(&self) -> &D {
        &self.distance
    }

    /// Sequence the remaining candidates between the fixed source and target.
    pub fn solve<'a>(&self, remaining: impl IntoIterator<Item = &'a SolverPlace>) -> Vec<SolverPlace> {
        let candidates: Vec<SolverPlace> = remaining.into_iter().copied().collect();

        match self.strategy {
            Strategy::Insertion { refine } => {
                let seq = insertion::advise(
                    self.source,
                    self.target,
                    &candidates,
                    &self.distance,
                    &self.precedence,
                );
                if refine {
                    two_opt::refine(seq, &self.distance, self.two_opt_passes)
                } else {
                    seq
                }
            }
            Strategy::CategoryGraph => category_graph::advise(
                self.source,
                self.target,
                &candidates,
                &self.distance,
                &self.precedence,
            ),
        }
    }
}
