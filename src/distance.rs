//! Pairwise distance lookup over a fixed, request-scoped place list.

use crate::error::{Error, Result};
use crate::geometry::{Point, haversine_distance};
use crate::model::SolverPlace;

/// Distances between places, indexed by their position in the working list.
///
/// Implementations are immutable once built. Symmetry is not required.
pub trait DistanceMatrix {
    fn count(&self) -> usize;

    /// Non-negative distance from `fr` to `to`.
    fn distance(&self, fr: usize, to: usize) -> f64;
}

/// Crow-fly distances computed on demand from place locations.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    locations: Vec<Point>,
}

impl HaversineMatrix {
    pub fn new(locations: Vec<Point>) -> Self {
        Self { locations }
    }
}

impl DistanceMatrix for HaversineMatrix {
    fn count(&self) -> usize {
        self.locations.len()
    }

    fn distance(&self, fr: usize, to: usize) -> f64 {
        haversine_distance(&self.locations[fr], &self.locations[to])
    }
}

/// Pre-supplied square matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    order: usize,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Build from rows; every row must have exactly `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let order = rows.len();
        if let Some(row) = rows.iter().position(|row| row.len() != order) {
            return Err(Error::invalid_request(format!(
                "distance matrix row {} has {} entries, expected {}",
                row,
                rows[row].len(),
                order
            )));
        }

        Ok(Self {
            order,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn from_fn(order: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(order * order);
        for fr in 0..order {
            for to in 0..order {
                values.push(f(fr, to));
            }
        }
        Self { order, values }
    }
}

impl DistanceMatrix for DenseMatrix {
    fn count(&self) -> usize {
        self.order
    }

    fn distance(&self, fr: usize, to: usize) -> f64 {
        self.values[fr * self.order + to]
    }
}

impl<D: DistanceMatrix + ?Sized> DistanceMatrix for &D {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn distance(&self, fr: usize, to: usize) -> f64 {
        (**self).distance(fr, to)
    }
}

/// Total length of a sequence walked in order.
pub fn path_length<D: DistanceMatrix + ?Sized>(matrix: &D, seq: &[SolverPlace]) -> f64 {
    seq.windows(2)
        .map(|pair| matrix.distance(pair[0].idx, pair[1].idx))
        .sum()
}
