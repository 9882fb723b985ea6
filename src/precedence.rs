//! Category precedence: validation, cycle detection and transitive closure.
//!
//! Categories are dense ids. For a request with `n` user categories, id `n`
//! is the source and `n + 1` the target. The working relation always puts
//! the source before and the target after every other category.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::PrecedenceEdge;

/// Closed "must precede" relation with O(1) queries.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecedenceMatrix {
    order: usize,
    closure: Vec<bool>,
    edges: Vec<PrecedenceEdge>,
}

impl PrecedenceMatrix {
    /// Build the relation for `category_count` user categories.
    ///
    /// Rejects edges that leave `0..category_count` and edge sets containing
    /// a cycle (self-loops included). Source and target edges are
    /// synthesized before closing.
    pub fn new(category_count: usize, edges: &[PrecedenceEdge]) -> Result<Self> {
        for edge in edges {
            if edge.fr >= category_count || edge.to >= category_count {
                return Err(Error::EdgeOutOfRange {
                    fr: edge.fr,
                    to: edge.to,
                    count: category_count,
                });
            }
        }

        if let Some(cycle) = find_cycle(category_count, edges) {
            return Err(Error::PrecedenceCycle { cycle });
        }

        let order = category_count + 2;
        let source = category_count;
        let target = category_count + 1;

        let mut closure = vec![false; order * order];
        for edge in edges {
            closure[edge.fr * order + edge.to] = true;
        }
        for cat in 0..order {
            if cat != source {
                closure[source * order + cat] = true;
            }
            if cat != target {
                closure[cat * order + target] = true;
            }
        }
        close(&mut closure, order);

        Ok(Self {
            order,
            closure,
            edges: dedup(edges.iter().copied()),
        })
    }

    /// Close an explicit adjacency matrix as is, without synthesizing any
    /// source or target edges. Every off-diagonal `true` is kept as a
    /// direct edge.
    pub fn from_adjacency(adjacency: &[Vec<bool>]) -> Self {
        let order = adjacency.len();
        let mut closure = flatten(adjacency);

        let mut edges = Vec::new();
        for fr in 0..order {
            for to in 0..order {
                if fr != to && closure[fr * order + to] {
                    edges.push(PrecedenceEdge::new(fr, to));
                }
            }
        }

        close(&mut closure, order);

        Self { order, closure, edges }
    }

    /// Number of categories, reserved ids included.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Direct edges as supplied, deduplicated; synthetic source/target edges
    /// are not listed.
    pub fn edges(&self) -> &[PrecedenceEdge] {
        &self.edges
    }

    /// True if `a` must be visited before `b`. Never true for `a == b`.
    pub fn is_before(&self, a: usize, b: usize) -> bool {
        a != b && a < self.order && b < self.order && self.closure[a * self.order + b]
    }
}

/// Reachability over paths of length at least one.
pub fn transitive_closure(adjacency: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let order = adjacency.len();
    let mut matrix = flatten(adjacency);
    close(&mut matrix, order);
    matrix.chunks(order.max(1)).map(|row| row.to_vec()).take(order).collect()
}

/// Floyd-Warshall over a row-major boolean buffer.
fn close(matrix: &mut [bool], order: usize) {
    for k in 0..order {
        for i in 0..order {
            if !matrix[i * order + k] {
                continue;
            }
            for j in 0..order {
                if matrix[k * order + j] {
                    matrix[i * order + j] = true;
                }
            }
        }
    }
}

fn flatten(adjacency: &[Vec<bool>]) -> Vec<bool> {
    let order = adjacency.len();
    let mut matrix = vec![false; order * order];
    for (i, row) in adjacency.iter().enumerate() {
        for (j, &value) in row.iter().enumerate().take(order) {
            matrix[i * order + j] = value;
        }
    }
    matrix
}

fn dedup(edges: impl Iterator<Item = PrecedenceEdge>) -> Vec<PrecedenceEdge> {
    let mut seen = BTreeSet::new();
    edges.filter(|edge| seen.insert((edge.fr, edge.to))).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Find a directed cycle among `order` vertices.
///
/// Returns the cycle as a closed walk, e.g. `[0, 1, 2, 0]`; a loop on `v`
/// is reported as `[v, v]`.
pub fn find_cycle(order: usize, edges: &[PrecedenceEdge]) -> Option<Vec<usize>> {
    let mut adjacency = vec![BTreeSet::new(); order];
    for edge in edges {
        if edge.fr < order && edge.to < order {
            adjacency[edge.fr].insert(edge.to);
        }
    }

    let mut color = vec![Color::White; order];
    let mut parent = vec![usize::MAX; order];

    for u in 0..order {
        if color[u] != Color::White {
            continue;
        }
        if let Some((head, tail)) = visit(u, &adjacency, &mut color, &mut parent) {
            let mut cycle = vec![tail];
            let mut cur = tail;
            while cur != head {
                cur = parent[cur];
                cycle.push(cur);
            }
            cycle.reverse();
            cycle.push(head);
            return Some(cycle);
        }
    }
    None
}

/// Returns the back edge `(head, tail)` closing the first cycle found.
fn visit(
    u: usize,
    adjacency: &[BTreeSet<usize>],
    color: &mut [Color],
    parent: &mut [usize],
) -> Option<(usize, usize)> {
    color[u] = Color::Gray;

    for &v in &adjacency[u] {
        match color[v] {
            Color::White => {
                parent[v] = u;
                if let Some(back) = visit(v, adjacency, color, parent) {
                    return Some(back);
                }
            }
            Color::Gray => return Some((v, u)),
            Color::Black => {}
        }
    }

    color[u] = Color::Black;
    None
}
