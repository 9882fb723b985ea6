//! Sequencing heuristics.
//!
//! Every heuristic takes the fixed source and target, the surviving
//! candidates, a distance matrix and the precedence relation, and returns a
//! sequence starting with the source and ending with the target. Categories
//! without candidates are dropped; all others appear exactly once, ordered
//! consistently with the precedence closure.

pub mod category_graph;
pub mod insertion;
pub mod two_opt;
