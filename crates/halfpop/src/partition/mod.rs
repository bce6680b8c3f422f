//! Greedy density-ordered halving.
//!
//! Purpose
//! - Split a dataset into two groups whose quantity sums are close to equal,
//!   filling the first group with the sparsest regions.
//!
//! Algorithm (single pass)
//! - Density `q / area` per region; processing order = density ascending,
//!   ties per `TieBreak` and otherwise by input position (stable sort).
//! - Walk the order keeping `so_far`. With `v` the next quantity and
//!   `half = total / 2`:
//!   - `so_far + v < half`: include, continue;
//!   - `so_far + v == half`: include, stop;
//!   - `so_far + v > half`: include only if the overshoot
//!     `so_far + v - half` is strictly smaller than the undershoot
//!     `half - so_far`, then stop. Equal distances exclude.
//! - Regions after the stopping point keep label 0.
//!
//! This is a heuristic: earlier inclusions are never revisited, so the result
//! is not in general the subset closest to half.

mod greedy;
mod types;

pub use greedy::{allocate, processing_order, walk, Walk};
pub use types::{Allocation, PartitionCfg, PartitionError, Stop, TieBreak};
