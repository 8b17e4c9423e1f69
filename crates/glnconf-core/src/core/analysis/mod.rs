//! Per-frame decisions and their aggregation over a trajectory.
//!
//! [`hbond`] decides whether the monitored hydrogen bond is present in a frame,
//! [`conformation`] classifies the glutamine side chain on frames where it is, and
//! [`frequency`] turns the per-copy tallies into conformation percentages.

pub mod conformation;
pub mod frequency;
pub mod hbond;
