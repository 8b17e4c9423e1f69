//! # Core Models Module
//!
//! Plain data structures shared by every other layer.
//!
//! ## Key Components
//!
//! - [`indices`] - Hydrogen-bond and glutamine atom index sets, and the roles they name
//! - [`frame`] - Per-timestep coordinate snapshots and whole trajectories
//! - [`topology`] - Atom records read from a structure file, used to validate and describe indices
//!
//! All index types are 0-based and immutable once constructed.

pub mod frame;
pub mod indices;
pub mod topology;
