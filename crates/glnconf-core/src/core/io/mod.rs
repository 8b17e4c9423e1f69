//! Provides input functionality for trajectory, topology and index files.
//!
//! Trajectories and topologies are read through the trait-based interface in
//! [`traits`]; the integer index arrays naming the monitored atoms are read by
//! [`index_array`].

pub mod dcd;
pub mod index_array;
pub mod pdb;
pub mod traits;
