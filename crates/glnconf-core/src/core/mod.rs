//! # Core Module
//!
//! The computational foundation of GLN-CONF: everything needed to decide, for a single
//! trajectory frame, whether a monitored hydrogen bond is present and which side-chain
//! conformation the glutamine adopts.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Atom index sets, frames, trajectories and topologies
//! - **Geometry** ([`geometry`]) - Distance, angle and dihedral kernels behind a provider trait
//! - **Analysis** ([`analysis`]) - Hydrogen-bond criterion, conformation classifier and
//!   frequency aggregation
//! - **File I/O** ([`io`]) - DCD trajectories, PDB topologies and integer index arrays
//! - **Errors** ([`error`]) - The input, no-bonded-frames and unsupported-state failures
//!
//! ## Units
//!
//! Coordinates are held in nanometres and the geometry provider reports radians, the same
//! conventions as MDTraj. Conversion to ångström and degrees happens only where the
//! hydrogen-bond thresholds and classification rules are applied.

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod io;
pub mod models;
