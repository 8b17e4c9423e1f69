//! # Geometry Module
//!
//! Inter-atomic distances, bond angles and dihedrals measured on trajectory frames.
//!
//! The [`provider::GeometryProvider`] trait is the seam between the analysis code and the
//! numerical kernels: the hydrogen-bond criterion and the conformation descriptors only ever
//! ask a provider for measurements. [`provider::CartesianGeometry`] is the default
//! implementation over plain Cartesian coordinates and follows MDTraj's conventions, so
//! distances come back in nanometres and angles in radians.

pub mod kernels;
pub mod provider;
