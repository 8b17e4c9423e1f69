//! # Workflows Module
//!
//! End-to-end procedures built on the engine. A workflow takes file paths and settings,
//! loads and validates every input before the first frame is evaluated, runs the analysis
//! and hands back a result ready to print.
//!
//! - **Classification Workflow** ([`classify`]) - Hydrogen-bond-gated conformation
//!   frequencies of every tracked glutamine copy over one or more trajectory segments.

pub mod classify;
