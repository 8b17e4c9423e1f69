//! # GLN-CONF Core Library
//!
//! Hydrogen-bond-gated classification of glutamine side-chain conformations relative to an
//! FMN cofactor, evaluated frame by frame over molecular-dynamics trajectories.
//!
//! ## Architectural Philosophy
//!
//! The library follows the same three-layer split used throughout the project:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Frame`, `AtomIndexSet`), the
//!   geometry kernels behind the `GeometryProvider` trait, the hydrogen-bond criterion, the
//!   conformation classifier, the frequency aggregator, and trajectory/index file readers.
//!
//! - **[`engine`]: The Logic Core.** Validated analysis configuration, the frame runner
//!   (sequential or rayon-parallel), progress reporting and the engine error type.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that load input files,
//!   validate them, drive the engine and hand back a labelled `FrequencyReport`.

pub mod core;
pub mod engine;
pub mod workflows;
