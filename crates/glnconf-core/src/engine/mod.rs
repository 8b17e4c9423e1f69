//! # Engine Module
//!
//! Drives the per-frame analysis over a whole trajectory.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The analysed state and the tracked glutamine copies,
//!   validated against the index arrays and the trajectory before any frame is evaluated
//! - **Runner** ([`runner`]) - Frame loop, sequential or rayon-parallel, producing a
//!   `FrequencyAggregator`
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - The engine-level error type
//!
//! Nothing here holds process-wide state: frames, index sets and the geometry provider are
//! passed in explicitly, so several analyses can run side by side.

pub mod config;
pub mod error;
pub mod progress;
pub mod runner;
