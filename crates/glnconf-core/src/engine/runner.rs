use super::config::AnalysisConfig;
use super::progress::{Progress, ProgressReporter};
use crate::core::analysis::conformation::{Conformation, classify_frame};
use crate::core::analysis::frequency::FrequencyAggregator;
use crate::core::analysis::hbond::HBondCriterion;
use crate::core::error::InputError;
use crate::core::geometry::provider::GeometryProvider;
use crate::core::models::frame::Frame;
use tracing::{info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluates every frame of a trajectory for every tracked copy.
///
/// For each copy the hydrogen bond is tested first; the Gln descriptor is only
/// computed, and the frame only counted, when the bond holds.
pub struct TrajectoryRunner<'a, G: ?Sized> {
    geometry: &'a G,
    config: &'a AnalysisConfig,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a, G: GeometryProvider + Sync + ?Sized> TrajectoryRunner<'a, G> {
    pub fn new(
        geometry: &'a G,
        config: &'a AnalysisConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            geometry,
            config,
            reporter,
        }
    }

    /// Outcome of one frame, in copy order: `None` for a copy whose hydrogen
    /// bond is absent, otherwise its conformation.
    pub fn evaluate_frame(&self, frame: &Frame) -> Result<Vec<Option<Conformation>>, InputError> {
        let criterion = HBondCriterion::new(self.geometry);
        self.config
            .copies
            .iter()
            .map(|copy| {
                if criterion.is_hbonded(frame, &copy.hbond)? {
                    classify_frame(self.geometry, frame, self.config.state, &copy.gln).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect()
    }

    #[instrument(skip_all, name = "trajectory_runner", fields(frames = frames.len(), copies = self.config.n_copies()))]
    pub fn run(&self, frames: &[Frame]) -> Result<FrequencyAggregator, InputError> {
        self.reporter.report(Progress::PhaseStart {
            name: "Frame Evaluation",
        });
        self.reporter.report(Progress::FramesStart {
            total_frames: frames.len() as u64,
            copies: self.config.n_copies(),
        });

        #[cfg(not(feature = "parallel"))]
        let aggregator = self.fold_sequential(frames)?;

        #[cfg(feature = "parallel")]
        let aggregator = self.fold_parallel(frames)?;

        self.reporter.report(Progress::FramesFinish);
        info!(
            total_frames = aggregator.total_frames(),
            "Frame evaluation finished."
        );
        self.reporter.report(Progress::PhaseFinish);
        Ok(aggregator)
    }

    /// Single-threaded evaluation regardless of the `parallel` feature.
    pub fn run_sequential(&self, frames: &[Frame]) -> Result<FrequencyAggregator, InputError> {
        self.fold_sequential(frames)
    }

    fn step(
        &self,
        mut aggregator: FrequencyAggregator,
        (index, frame): (usize, &Frame),
    ) -> Result<FrequencyAggregator, InputError> {
        let outcomes = self.evaluate_frame(frame)?;
        trace!(frame = index, ?outcomes, "Frame evaluated.");
        aggregator.record_frame(&outcomes);
        self.reporter.report(Progress::FrameEvaluated {
            bonded_copies: outcomes.iter().flatten().count(),
        });
        Ok(aggregator)
    }

    fn fold_sequential(&self, frames: &[Frame]) -> Result<FrequencyAggregator, InputError> {
        frames.iter().enumerate().try_fold(
            FrequencyAggregator::new(self.config.n_copies()),
            |aggregator, item| self.step(aggregator, item),
        )
    }

    #[cfg(feature = "parallel")]
    fn fold_parallel(&self, frames: &[Frame]) -> Result<FrequencyAggregator, InputError> {
        let n_copies = self.config.n_copies();
        frames
            .par_iter()
            .enumerate()
            .try_fold(
                || FrequencyAggregator::new(n_copies),
                |aggregator, item| self.step(aggregator, item),
            )
            .try_reduce(
                || FrequencyAggregator::new(n_copies),
                |left, right| Ok(left.merge(right)),
            )
    }
}
