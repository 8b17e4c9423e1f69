use super::conformation::{Conformation, State};
use crate::core::error::NoBondedFramesError;

/// Percentage of `bucket_count` over `bonded_frames`, or `None` when the copy
/// never formed the bond and the ratio is undefined.
#[inline]
pub fn bucket_frequency(bucket_count: usize, bonded_frames: usize) -> Option<f64> {
    if bonded_frames == 0 {
        None
    } else {
        Some(100.0 * bucket_count as f64 / bonded_frames as f64)
    }
}

/// The two conformation counters of one tracked copy, indexed by
/// [`Conformation::bucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConformationBucketCounts {
    counts: [usize; 2],
}

impl ConformationBucketCounts {
    pub fn get(&self, conformation: Conformation) -> usize {
        self.counts[conformation.bucket()]
    }

    pub fn as_array(&self) -> [usize; 2] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts[0] + self.counts[1]
    }

    fn increment(&mut self, conformation: Conformation) {
        self.counts[conformation.bucket()] += 1;
    }
}

/// Everything counted for one tracked copy: its own bonded-frame denominator
/// and the bucket counters it feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyTally {
    bonded_frames: usize,
    buckets: ConformationBucketCounts,
}

impl CopyTally {
    pub fn bonded_frames(&self) -> usize {
        self.bonded_frames
    }

    pub fn buckets(&self) -> &ConformationBucketCounts {
        &self.buckets
    }

    fn record(&mut self, outcome: Option<Conformation>) {
        if let Some(conformation) = outcome {
            self.bonded_frames += 1;
            self.buckets.increment(conformation);
        }
    }

    fn absorb(&mut self, other: &CopyTally) {
        self.bonded_frames += other.bonded_frames;
        self.buckets.counts[0] += other.buckets.counts[0];
        self.buckets.counts[1] += other.buckets.counts[1];
    }
}

/// Running tallies for every tracked copy over (part of) a trajectory.
///
/// Counters start at zero and only ever grow. Two aggregators built over
/// disjoint frame ranges combine with [`merge`](Self::merge), which is what the
/// parallel runner relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyAggregator {
    total_frames: usize,
    tallies: Vec<CopyTally>,
}

impl FrequencyAggregator {
    pub fn new(n_copies: usize) -> Self {
        Self {
            total_frames: 0,
            tallies: vec![CopyTally::default(); n_copies],
        }
    }

    /// Records one frame. `outcomes[i]` is `None` when copy `i` was not
    /// hydrogen-bonded, otherwise the conformation it was classified as.
    pub fn record_frame(&mut self, outcomes: &[Option<Conformation>]) {
        debug_assert_eq!(outcomes.len(), self.tallies.len());
        self.total_frames += 1;
        for (tally, outcome) in self.tallies.iter_mut().zip(outcomes) {
            tally.record(*outcome);
        }
    }

    pub fn merge(mut self, other: FrequencyAggregator) -> FrequencyAggregator {
        debug_assert_eq!(self.tallies.len(), other.tallies.len());
        self.total_frames += other.total_frames;
        for (tally, theirs) in self.tallies.iter_mut().zip(&other.tallies) {
            tally.absorb(theirs);
        }
        self
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn n_copies(&self) -> usize {
        self.tallies.len()
    }

    pub fn tally(&self, copy: usize) -> Option<&CopyTally> {
        self.tallies.get(copy)
    }

    /// Turns the tallies into percentages.
    ///
    /// `copy_labels` names the copies in tally order. A copy without bonded
    /// frames is reported as a [`NoBondedFramesError`] in its slot while the
    /// other copies still get their frequencies.
    pub fn finalize(
        &self,
        label: impl Into<String>,
        state: State,
        copy_labels: &[String],
    ) -> FrequencyReport {
        debug_assert_eq!(copy_labels.len(), self.tallies.len());
        let copies = self
            .tallies
            .iter()
            .zip(copy_labels)
            .map(|(tally, copy_label)| {
                let bonded = tally.bonded_frames;
                let [first, second] = state.buckets();
                let bucket = |conformation: Conformation| {
                    let count = tally.buckets.get(conformation);
                    bucket_frequency(count, bonded).map(|percentage| BucketFrequency {
                        conformation,
                        count,
                        percentage,
                    })
                };
                match (bucket(first), bucket(second)) {
                    (Some(first), Some(second)) => Ok(CopyFrequencies {
                        label: copy_label.clone(),
                        bonded_frames: bonded,
                        buckets: [first, second],
                    }),
                    _ => Err(NoBondedFramesError {
                        copy: copy_label.clone(),
                    }),
                }
            })
            .collect();

        FrequencyReport {
            label: label.into(),
            state,
            total_frames: self.total_frames,
            copies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketFrequency {
    pub conformation: Conformation,
    pub count: usize,
    pub percentage: f64,
}

/// Frequencies of one tracked copy. The two percentages sum to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyFrequencies {
    pub label: String,
    pub bonded_frames: usize,
    pub buckets: [BucketFrequency; 2],
}

/// Final result of a classification run.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyReport {
    label: String,
    state: State,
    total_frames: usize,
    copies: Vec<Result<CopyFrequencies, NoBondedFramesError>>,
}

impl FrequencyReport {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// One entry per tracked copy, in copy order.
    pub fn copies(&self) -> &[Result<CopyFrequencies, NoBondedFramesError>] {
        &self.copies
    }

    pub fn failures(&self) -> impl Iterator<Item = &NoBondedFramesError> {
        self.copies.iter().filter_map(|copy| copy.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.copies.iter().all(Result::is_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::conformation::{classify_dark, classify_light};

    const TOLERANCE: f64 = 1e-9;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn bucket_frequency_is_undefined_without_bonded_frames() {
        assert_eq!(bucket_frequency(0, 0), None);
        assert_eq!(bucket_frequency(1, 4), Some(25.0));
    }

    #[test]
    fn dark_state_scenario_counts_only_bonded_frames() {
        let dihedrals = [10.0, -5.0, 30.0, -1.0, 0.0, 50.0];
        let bonded = [true, true, true, true, true, false];

        let mut aggregator = FrequencyAggregator::new(1);
        for (dihedral, bonded) in dihedrals.iter().zip(bonded) {
            aggregator.record_frame(&[bonded.then(|| classify_dark(*dihedral))]);
        }

        let tally = aggregator.tally(0).unwrap();
        assert_eq!(aggregator.total_frames(), 6);
        assert_eq!(tally.bonded_frames(), 5);
        assert_eq!(tally.buckets().get(Conformation::Exposed), 2);
        assert_eq!(tally.buckets().get(Conformation::SemiBuried), 3);

        let report = aggregator.finalize("run", State::Dark, &labels(&["A"]));
        let copy = report.copies()[0].as_ref().unwrap();
        assert!((copy.buckets[0].percentage - 40.0).abs() < TOLERANCE);
        assert!((copy.buckets[1].percentage - 60.0).abs() < TOLERANCE);
    }

    #[test]
    fn light_state_scenario_puts_boundary_in_buried_ii() {
        let mut aggregator = FrequencyAggregator::new(1);
        for angle in [10.0, 25.0, 26.0, 24.0] {
            aggregator.record_frame(&[Some(classify_light(angle))]);
        }

        let report = aggregator.finalize("run", State::Light, &labels(&["A"]));
        let copy = report.copies()[0].as_ref().unwrap();
        assert_eq!(copy.buckets[0].conformation, Conformation::BuriedI);
        assert_eq!(copy.buckets[0].count, 2);
        assert!((copy.buckets[0].percentage - 50.0).abs() < TOLERANCE);
        assert!((copy.buckets[1].percentage - 50.0).abs() < TOLERANCE);
    }

    #[test]
    fn copies_keep_independent_denominators() {
        let mut aggregator = FrequencyAggregator::new(2);
        aggregator.record_frame(&[Some(Conformation::Exposed), None]);
        aggregator.record_frame(&[Some(Conformation::SemiBuried), None]);
        aggregator.record_frame(&[Some(Conformation::Exposed), Some(Conformation::SemiBuried)]);
        aggregator.record_frame(&[None, None]);

        let report = aggregator.finalize("run", State::Dark, &labels(&["A", "B"]));
        let a = report.copies()[0].as_ref().unwrap();
        let b = report.copies()[1].as_ref().unwrap();

        assert_eq!(a.bonded_frames, 3);
        assert_eq!(b.bonded_frames, 1);
        assert!((a.buckets[0].percentage - 200.0 / 3.0).abs() < TOLERANCE);
        assert!((b.buckets[1].percentage - 100.0).abs() < TOLERANCE);
        for copy in [a, b] {
            let sum = copy.buckets[0].percentage + copy.buckets[1].percentage;
            assert!((sum - 100.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn unbonded_copy_fails_alone() {
        let mut aggregator = FrequencyAggregator::new(2);
        for _ in 0..3 {
            aggregator.record_frame(&[Some(Conformation::BuriedII), None]);
        }

        let report = aggregator.finalize("run", State::Light, &labels(&["A", "B"]));

        assert!(!report.is_complete());
        assert!(report.copies()[0].is_ok());
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec![&NoBondedFramesError {
                copy: "B".to_string()
            }]
        );
    }

    #[test]
    fn merge_is_order_independent() {
        let frames: Vec<[Option<Conformation>; 2]> = vec![
            [Some(Conformation::Exposed), None],
            [None, Some(Conformation::SemiBuried)],
            [Some(Conformation::SemiBuried), Some(Conformation::Exposed)],
            [Some(Conformation::Exposed), None],
            [None, None],
        ];

        let mut whole = FrequencyAggregator::new(2);
        let mut head = FrequencyAggregator::new(2);
        let mut tail = FrequencyAggregator::new(2);
        for (i, outcomes) in frames.iter().enumerate() {
            whole.record_frame(outcomes);
            if i < 2 {
                head.record_frame(outcomes);
            } else {
                tail.record_frame(outcomes);
            }
        }

        assert_eq!(head.clone().merge(tail.clone()), whole);
        assert_eq!(tail.merge(head), whole);
    }

    #[test]
    fn bonded_frames_never_exceed_total_frames() {
        let mut aggregator = FrequencyAggregator::new(1);
        aggregator.record_frame(&[None]);
        aggregator.record_frame(&[Some(Conformation::BuriedI)]);

        let tally = aggregator.tally(0).unwrap();
        assert_eq!(tally.buckets().total(), tally.bonded_frames());
        assert!(tally.bonded_frames() <= aggregator.total_frames());
    }
}
