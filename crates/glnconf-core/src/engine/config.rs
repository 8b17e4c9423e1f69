use crate::core::analysis::conformation::State;
use crate::core::error::InputError;
use crate::core::io::index_array::IndexArray;
use crate::core::models::indices::{AtomIndexSet, GlnIndexSet};
use thiserror::Error;

const HBOND_ARRAY: &str = "H-bond";
const GLN_ARRAY: &str = "Gln";
const HBOND_COLUMNS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// One glutamine copy followed through the trajectory: the hydrogen bond that
/// gates it and the atoms of its conformation descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCopy {
    pub label: String,
    pub hbond: AtomIndexSet,
    pub gln: GlnIndexSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub state: State,
    pub copies: Vec<TrackedCopy>,
}

impl AnalysisConfig {
    /// Builds the configuration from the two index arrays, one row per copy.
    ///
    /// The H-bond array must have four columns (donor, hydrogen, acceptor,
    /// pre-acceptor). The Gln array must have as many columns as the state's
    /// descriptor needs. Without `labels` the copies are named `A`, `B`, ….
    pub fn from_index_arrays(
        state: State,
        hbond_rows: &IndexArray,
        gln_rows: &IndexArray,
        labels: Option<&[String]>,
    ) -> Result<Self, InputError> {
        if hbond_rows.rows() == 0 && gln_rows.rows() == 0 {
            return Err(InputError::NoTrackedCopies);
        }
        if hbond_rows.rows() != gln_rows.rows() {
            return Err(InputError::CopyCountMismatch {
                hbond_rows: hbond_rows.rows(),
                gln_rows: gln_rows.rows(),
            });
        }
        if hbond_rows.columns() != HBOND_COLUMNS {
            return Err(InputError::ShapeMismatch {
                array: HBOND_ARRAY,
                expected: HBOND_COLUMNS,
                found: hbond_rows.columns(),
            });
        }
        let arity = state.descriptor_arity();
        if gln_rows.columns() != arity {
            return Err(InputError::ShapeMismatch {
                array: GLN_ARRAY,
                expected: arity,
                found: gln_rows.columns(),
            });
        }

        let n_copies = hbond_rows.rows();
        let labels: Vec<String> = match labels {
            Some(labels) if labels.len() != n_copies => {
                return Err(InputError::LabelCountMismatch {
                    labels: labels.len(),
                    copies: n_copies,
                });
            }
            Some(labels) => labels.to_vec(),
            None => (0..n_copies).map(default_copy_label).collect(),
        };

        let mut copies = Vec::with_capacity(n_copies);
        for (row, ((hbond, gln), label)) in hbond_rows
            .iter_rows()
            .zip(gln_rows.iter_rows())
            .zip(labels)
            .enumerate()
        {
            let [donor, hydrogen, acceptor, pre_acceptor] =
                to_indices::<HBOND_COLUMNS>(HBOND_ARRAY, row, hbond)?;
            let gln = match state {
                State::Dark => GlnIndexSet::Dihedral(to_indices(GLN_ARRAY, row, gln)?),
                State::Light => GlnIndexSet::Angle(to_indices(GLN_ARRAY, row, gln)?),
            };
            copies.push(TrackedCopy {
                label,
                hbond: AtomIndexSet::new(donor, hydrogen, acceptor, pre_acceptor),
                gln,
            });
        }

        Ok(Self { state, copies })
    }

    /// Checks every index of every copy against a system of `n_atoms` atoms,
    /// and that each Gln descriptor is the one the state calls for.
    pub fn validate_against(&self, n_atoms: usize) -> Result<(), InputError> {
        for copy in &self.copies {
            let arity_matches = matches!(
                (self.state, &copy.gln),
                (State::Dark, GlnIndexSet::Dihedral(_)) | (State::Light, GlnIndexSet::Angle(_))
            );
            if !arity_matches {
                return Err(InputError::DescriptorMismatch {
                    copy: Some(copy.label.clone()),
                    state: self.state,
                    expected: self.state.descriptor_arity(),
                    found: copy.gln.atoms().len(),
                });
            }

            let out_of_range = copy
                .hbond
                .roles()
                .into_iter()
                .chain(copy.gln.roles())
                .find(|&(_, index)| index >= n_atoms);
            if let Some((role, index)) = out_of_range {
                return Err(InputError::IndexOutOfRange {
                    copy: copy.label.clone(),
                    role,
                    index,
                    n_atoms,
                });
            }
        }
        Ok(())
    }

    pub fn n_copies(&self) -> usize {
        self.copies.len()
    }

    pub fn copy_labels(&self) -> Vec<String> {
        self.copies.iter().map(|copy| copy.label.clone()).collect()
    }
}

/// `A`, `B`, …, `Z`, `AA`, `AB`, … for copy 0, 1, ….
pub fn default_copy_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.iter().rev().map(|&b| b as char).collect()
}

fn to_indices<const N: usize>(
    array: &'static str,
    row: usize,
    values: &[i64],
) -> Result<[usize; N], InputError> {
    let mut indices = [0usize; N];
    for (slot, &value) in indices.iter_mut().zip(values) {
        *slot = usize::try_from(value).map_err(|_| InputError::NegativeIndex { array, row, value })?;
    }
    Ok(indices)
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    state: Option<State>,
    copies: Vec<TrackedCopy>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }
    pub fn copy(mut self, label: impl Into<String>, hbond: AtomIndexSet, gln: GlnIndexSet) -> Self {
        self.copies.push(TrackedCopy {
            label: label.into(),
            hbond,
            gln,
        });
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        if self.copies.is_empty() {
            return Err(ConfigError::MissingParameter("copies"));
        }
        Ok(AnalysisConfig {
            state: self.state.ok_or(ConfigError::MissingParameter("state"))?,
            copies: self.copies,
        })
    }
}
