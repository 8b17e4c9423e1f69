use crate::core::analysis::conformation::State;
use crate::core::geometry::provider::GeometryError;
use crate::core::io::dcd::DcdError;
use crate::core::io::index_array::IndexArrayError;
use crate::core::io::pdb::PdbError;
use crate::core::models::indices::AtomRole;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or inconsistent input. Always fatal, and raised before any frame
/// is processed whenever the input files themselves are at fault.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to read trajectory '{path}': {source}", path = path.display())]
    Trajectory {
        path: PathBuf,
        #[source]
        source: DcdError,
    },

    #[error("Failed to read topology '{path}': {source}", path = path.display())]
    Topology {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Failed to read index array '{path}': {source}", path = path.display())]
    IndexArray {
        path: PathBuf,
        #[source]
        source: IndexArrayError,
    },

    #[error("Trajectory '{path}' has {found} atoms, but the topology has {expected}", path = path.display())]
    AtomCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("No trajectory segments were given")]
    NoTrajectory,

    #[error("No glutamine copies to track: the index arrays have no rows")]
    NoTrackedCopies,

    #[error("The {array} index array has {found} columns, expected {expected}")]
    ShapeMismatch {
        array: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Index arrays disagree on the number of copies: {hbond_rows} H-bond rows vs. {gln_rows} Gln rows")]
    CopyCountMismatch { hbond_rows: usize, gln_rows: usize },

    #[error("{labels} copy labels were given for {copies} tracked copies")]
    LabelCountMismatch { labels: usize, copies: usize },

    #[error("Negative atom index {value} in row {row} of the {array} index array")]
    NegativeIndex {
        array: &'static str,
        row: usize,
        value: i64,
    },

    #[error("Atom index {index} ({role}) of copy '{copy}' is out of range for a system of {n_atoms} atoms")]
    IndexOutOfRange {
        copy: String,
        role: AtomRole,
        index: usize,
        n_atoms: usize,
    },

    #[error(
        "Gln descriptor{of_copy} has {found} atoms, but the {state} state requires {expected}",
        of_copy = copy.as_ref().map(|c| format!(" of copy '{}'", c)).unwrap_or_default()
    )]
    DescriptorMismatch {
        copy: Option<String>,
        state: State,
        expected: usize,
        found: usize,
    },
}

/// A tracked copy never satisfied the hydrogen-bond criterion, so its
/// conformation frequencies have no denominator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Copy '{copy}' has no frames satisfying the hydrogen-bond criterion; its frequencies are undefined")]
pub struct NoBondedFramesError {
    pub copy: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported state '{0}': expected 'dark' or 'light'")]
pub struct UnsupportedStateError(pub String);
