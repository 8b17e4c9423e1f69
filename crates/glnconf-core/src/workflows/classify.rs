use crate::core::analysis::conformation::State;
use crate::core::analysis::frequency::FrequencyReport;
use crate::core::error::InputError;
use crate::core::geometry::provider::CartesianGeometry;
use crate::core::io::dcd::DcdFile;
use crate::core::io::index_array::{IndexArray, read_index_array};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::{TopologyFile, TrajectoryFile};
use crate::core::models::frame::Trajectory;
use crate::core::models::topology::Topology;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::TrajectoryRunner;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

const TRAJECTORY_EXTENSION: &str = "dcd";
const TOPOLOGY_EXTENSION: &str = "pdb";

/// Everything the classification needs, as paths and settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyRequest {
    pub state: State,
    /// Trajectory segments in playback order. Each base name `B` is read from
    /// `B.dcd`; the topology comes from the first segment's `B.pdb`.
    pub trajectory_bases: Vec<PathBuf>,
    /// H-bond index array, one `(donor, hydrogen, acceptor, pre-acceptor)` row per copy.
    pub hbond_indices: PathBuf,
    /// Gln descriptor index array, four columns (dark) or three (light) per copy.
    pub gln_indices: PathBuf,
    /// Run label printed in front of every result line. Defaults to the file
    /// name of the first trajectory segment.
    pub label: Option<String>,
    /// One label per copy. Defaults to `A`, `B`, ….
    pub copy_labels: Option<Vec<String>>,
}

#[instrument(skip_all, name = "classify_workflow", fields(state = %request.state))]
pub fn run(
    request: &ClassifyRequest,
    reporter: &ProgressReporter,
) -> Result<FrequencyReport, EngineError> {
    // === Phase 1: Load and validate every input ===
    reporter.report(Progress::PhaseStart {
        name: "Loading Inputs",
    });
    let first_base = request
        .trajectory_bases
        .first()
        .ok_or(InputError::NoTrajectory)?;

    let topology = load_topology(first_base)?;
    let trajectory = load_trajectory(&request.trajectory_bases, &topology)?;
    let hbond_rows = load_index_array(&request.hbond_indices)?;
    let gln_rows = load_index_array(&request.gln_indices)?;

    let config = AnalysisConfig::from_index_arrays(
        request.state,
        &hbond_rows,
        &gln_rows,
        request.copy_labels.as_deref(),
    )?;
    config.validate_against(topology.n_atoms())?;
    log_tracked_copies(&config, &topology);

    reporter.report(Progress::Message(format!(
        "Loaded {} frames of {} atoms, tracking {} copies",
        trajectory.n_frames(),
        trajectory.n_atoms(),
        config.n_copies()
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Evaluate frames ===
    let geometry = CartesianGeometry::new();
    let aggregator = TrajectoryRunner::new(&geometry, &config, reporter).run(trajectory.frames())?;

    // === Phase 3: Report ===
    let label = request
        .label
        .clone()
        .unwrap_or_else(|| default_run_label(first_base));
    let report = aggregator.finalize(label, config.state, &config.copy_labels());

    for failure in report.failures() {
        warn!("{}", failure);
    }
    info!(
        total_frames = report.total_frames(),
        complete = report.is_complete(),
        "Classification finished."
    );
    Ok(report)
}

/// `(B.dcd, B.pdb)` for a segment base name. A base that already carries the
/// `.dcd` extension is accepted as is.
pub fn segment_paths(base: &Path) -> (PathBuf, PathBuf) {
    let has_dcd_extension = base
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TRAJECTORY_EXTENSION));
    if has_dcd_extension {
        return (base.to_path_buf(), base.with_extension(TOPOLOGY_EXTENSION));
    }
    (
        append_extension(base, TRAJECTORY_EXTENSION),
        append_extension(base, TOPOLOGY_EXTENSION),
    )
}

fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn default_run_label(base: &Path) -> String {
    let (trajectory, _) = segment_paths(base);
    trajectory
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.display().to_string())
}

fn load_topology(base: &Path) -> Result<Topology, InputError> {
    let (_, path) = segment_paths(base);
    let topology = PdbFile::read_from_path(&path).map_err(|source| InputError::Topology {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), atoms = topology.n_atoms(), "Loaded topology.");
    Ok(topology)
}

fn load_trajectory(bases: &[PathBuf], topology: &Topology) -> Result<Trajectory, InputError> {
    let mut trajectory = Trajectory::empty(topology.n_atoms());
    for base in bases {
        let (path, _) = segment_paths(base);
        let (segment, header) =
            DcdFile::read_from_path(&path).map_err(|source| InputError::Trajectory {
                path: path.clone(),
                source,
            })?;
        if segment.n_atoms() != topology.n_atoms() {
            return Err(InputError::AtomCountMismatch {
                path,
                expected: topology.n_atoms(),
                found: segment.n_atoms(),
            });
        }
        info!(
            path = %path.display(),
            frames = segment.n_frames(),
            timestep = header.timestep,
            "Loaded trajectory segment."
        );
        trajectory
            .extend(segment)
            .map_err(|e| InputError::AtomCountMismatch {
                path,
                expected: e.expected,
                found: e.found,
            })?;
    }
    Ok(trajectory)
}

fn load_index_array(path: &Path) -> Result<IndexArray, InputError> {
    read_index_array(path).map_err(|source| InputError::IndexArray {
        path: path.to_path_buf(),
        source,
    })
}

fn log_tracked_copies(config: &AnalysisConfig, topology: &Topology) {
    for copy in &config.copies {
        let describe = |roles: Vec<(_, usize)>| {
            roles
                .into_iter()
                .map(|(role, index)| format!("{}={}", role, topology.describe(index)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        info!(
            copy = %copy.label,
            hbond = %describe(copy.hbond.roles().to_vec()),
            gln = %describe(copy.gln.roles().collect()),
            "Tracking glutamine copy."
        );
    }
}
