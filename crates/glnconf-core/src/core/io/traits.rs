use crate::core::models::frame::Trajectory;
use crate::core::models::topology::Topology;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading trajectory file formats.
///
/// Implementors decode every frame of a file into a [`Trajectory`] whose
/// coordinates are expressed in nanometres, together with whatever
/// format-specific header information the file carries.
pub trait TrajectoryFile {
    /// Format-specific header information.
    type Metadata;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a whole trajectory from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not a valid file of this format or
    /// ends before the declared number of frames.
    fn read_from(reader: &mut impl BufRead) -> Result<(Trajectory, Self::Metadata), Self::Error>;

    /// Reads a whole trajectory from a file path.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Trajectory, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for reading the atom table of a structure file.
pub trait TopologyFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads the atom table from a buffered reader.
    fn read_from(reader: &mut impl BufRead) -> Result<Topology, Self::Error>;

    /// Reads the atom table from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Topology, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
