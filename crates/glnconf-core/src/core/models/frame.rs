use nalgebra::Point3;
use thiserror::Error;

/// Periodic box of a frame: edge lengths in nanometres, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    pub lengths: [f64; 3],
    pub angles: [f64; 3],
}

/// A single coordinate snapshot of the simulated system.
///
/// Positions are stored in nanometres, indexed by the 0-based atom index used
/// throughout the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    positions: Vec<Point3<f64>>,
    unit_cell: Option<UnitCell>,
}

impl Frame {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            unit_cell: None,
        }
    }

    pub fn with_unit_cell(mut self, unit_cell: UnitCell) -> Self {
        self.unit_cell = Some(unit_cell);
        self
    }

    #[inline]
    pub fn n_atoms(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.positions.get(index)
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn unit_cell(&self) -> Option<&UnitCell> {
        self.unit_cell.as_ref()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Frame {frame} has {found} atoms, but the trajectory has {expected}")]
pub struct AtomCountMismatch {
    pub frame: usize,
    pub expected: usize,
    pub found: usize,
}

/// An ordered sequence of frames sharing one atom table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    n_atoms: usize,
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new(n_atoms: usize, frames: Vec<Frame>) -> Result<Self, AtomCountMismatch> {
        let mut trajectory = Self::empty(n_atoms);
        for frame in frames {
            trajectory.push(frame)?;
        }
        Ok(trajectory)
    }

    pub fn empty(n_atoms: usize) -> Self {
        Self {
            n_atoms,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), AtomCountMismatch> {
        if frame.n_atoms() != self.n_atoms {
            return Err(AtomCountMismatch {
                frame: self.frames.len(),
                expected: self.n_atoms,
                found: frame.n_atoms(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Appends every frame of `other` after the frames already present.
    pub fn extend(&mut self, other: Trajectory) -> Result<(), AtomCountMismatch> {
        for frame in other.frames {
            self.push(frame)?;
        }
        Ok(())
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
