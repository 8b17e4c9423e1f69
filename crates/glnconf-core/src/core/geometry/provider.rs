use super::kernels;
use crate::core::models::frame::Frame;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Atom index {index} is out of range for a frame with {n_atoms} atoms")]
    AtomOutOfRange { index: usize, n_atoms: usize },
}

/// Measures distances and angles on a trajectory frame.
///
/// Implementations report distances in nanometres and angles in radians.
/// Callers that compare against thresholds in other units convert at their
/// own boundary.
pub trait GeometryProvider {
    /// Distance between the two atoms of `pair`, in nanometres.
    fn distance(&self, frame: &Frame, pair: [usize; 2]) -> Result<f64, GeometryError>;

    /// Angle at the middle atom of `triplet`, in radians.
    fn angle(&self, frame: &Frame, triplet: [usize; 3]) -> Result<f64, GeometryError>;

    /// Torsion angle defined by `quartet`, in radians within `(-π, π]`.
    fn dihedral(&self, frame: &Frame, quartet: [usize; 4]) -> Result<f64, GeometryError>;
}

/// Direct evaluation on the frame's Cartesian coordinates, without periodic imaging.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartesianGeometry;

impl CartesianGeometry {
    pub fn new() -> Self {
        Self
    }

    fn atoms<'f, const N: usize>(
        frame: &'f Frame,
        indices: [usize; N],
    ) -> Result<[&'f Point3<f64>; N], GeometryError> {
        let positions = frame.positions();
        if let Some(&index) = indices.iter().find(|&&i| i >= positions.len()) {
            return Err(GeometryError::AtomOutOfRange {
                index,
                n_atoms: positions.len(),
            });
        }
        Ok(indices.map(|i| &positions[i]))
    }
}

impl GeometryProvider for CartesianGeometry {
    fn distance(&self, frame: &Frame, pair: [usize; 2]) -> Result<f64, GeometryError> {
        let [a, b] = Self::atoms(frame, pair)?;
        Ok(kernels::distance(a, b))
    }

    fn angle(&self, frame: &Frame, triplet: [usize; 3]) -> Result<f64, GeometryError> {
        let [a, b, c] = Self::atoms(frame, triplet)?;
        Ok(kernels::angle(a, b, c))
    }

    fn dihedral(&self, frame: &Frame, quartet: [usize; 4]) -> Result<f64, GeometryError> {
        let [a, b, c, d] = Self::atoms(frame, quartet)?;
        Ok(kernels::dihedral(a, b, c, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn square_frame() -> Frame {
        Frame::new(vec![
            Point3::new(0.1, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.1),
            Point3::new(0.0, 0.1, 0.1),
        ])
    }

    #[test]
    fn measurements_use_frame_coordinates() {
        let geometry = CartesianGeometry::new();
        let frame = square_frame();

        assert!((geometry.distance(&frame, [0, 1]).unwrap() - 0.1).abs() < 1e-12);
        assert!((geometry.angle(&frame, [0, 1, 2]).unwrap() - FRAC_PI_2).abs() < 1e-12);
        assert!((geometry.dihedral(&frame, [0, 1, 2, 3]).unwrap() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let geometry = CartesianGeometry::new();
        let frame = square_frame();

        let err = geometry.angle(&frame, [0, 1, 4]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::AtomOutOfRange {
                index: 4,
                n_atoms: 4
            }
        );
    }
}
