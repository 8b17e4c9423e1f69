use crate::core::error::{InputError, UnsupportedStateError};
use crate::core::geometry::provider::GeometryProvider;
use crate::core::models::frame::Frame;
use crate::core::models::indices::GlnIndexSet;
use std::fmt;
use std::str::FromStr;

/// Dihedral above which the dark-state side chain counts as exposed, in degrees.
pub const DARK_EXPOSED_MIN_DIHEDRAL: f64 = 0.0;
/// Angle below which the light-state side chain counts as Buried-I, in degrees.
pub const LIGHT_BURIED_I_MAX_ANGLE: f64 = 25.0;

/// The physiological state of the protein, which fixes the glutamine descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Classified by a four-atom dihedral: Exposed vs. Semi-Buried.
    Dark,
    /// Classified by a three-atom bond angle: Buried-I vs. Buried-II.
    Light,
}

impl State {
    /// Number of atoms in the glutamine descriptor this state uses.
    pub fn descriptor_arity(&self) -> usize {
        match self {
            State::Dark => 4,
            State::Light => 3,
        }
    }

    /// The two mutually exclusive conformations, in bucket order.
    pub fn buckets(&self) -> [Conformation; 2] {
        match self {
            State::Dark => [Conformation::Exposed, Conformation::SemiBuried],
            State::Light => [Conformation::BuriedI, Conformation::BuriedII],
        }
    }
}

impl FromStr for State {
    type Err = UnsupportedStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(State::Dark),
            "light" => Ok(State::Light),
            other => Err(UnsupportedStateError(other.to_string())),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Dark => f.write_str("dark"),
            State::Light => f.write_str("light"),
        }
    }
}

/// Side-chain conformation of the glutamine relative to the flavin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformation {
    Exposed,
    SemiBuried,
    BuriedI,
    BuriedII,
}

impl Conformation {
    /// Position of this conformation within its state's bucket pair.
    pub fn bucket(&self) -> usize {
        match self {
            Conformation::Exposed | Conformation::BuriedI => 0,
            Conformation::SemiBuried | Conformation::BuriedII => 1,
        }
    }
}

impl fmt::Display for Conformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Conformation::Exposed => "Exposed",
            Conformation::SemiBuried => "Semi-Buried",
            Conformation::BuriedI => "Buried-I",
            Conformation::BuriedII => "Buried-II",
        };
        f.write_str(name)
    }
}

/// Dark-state rule: a strictly positive dihedral is exposed, anything else
/// (zero included) is semi-buried.
#[inline]
pub fn classify_dark(dihedral_degrees: f64) -> Conformation {
    if dihedral_degrees > DARK_EXPOSED_MIN_DIHEDRAL {
        Conformation::Exposed
    } else {
        Conformation::SemiBuried
    }
}

/// Light-state rule: an angle strictly below 25° is Buried-I, anything else
/// is Buried-II.
#[inline]
pub fn classify_light(angle_degrees: f64) -> Conformation {
    if angle_degrees < LIGHT_BURIED_I_MAX_ANGLE {
        Conformation::BuriedI
    } else {
        Conformation::BuriedII
    }
}

/// Glutamine dihedral of a frame, in degrees.
pub fn compute_dihedral<G: GeometryProvider + ?Sized>(
    geometry: &G,
    frame: &Frame,
    atoms: [usize; 4],
) -> Result<f64, InputError> {
    Ok(geometry.dihedral(frame, atoms)?.to_degrees())
}

/// Glutamine bond angle of a frame, in degrees.
pub fn compute_angle<G: GeometryProvider + ?Sized>(
    geometry: &G,
    frame: &Frame,
    atoms: [usize; 3],
) -> Result<f64, InputError> {
    Ok(geometry.angle(frame, atoms)?.to_degrees())
}

/// Picks the descriptor operation matching the index set and classifies the
/// frame under `state`.
///
/// Callers validate beforehand that the index set matches the state; a
/// mismatch here is reported rather than silently reinterpreted.
pub fn classify_frame<G: GeometryProvider + ?Sized>(
    geometry: &G,
    frame: &Frame,
    state: State,
    gln: &GlnIndexSet,
) -> Result<Conformation, InputError> {
    match (state, gln) {
        (State::Dark, GlnIndexSet::Dihedral(atoms)) => {
            Ok(classify_dark(compute_dihedral(geometry, frame, *atoms)?))
        }
        (State::Light, GlnIndexSet::Angle(atoms)) => {
            Ok(classify_light(compute_angle(geometry, frame, *atoms)?))
        }
        _ => Err(InputError::DescriptorMismatch {
            copy: None,
            state,
            expected: state.descriptor_arity(),
            found: gln.atoms().len(),
        }),
    }
}
