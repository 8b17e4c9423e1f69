use crate::core::error::InputError;
use crate::core::geometry::kernels::nm_to_angstrom;
use crate::core::geometry::provider::GeometryProvider;
use crate::core::models::frame::Frame;
use crate::core::models::indices::AtomIndexSet;

/// Upper bound on the donor–acceptor distance, in ångström.
pub const MAX_DONOR_ACCEPTOR_DISTANCE: f64 = 3.9;
/// Upper bound on the hydrogen–acceptor distance, in ångström.
pub const MAX_HYDROGEN_ACCEPTOR_DISTANCE: f64 = 2.5;
/// Lower bound shared by the three bond angles, in degrees.
pub const MIN_BOND_ANGLE: f64 = 90.0;

/// The five quantities the hydrogen-bond criterion is evaluated on, for one
/// frame and one index set. Distances in ångström, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricMeasurement {
    pub donor_acceptor_distance: f64,
    pub hydrogen_acceptor_distance: f64,
    pub donor_hydrogen_acceptor_angle: f64,
    pub pre_acceptor_acceptor_donor_angle: f64,
    pub pre_acceptor_acceptor_hydrogen_angle: f64,
}

impl GeometricMeasurement {
    /// True iff all five thresholds hold strictly. A value sitting exactly on a
    /// threshold fails, and so does NaN.
    pub fn satisfies_criterion(&self) -> bool {
        self.donor_acceptor_distance < MAX_DONOR_ACCEPTOR_DISTANCE
            && self.hydrogen_acceptor_distance < MAX_HYDROGEN_ACCEPTOR_DISTANCE
            && self.donor_hydrogen_acceptor_angle > MIN_BOND_ANGLE
            && self.pre_acceptor_acceptor_donor_angle > MIN_BOND_ANGLE
            && self.pre_acceptor_acceptor_hydrogen_angle > MIN_BOND_ANGLE
    }
}

/// Fixed Baker–Hubbard-type hydrogen-bond test.
///
/// The provider reports nanometres and radians; both are converted here,
/// before any comparison, so the thresholds stay in ångström and degrees.
pub struct HBondCriterion<'g, G: ?Sized> {
    geometry: &'g G,
}

impl<'g, G: GeometryProvider + ?Sized> HBondCriterion<'g, G> {
    pub fn new(geometry: &'g G) -> Self {
        Self { geometry }
    }

    pub fn measure(
        &self,
        frame: &Frame,
        indices: &AtomIndexSet,
    ) -> Result<GeometricMeasurement, InputError> {
        let geometry = self.geometry;
        Ok(GeometricMeasurement {
            donor_acceptor_distance: nm_to_angstrom(
                geometry.distance(frame, indices.donor_acceptor())?,
            ),
            hydrogen_acceptor_distance: nm_to_angstrom(
                geometry.distance(frame, indices.hydrogen_acceptor())?,
            ),
            donor_hydrogen_acceptor_angle: geometry
                .angle(frame, indices.donor_hydrogen_acceptor())?
                .to_degrees(),
            pre_acceptor_acceptor_donor_angle: geometry
                .angle(frame, indices.pre_acceptor_acceptor_donor())?
                .to_degrees(),
            pre_acceptor_acceptor_hydrogen_angle: geometry
                .angle(frame, indices.pre_acceptor_acceptor_hydrogen())?
                .to_degrees(),
        })
    }

    pub fn is_hbonded(&self, frame: &Frame, indices: &AtomIndexSet) -> Result<bool, InputError> {
        Ok(self.measure(frame, indices)?.satisfies_criterion())
    }
}
