use nalgebra::Point3;

pub const NM_TO_ANGSTROM: f64 = 10.0;

#[inline]
pub fn nm_to_angstrom(nm: f64) -> f64 {
    nm * NM_TO_ANGSTROM
}

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Angle at `b` formed by `a`-`b`-`c`, in radians within `[0, π]`.
///
/// Coincident atoms give NaN.
#[inline]
pub fn angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = a - b;
    let v = c - b;
    let cosine = u.dot(&v) / (u.norm() * v.norm());
    cosine.clamp(-1.0, 1.0).acos()
}

/// Torsion angle of `a`-`b`-`c`-`d` about the `b`-`c` bond, in radians within `(-π, π]`.
///
/// Uses the same sign convention as MDTraj: `atan2(|b2| b1·(b2×b3), (b2×b3)·(b1×b2))`.
#[inline]
pub fn dihedral(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let c1 = b2.cross(&b3);
    let c2 = b1.cross(&b2);

    let y = b1.dot(&c1) * b2.norm();
    let x = c1.dot(&c2);
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.3, 0.4, 0.0);
        assert!(f64_approx_equal(distance(&a, &b), 0.5));
    }

    #[test]
    fn right_angle_is_half_pi() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::origin();
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!(f64_approx_equal(angle(&a, &b, &c), FRAC_PI_2));
    }

    #[test]
    fn collinear_atoms_give_straight_angle() {
        let a = Point3::new(-1.0, 0.0, 0.0);
        let b = Point3::origin();
        let c = Point3::new(2.0, 0.0, 0.0);
        assert!(f64_approx_equal(angle(&a, &b, &c), PI));
    }

    #[test]
    fn coincident_atoms_give_nan_angle() {
        let a = Point3::origin();
        assert!(angle(&a, &a, &Point3::new(1.0, 0.0, 0.0)).is_nan());
    }

    #[test]
    fn cis_and_trans_dihedrals() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(0.0, 0.0, 1.0);

        let cis = Point3::new(1.0, 0.0, 1.0);
        let trans = Point3::new(-1.0, 0.0, 1.0);

        assert!(f64_approx_equal(dihedral(&a, &b, &c, &cis), 0.0));
        assert!(f64_approx_equal(dihedral(&a, &b, &c, &trans).abs(), PI));
    }

    #[test]
    fn dihedral_sign_follows_rotation_sense() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(0.0, 0.0, 1.0);

        let plus_y = Point3::new(0.0, 1.0, 1.0);
        let minus_y = Point3::new(0.0, -1.0, 1.0);

        let positive = dihedral(&a, &b, &c, &plus_y);
        let negative = dihedral(&a, &b, &c, &minus_y);

        assert!(f64_approx_equal(positive, FRAC_PI_2));
        assert!(f64_approx_equal(negative, -FRAC_PI_2));
    }

    #[test]
    fn nanometres_convert_to_angstrom() {
        assert!(f64_approx_equal(nm_to_angstrom(0.39), 3.9));
    }
}
