//! The [`Rod`] type and its hard-core overlap predicate.

use crate::params::RodParams;
use std::f64::consts::PI;

const HALF_PI: f64 = PI / 2.0;

/// Reduce an angle into `[-pi/2, pi/2)`, exploiting the rectangle's
/// pi-periodicity (a rod at angle `a` and one at `a + pi` are the same shape).
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    (angle + HALF_PI).rem_euclid(PI) - HALF_PI
}

/// A rigid rectangle of fixed width and length, in the 2D plane.
///
/// `angle` is always maintained in `[-pi/2, pi/2)`, the angle between the
/// long axis and the +x axis. Width and length are not stored per-instance;
/// every rod in a simulation shares the same [`RodParams`], passed in to the
/// methods that need it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rod {
    /// X coordinate of the rod's center.
    pub x: f64,
    /// Y coordinate of the rod's center.
    pub y: f64,
    /// Orientation of the long axis, in `[-pi/2, pi/2)`.
    pub angle: f64,
}

impl Rod {
    /// Construct a rod, normalizing `angle` into `[-pi/2, pi/2)`.
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle: normalize_angle(angle),
        }
    }

    /// Squared distance between this rod's center and `other`'s.
    pub fn distance_sq(&self, other: &Rod) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Move the center by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Rotate by `da`, renormalizing the result into `[-pi/2, pi/2)`.
    pub fn rotate(&mut self, da: f64) {
        self.angle = normalize_angle(self.angle + da);
    }

    /// Return `true` if `self` overlaps `other`, two oriented rectangles of
    /// identical dimensions `params`.
    ///
    /// Total: always returns a defined answer, including at the boundary
    /// angles (`phi == 0`, `phi == pi/2`) where region membership falls
    /// through to an adjacent branch of the piecewise formula.
    pub fn overlaps(&self, other: &Rod, params: &RodParams) -> bool {
        let xrel = self.x - other.x;
        let yrel = self.y - other.y;
        let dist_sq = xrel * xrel + yrel * yrel;

        if dist_sq < params.width * params.width {
            return true;
        }
        if dist_sq > params.diagonal * params.diagonal {
            return false;
        }

        // Relative orientation, reduced into [-pi/2, pi/2].
        let mut phi = self.angle - other.angle;
        if phi > HALF_PI {
            phi -= PI;
        } else if phi < -HALF_PI {
            phi += PI;
        }

        // Angle from other's center to self's center, relative to other's
        // orientation, reduced into [-pi, pi].
        let mut theta = yrel.atan2(xrel) - other.angle;
        if theta > PI {
            theta -= 2.0 * PI;
        } else if theta < -PI {
            theta += 2.0 * PI;
        }

        // Symmetrize into the first/second quadrant: phi >= 0, theta in [0, pi].
        let (phi, theta) = if phi < 0.0 {
            let phi = -phi;
            let theta = if theta < 0.0 { -theta } else { PI - theta };
            (phi, theta)
        } else if theta < 0.0 {
            (phi, theta + PI)
        } else {
            (phi, theta)
        };

        let theta0 = 0.5 * phi;
        let theta_m1 = theta0 - params.alpha;
        let theta1 = theta0 + params.alpha;
        let theta2 = theta0 + HALF_PI;
        let theta3 = theta_m1 + PI;

        let common = params.diagonal * theta0.cos();
        let min_dist = if theta < theta_m1 {
            common * theta1.sin() / (phi - theta).sin()
        } else if theta < theta0 {
            common * theta_m1.cos() / theta.cos()
        } else if theta < theta1 {
            common * theta_m1.cos() / (theta - phi).cos()
        } else if theta < theta2 {
            common * theta1.sin() / theta.sin()
        } else if theta < theta3 {
            common * theta1.sin() / (theta - phi).sin()
        } else {
            common * theta_m1.cos() / (-theta.cos())
        };

        dist_sq < min_dist * min_dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rod_params() -> RodParams {
        crate::Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, 1, 0)
            .unwrap()
            .rod
    }

    #[test]
    fn coincident_rods_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(0.0, 0.0, 0.0);
        assert!(a.overlaps(&b, &p));
    }

    #[test]
    fn far_apart_rods_do_not_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(100.0, 100.0, 0.0);
        assert!(!a.overlaps(&b, &p));
    }

    #[test]
    fn parallel_rods_side_by_side_within_width_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(0.0, 0.5, 0.0);
        assert!(a.overlaps(&b, &p));
    }

    #[test]
    fn parallel_rods_side_by_side_beyond_width_do_not_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(0.0, 1.5, 0.0);
        assert!(!a.overlaps(&b, &p));
    }

    #[test]
    fn end_to_end_along_long_axis_within_length_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(3.0, 0.0, 0.0);
        assert!(a.overlaps(&b, &p));
    }

    #[test]
    fn end_to_end_along_long_axis_beyond_length_do_not_overlap() {
        let p = rod_params();
        let a = Rod::new(0.0, 0.0, 0.0);
        let b = Rod::new(4.5, 0.0, 0.0);
        assert!(!a.overlaps(&b, &p));
    }

    #[test]
    fn angle_normalization_wraps_into_range() {
        let r = Rod::new(0.0, 0.0, PI);
        assert!(r.angle.abs() < 1e-9);
        let r = Rod::new(0.0, 0.0, HALF_PI + 0.1);
        assert!(r.angle < -HALF_PI + 0.2 && r.angle >= -HALF_PI);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -10.0..10.0, ay in -10.0..10.0, aa in -10.0..10.0,
            bx in -10.0..10.0, by in -10.0..10.0, ba in -10.0..10.0,
        ) {
            let p = rod_params();
            let a = Rod::new(ax, ay, aa);
            let b = Rod::new(bx, by, ba);
            prop_assert_eq!(a.overlaps(&b, &p), b.overlaps(&a, &p));
        }

        #[test]
        fn overlap_is_translation_invariant(
            ax in -10.0..10.0, ay in -10.0..10.0, aa in -10.0..10.0,
            bx in -10.0..10.0, by in -10.0..10.0, ba in -10.0..10.0,
            dx in -50.0..50.0, dy in -50.0..50.0,
        ) {
            let p = rod_params();
            let a = Rod::new(ax, ay, aa);
            let b = Rod::new(bx, by, ba);
            let mut a2 = a;
            let mut b2 = b;
            a2.translate(dx, dy);
            b2.translate(dx, dy);
            prop_assert_eq!(a.overlaps(&b, &p), a2.overlaps(&b2, &p));
        }

        #[test]
        fn a_rod_always_overlaps_itself(x in -50.0..50.0, y in -50.0..50.0, a in -10.0..10.0) {
            let p = rod_params();
            let r = Rod::new(x, y, a);
            prop_assert!(r.overlaps(&r, &p));
        }

        #[test]
        fn normalized_angle_is_in_range(a in -1000.0..1000.0) {
            let normalized = normalize_angle(a);
            prop_assert!(normalized >= -HALF_PI - 1e-9 && normalized < HALF_PI + 1e-9);
        }
    }
}
