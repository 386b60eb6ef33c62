//! Linear and angular impulse of bound and wake vorticity.
//!
//! For a closed filament of strength Γ the impulses are
//! `L = Γ/2 ∮ r × dl` and `A = Γ/3 ∮ r × (r × dl)`, both integrated exactly
//! along each straight edge. Positions are measured from the body origin, so
//! the results are expressed in the body-translating system. Density is
//! left out (non-dimensional).

use crate::aero::panel::{ring_edges, PerSurface, SurfaceGeometry, VortexRing, WingGroup};
use crate::aero::wake::WakeSheet;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Impulses need this many completed steps of wake history.
pub const MIN_IMPULSE_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Impulse {
    pub bound_linear: Vec3,
    pub bound_angular: Vec3,
    pub wake_linear: Vec3,
    pub wake_angular: Vec3,
}

impl Impulse {
    pub fn total_linear(&self) -> Vec3 {
        self.bound_linear + self.wake_linear
    }

    pub fn total_angular(&self) -> Vec3 {
        self.bound_angular + self.wake_angular
    }
}

pub fn is_available(step: usize) -> bool {
    step >= MIN_IMPULSE_STEPS
}

pub fn ring_linear_impulse(ring: &VortexRing, origin: Vec3) -> Vec3 {
    let sum: Vec3 = ring_edges(&ring.corners)
        .into_iter()
        .map(|(a, b)| (a - origin).cross(&(b - origin)))
        .sum();
    sum * (0.5 * ring.gamma)
}

pub fn ring_angular_impulse(ring: &VortexRing, origin: Vec3) -> Vec3 {
    let sum: Vec3 = ring_edges(&ring.corners)
        .into_iter()
        .map(|(a, b)| {
            let a = a - origin;
            let d = b - origin - a;
            let ad = a.dot(&d);
            let dd = d.magnitude_squared();
            // ∫₀¹ r × (r × d) ds with r = a + s·d
            a * (ad + 0.5 * dd) - d * (a.magnitude_squared() + 0.5 * ad)
        })
        .sum();
    sum * (ring.gamma / 3.0)
}

/// Impulses of one wing: its bound rings with circulation `gamma` and its wake.
pub fn surface_impulse(bound: &SurfaceGeometry, gamma: &[f64], wake: &WakeSheet, origin: Vec3) -> Impulse {
    let mut out = Impulse::default();
    for ring in bound.rings(gamma) {
        out.bound_linear += ring_linear_impulse(&ring, origin);
        out.bound_angular += ring_angular_impulse(&ring, origin);
    }
    for ring in wake.rings() {
        out.wake_linear += ring_linear_impulse(ring, origin);
        out.wake_angular += ring_angular_impulse(ring, origin);
    }
    out
}

/// Impulses of the right and left wing of one group.
pub fn group_impulse(
    group: WingGroup,
    geometries: &PerSurface<SurfaceGeometry>,
    circulation: &PerSurface<Vec<f64>>,
    wakes: &PerSurface<WakeSheet>,
    origin: Vec3,
) -> [Impulse; 2] {
    group
        .surfaces()
        .map(|s| surface_impulse(&geometries[s], &circulation[s], &wakes[s], origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64, z: f64, gamma: f64) -> VortexRing {
        VortexRing::new(
            [
                Vec3::new(0.0, 0.0, z),
                Vec3::new(side, 0.0, z),
                Vec3::new(side, side, z),
                Vec3::new(0.0, side, z),
            ],
            gamma,
        )
    }

    #[test]
    fn linear_impulse_is_strength_times_vector_area() {
        let ring = square(2.0, 0.3, 1.5);
        let l = ring_linear_impulse(&ring, Vec3::zero());
        assert!((l - Vec3::new(0.0, 0.0, 6.0)).magnitude() < 1e-12, "{l:?}");
    }

    #[test]
    fn linear_impulse_does_not_depend_on_origin() {
        let ring = square(1.0, 0.0, -0.8);
        let a = ring_linear_impulse(&ring, Vec3::zero());
        let b = ring_linear_impulse(&ring, Vec3::new(4.0, -2.0, 7.0));
        assert!((a - b).magnitude() < 1e-12);
    }

    #[test]
    fn angular_impulse_of_centred_planar_loop_vanishes() {
        // r × (r × dl) integrates to zero around a loop symmetric about the origin in its plane.
        let ring = square(2.0, 0.0, 1.0);
        let a = ring_angular_impulse(&ring, Vec3::new(1.0, 1.0, 0.0));
        assert!(a.magnitude() < 1e-12, "{a:?}");
    }

    #[test]
    fn angular_impulse_shift_rule() {
        // Moving the origin by -c adds c × L.
        let ring = square(2.0, 0.0, 1.0);
        let origin = Vec3::new(1.0, 1.0, 0.0);
        let c = Vec3::new(3.0, -1.0, 2.0);
        let centred = ring_angular_impulse(&ring, origin);
        let shifted = ring_angular_impulse(&ring, origin - c);
        let l = ring_linear_impulse(&ring, origin);
        let expected = centred + c.cross(&l);
        assert!((shifted - expected).magnitude() < 1e-9, "{shifted:?} vs {expected:?}");
    }

    #[test]
    fn zero_strength_gives_zero_impulse() {
        let ring = square(1.0, 2.0, 0.0);
        assert_eq!(ring_linear_impulse(&ring, Vec3::zero()), Vec3::zero());
        assert_eq!(ring_angular_impulse(&ring, Vec3::zero()), Vec3::zero());
    }

    #[test]
    fn availability_starts_at_fourth_step() {
        assert!(!is_available(0));
        assert!(!is_available(3));
        assert!(is_available(4));
    }
}
