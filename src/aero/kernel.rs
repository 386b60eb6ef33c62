//! Biot–Savart velocity of straight vortex filaments.
//!
//! Every velocity in the crate, bound or wake, matrix coefficient or
//! convection speed, comes out of [`segment_velocity`].

use crate::aero::panel::{ring_edges, VortexRing};
use crate::math::{Vec3, INV_FOUR_PI};
use serde::{Deserialize, Serialize};

/// Singularity cutoffs.
///
/// A filament is skipped when the observation point is within `rcut` of
/// either endpoint, or when `|r1 × r2|` is below `lcut` (point on the
/// filament or on its extension).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cutoffs {
    pub rcut: f64,
    pub lcut: f64,
}

impl Cutoffs {
    pub fn new(rcut: f64, lcut: f64) -> Self {
        Self { rcut, lcut }
    }
}

/// Velocity at `point` induced by the filament `start → end` of strength `gamma`.
#[inline]
pub fn segment_velocity(point: Vec3, start: Vec3, end: Vec3, gamma: f64, cutoffs: &Cutoffs) -> Vec3 {
    let r1 = point - start;
    let r2 = point - end;
    let r1xr2 = r1.cross(&r2);
    let square = r1xr2.magnitude_squared();
    let d1 = r1.magnitude();
    let d2 = r2.magnitude();

    if d1 <= cutoffs.rcut || d2 <= cutoffs.rcut || square.sqrt() <= cutoffs.lcut {
        return Vec3::zero();
    }

    let r0 = end - start;
    let coef = gamma * INV_FOUR_PI / square * (r0.dot(&r1) / d1 - r0.dot(&r2) / d2);
    r1xr2 * coef
}

/// Net velocity at `point` from `m` filaments given as parallel arrays.
pub fn induced_velocity(point: Vec3, starts: &[Vec3], ends: &[Vec3], gammas: &[f64], cutoffs: &Cutoffs) -> Vec3 {
    debug_assert_eq!(starts.len(), ends.len());
    debug_assert_eq!(starts.len(), gammas.len());
    starts
        .iter()
        .zip(ends)
        .zip(gammas)
        .map(|((&a, &b), &g)| segment_velocity(point, a, b, g, cutoffs))
        .sum()
}

/// Velocity at `point` from the four edges of one ring.
pub fn ring_velocity(point: Vec3, corners: &[Vec3; 4], gamma: f64, cutoffs: &Cutoffs) -> Vec3 {
    ring_edges(corners)
        .into_iter()
        .map(|(a, b)| segment_velocity(point, a, b, gamma, cutoffs))
        .sum()
}

/// Flattened edges of many rings, evaluated together.
#[derive(Debug, Clone, Default)]
pub struct FilamentBatch {
    pub starts: Vec<Vec3>,
    pub ends: Vec<Vec3>,
    pub gammas: Vec<f64>,
}

impl FilamentBatch {
    pub fn with_capacity(rings: usize) -> Self {
        Self {
            starts: Vec::with_capacity(4 * rings),
            ends: Vec::with_capacity(4 * rings),
            gammas: Vec::with_capacity(4 * rings),
        }
    }

    pub fn from_rings(rings: impl IntoIterator<Item = VortexRing>) -> Self {
        let mut batch = Self::default();
        batch.extend(rings);
        batch
    }

    pub fn push_ring(&mut self, ring: &VortexRing) {
        for (a, b) in ring.edges() {
            self.starts.push(a);
            self.ends.push(b);
            self.gammas.push(ring.gamma);
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn velocity_at(&self, point: Vec3, cutoffs: &Cutoffs) -> Vec3 {
        induced_velocity(point, &self.starts, &self.ends, &self.gammas, cutoffs)
    }
}

impl Extend<VortexRing> for FilamentBatch {
    fn extend<I: IntoIterator<Item = VortexRing>>(&mut self, rings: I) {
        for ring in rings {
            self.push_ring(&ring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFFS: Cutoffs = Cutoffs {
        rcut: 1.0e-10,
        lcut: 1.0e-10,
    };

    fn unit_square() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn finite_segment_matches_closed_form() {
        let v = segment_velocity(
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::zero(),
            Vec3::unit_x(),
            1.0,
            &CUTOFFS,
        );
        // h = 1, cos(theta1) = -cos(theta2) = 0.5 / sqrt(1.25)
        let cos1 = 0.5 / 1.25_f64.sqrt();
        let expected = INV_FOUR_PI * (cos1 + cos1);
        assert!(v.x.abs() < 1e-15 && v.y.abs() < 1e-15, "{v:?}");
        assert!((v.z - expected).abs() < 1e-14, "{} vs {}", v.z, expected);
    }

    #[test]
    fn velocity_scales_linearly_with_strength() {
        let p = Vec3::new(0.2, -0.7, 0.4);
        let a = segment_velocity(p, Vec3::zero(), Vec3::new(1.0, 0.5, 0.0), 1.0, &CUTOFFS);
        let b = segment_velocity(p, Vec3::zero(), Vec3::new(1.0, 0.5, 0.0), -3.0, &CUTOFFS);
        assert!((a * -3.0 - b).magnitude() < 1e-14);
    }

    #[test]
    fn point_at_endpoint_contributes_exactly_zero() {
        let cut = Cutoffs::new(0.01, 1.0e-10);
        let v = segment_velocity(Vec3::new(0.005, 0.0, 0.0), Vec3::zero(), Vec3::unit_x(), 1.0, &cut);
        assert_eq!(v, Vec3::zero());
        let exact = segment_velocity(Vec3::unit_x(), Vec3::zero(), Vec3::unit_x(), 1.0, &cut);
        assert_eq!(exact, Vec3::zero());
    }

    #[test]
    fn point_on_filament_or_extension_is_zero_not_nan() {
        let on = segment_velocity(Vec3::new(0.5, 0.0, 0.0), Vec3::zero(), Vec3::unit_x(), 1.0, &CUTOFFS);
        let beyond = segment_velocity(Vec3::new(3.0, 0.0, 0.0), Vec3::zero(), Vec3::unit_x(), 1.0, &CUTOFFS);
        assert_eq!(on, Vec3::zero());
        assert_eq!(beyond, Vec3::zero());
    }

    #[test]
    fn short_filament_below_length_cutoff_is_skipped() {
        let cut = Cutoffs::new(1.0e-10, 0.1);
        let v = segment_velocity(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::zero(),
            Vec3::new(0.01, 0.0, 0.0),
            1.0,
            &cut,
        );
        assert_eq!(v, Vec3::zero());
    }

    #[test]
    fn ring_centroid_velocity_matches_square_loop_formula() {
        // Square of side s, centre velocity = 2*sqrt(2)*gamma / (pi*s), along +z.
        let v = ring_velocity(Vec3::new(0.5, 0.5, 0.0), &unit_square(), 1.0, &CUTOFFS);
        let expected = 2.0 * 2.0_f64.sqrt() / std::f64::consts::PI;
        assert!(v.is_finite());
        assert!((v.z - expected).abs() < 1e-12, "{} vs {}", v.z, expected);
        assert!(v.x.abs() < 1e-14 && v.y.abs() < 1e-14);
    }

    #[test]
    fn ring_corner_velocity_is_finite() {
        // The two edges meeting at the corner drop out; the far edges remain.
        let v = ring_velocity(Vec3::zero(), &unit_square(), 1.0, &CUTOFFS);
        let far = segment_velocity(Vec3::zero(), Vec3::unit_x(), Vec3::new(1.0, 1.0, 0.0), 1.0, &CUTOFFS)
            + segment_velocity(Vec3::zero(), Vec3::new(1.0, 1.0, 0.0), Vec3::unit_y(), 1.0, &CUTOFFS);
        assert!(v.is_finite());
        assert!((v - far).magnitude() < 1e-15);
    }

    #[test]
    fn batch_agrees_with_ring_sum() {
        let rings = [
            VortexRing::new(unit_square(), 1.5),
            VortexRing::new(unit_square().map(|c| c + Vec3::new(0.0, 0.0, 0.5)), -0.4),
        ];
        let batch = FilamentBatch::from_rings(rings);
        assert_eq!(batch.len(), 8);
        let p = Vec3::new(0.3, 0.8, 0.25);
        let direct = ring_velocity(p, &rings[0].corners, 1.5, &CUTOFFS)
            + ring_velocity(p, &rings[1].corners, -0.4, &CUTOFFS);
        assert!((batch.velocity_at(p, &CUTOFFS) - direct).magnitude() < 1e-14);
    }
}
