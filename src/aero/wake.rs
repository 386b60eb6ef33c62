//! Shed wake rings: storage, induced normal velocity and convection.

use crate::aero::kernel::{Cutoffs, FilamentBatch};
use crate::aero::panel::{PerSurface, SurfaceGeometry, VortexRing};
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Rings shed from one surface's border panels during one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeRow {
    pub step: usize,
    pub rings: Vec<VortexRing>,
}

/// Wake of one surface, one row per shedding step.
///
/// Ring strengths are fixed when a row is pushed; only corner positions
/// change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WakeSheet {
    rows: Vec<WakeRow>,
}

impl WakeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WakeRow] {
        &self.rows
    }

    pub fn ring_count(&self) -> usize {
        self.rows.iter().map(|r| r.rings.len()).sum()
    }

    pub fn rings(&self) -> impl Iterator<Item = &VortexRing> {
        self.rows.iter().flat_map(|r| r.rings.iter())
    }

    pub fn push(&mut self, row: WakeRow) {
        self.rows.push(row);
    }

    /// Move every corner by `dt × velocity`; `velocities` follows [`Self::rings`] order.
    pub fn convect(&mut self, velocities: &[[Vec3; 4]], dt: f64) -> SimResult<()> {
        if velocities.len() != self.ring_count() {
            return Err(SimError::DimensionMismatch {
                context: "wake corner velocities",
                expected: self.ring_count(),
                found: velocities.len(),
            });
        }
        let rings = self.rows.iter_mut().flat_map(|r| r.rings.iter_mut());
        for (ring, v) in rings.zip(velocities) {
            for (corner, vel) in ring.corners.iter_mut().zip(v) {
                *corner = *corner + *vel * dt;
            }
        }
        Ok(())
    }

    pub fn corners(&self) -> Vec<[Vec3; 4]> {
        self.rings().map(|r| r.corners).collect()
    }
}

/// Edges of every wake ring of every surface.
pub fn wake_filaments(wakes: &PerSurface<WakeSheet>) -> FilamentBatch {
    let total = wakes.iter().map(|(_, w)| w.ring_count()).sum();
    let mut batch = FilamentBatch::with_capacity(total);
    for (_, sheet) in wakes.iter() {
        batch.extend(sheet.rings().copied());
    }
    batch
}

/// Normal velocity induced by all wakes at the collocation points of `target`.
///
/// At step `k` each sheet holds `k` rows, so the cost grows linearly with `step`.
pub fn wake_normal_velocity(
    step: usize,
    target: &SurfaceGeometry,
    wakes: &PerSurface<WakeSheet>,
    cutoffs: &Cutoffs,
) -> Vec<f64> {
    debug_assert!(wakes.iter().all(|(_, w)| w.len() == step));
    if step == 0 {
        return vec![0.0; target.panel_count()];
    }
    let batch = wake_filaments(wakes);
    target
        .collocation
        .iter()
        .zip(&target.normals)
        .map(|(&point, normal)| batch.velocity_at(point, cutoffs).dot(normal))
        .collect()
}

/// Velocity at every corner of `corners` induced by `sources`.
pub fn corner_velocities(
    corners: &[[Vec3; 4]],
    sources: &FilamentBatch,
    cutoffs: &Cutoffs,
    parallel: bool,
) -> Vec<[Vec3; 4]> {
    let eval = |ring: &[Vec3; 4]| ring.map(|c| sources.velocity_at(c, cutoffs));
    if parallel {
        corners.par_iter().map(eval).collect()
    } else {
        corners.iter().map(eval).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::panel::Side;
    use crate::aero::wing::WingPlanform;

    const CUTOFFS: Cutoffs = Cutoffs {
        rcut: 1.0e-10,
        lcut: 1.0e-6,
    };

    fn ring_at(z: f64, gamma: f64) -> VortexRing {
        VortexRing::new(
            [
                Vec3::new(0.0, 0.0, z),
                Vec3::new(1.0, 0.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(0.0, 1.0, z),
            ],
            gamma,
        )
    }

    fn sheets_with(rows: usize, gamma: f64) -> PerSurface<WakeSheet> {
        PerSurface::from_fn(|s| {
            let mut sheet = WakeSheet::new();
            for step in 0..rows {
                let z = 1.0 + step as f64 + s.index() as f64 * 0.1;
                sheet.push(WakeRow {
                    step,
                    rings: vec![ring_at(z, gamma)],
                });
            }
            sheet
        })
    }

    #[test]
    fn empty_wake_induces_nothing() {
        let mesh = WingPlanform::new(1.0, 1.0, 2, 2).mesh(Side::Right);
        let wakes = PerSurface::<WakeSheet>::default();
        let v = wake_normal_velocity(0, &mesh, &wakes, &CUTOFFS);
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn wake_normal_velocity_is_linear_in_strength() {
        let mesh = WingPlanform::new(1.0, 1.0, 2, 2).mesh(Side::Right);
        let one = wake_normal_velocity(3, &mesh, &sheets_with(3, 1.0), &CUTOFFS);
        let scaled = wake_normal_velocity(3, &mesh, &sheets_with(3, -2.5), &CUTOFFS);
        for (a, b) in one.iter().zip(&scaled) {
            assert!(a.abs() > 0.0);
            assert!((a * -2.5 - b).abs() < 1e-13);
        }
    }

    #[test]
    fn convection_moves_corners_but_not_strength() {
        let mut sheet = WakeSheet::new();
        sheet.push(WakeRow {
            step: 0,
            rings: vec![ring_at(0.0, 0.7), ring_at(1.0, -0.2)],
        });
        let v = vec![[Vec3::unit_x(); 4], [Vec3::unit_z(); 4]];
        sheet.convect(&v, 0.5).unwrap();
        let rings: Vec<_> = sheet.rings().copied().collect();
        assert_eq!(rings[0].corners[0], Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(rings[1].corners[2], Vec3::new(1.0, 1.0, 1.5));
        assert_eq!(rings[0].gamma, 0.7);
        assert_eq!(rings[1].gamma, -0.2);
    }

    #[test]
    fn convection_rejects_short_velocity_list() {
        let mut sheet = WakeSheet::new();
        sheet.push(WakeRow {
            step: 0,
            rings: vec![ring_at(0.0, 1.0), ring_at(1.0, 1.0)],
        });
        let before = sheet.clone();
        let err = sheet.convect(&[[Vec3::unit_x(); 4]], 1.0).unwrap_err();
        assert!(matches!(
            err,
            SimError::DimensionMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
        assert_eq!(sheet, before);
    }

    #[test]
    fn corner_velocities_serial_and_parallel_agree() {
        let sources = wake_filaments(&sheets_with(2, 1.0));
        let targets = vec![ring_at(-0.5, 0.0).corners, ring_at(0.25, 0.0).corners];
        let a = corner_velocities(&targets, &sources, &CUTOFFS, false);
        let b = corner_velocities(&targets, &sources, &CUTOFFS, true);
        assert_eq!(a, b);
    }
}
