//! Convection velocity of the border rings that are about to be shed.

use crate::aero::kernel::{Cutoffs, FilamentBatch};
use crate::aero::panel::{PerSurface, Surface, SurfaceGeometry};
use crate::aero::wake::corner_velocities;
use crate::math::Vec3;

/// Velocity at each corner of `target`'s border panels due to the bound
/// rings of `source` carrying `gamma`.
pub fn border_velocity_block(
    target: &SurfaceGeometry,
    source: &SurfaceGeometry,
    gamma: &[f64],
    cutoffs: &Cutoffs,
) -> Vec<[Vec3; 4]> {
    let bound = FilamentBatch::from_rings(source.rings(gamma));
    corner_velocities(target.border_panels(), &bound, cutoffs, false)
}

/// Border-corner velocities of every surface from the bound circulation of
/// all four surfaces (its own block plus three cross blocks).
pub fn border_velocities(
    geometries: &PerSurface<SurfaceGeometry>,
    circulation: &PerSurface<Vec<f64>>,
    cutoffs: &Cutoffs,
    parallel: bool,
) -> PerSurface<Vec<[Vec3; 4]>> {
    PerSurface::par_from_fn(parallel, |target| {
        let own = border_velocity_block(&geometries[target], &geometries[target], &circulation[target], cutoffs);
        Surface::ALL
            .into_iter()
            .filter(|&source| source != target)
            .fold(own, |mut acc, source| {
                let cross = border_velocity_block(&geometries[target], &geometries[source], &circulation[source], cutoffs);
                accumulate(&mut acc, &cross);
                acc
            })
    })
}

pub fn accumulate(acc: &mut [[Vec3; 4]], extra: &[[Vec3; 4]]) {
    debug_assert_eq!(acc.len(), extra.len());
    for (a, e) in acc.iter_mut().zip(extra) {
        for (ac, ec) in a.iter_mut().zip(e) {
            *ac += *ec;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::panel::WingGroup;
    use crate::aero::wing::WingPlanform;

    const CUTOFFS: Cutoffs = Cutoffs {
        rcut: 1.0e-10,
        lcut: 1.0e-4,
    };

    fn geometries() -> PerSurface<SurfaceGeometry> {
        let wing = WingPlanform::new(1.0, 0.5, 3, 2);
        PerSurface::from_fn(|s| {
            let mut g = wing.mesh(s.side());
            let dx = if s.group() == WingGroup::Rear { 1.0 } else { 0.0 };
            for p in &mut g.panels {
                *p = p.map(|c| c + Vec3::new(dx, 0.0, 0.0));
            }
            g
        })
    }

    #[test]
    fn zero_circulation_gives_zero_velocity() {
        let geoms = geometries();
        let gamma = geoms.map(|_, g| vec![0.0; g.panel_count()]);
        let v = border_velocities(&geoms, &gamma, &CUTOFFS, false);
        for (s, corners) in v.iter() {
            assert_eq!(corners.len(), geoms[s].border_count);
            assert!(corners.iter().flatten().all(|c| *c == Vec3::zero()));
        }
    }

    #[test]
    fn total_is_sum_of_self_and_cross_blocks() {
        let geoms = geometries();
        let gamma = geoms.map(|s, g| (0..g.panel_count()).map(|k| 0.1 * (k + s.index()) as f64).collect());
        let total = border_velocities(&geoms, &gamma, &CUTOFFS, true);

        let target = Surface::RearLeft;
        let mut expected = border_velocity_block(&geoms[target], &geoms[target], &gamma[target], &CUTOFFS);
        for source in [Surface::FrontRight, Surface::FrontLeft, Surface::RearRight] {
            accumulate(
                &mut expected,
                &border_velocity_block(&geoms[target], &geoms[source], &gamma[source], &CUTOFFS),
            );
        }
        for (a, b) in total[target].iter().flatten().zip(expected.iter().flatten()) {
            assert!(a.is_finite());
            assert!((*a - *b).magnitude() < 1e-12);
        }
    }
}
