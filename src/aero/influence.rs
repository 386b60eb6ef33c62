//! Normal-velocity influence coefficients between surfaces.

use crate::aero::kernel::{ring_velocity, Cutoffs};
use crate::aero::panel::{PerSurface, Surface, SurfaceGeometry};
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Off-diagonal blocks keyed by `(target, source)`.
pub type CrossBlocks = BTreeMap<(Surface, Surface), DMatrix<f64>>;

/// `(i, j)` = normal velocity at target collocation point `i` induced by
/// source panel `j` carrying unit circulation.
pub fn influence_matrix(target: &SurfaceGeometry, source: &SurfaceGeometry, cutoffs: &Cutoffs) -> DMatrix<f64> {
    DMatrix::from_fn(target.panel_count(), source.panel_count(), |i, j| {
        ring_velocity(target.collocation[i], &source.panels[j], 1.0, cutoffs).dot(&target.normals[i])
    })
}

/// Diagonal block of a surface acting on itself.
pub fn self_influence(geometry: &SurfaceGeometry, cutoffs: &Cutoffs) -> DMatrix<f64> {
    influence_matrix(geometry, geometry, cutoffs)
}

pub fn self_influence_blocks(geometries: &PerSurface<SurfaceGeometry>, cutoffs: &Cutoffs) -> PerSurface<DMatrix<f64>> {
    geometries.map(|_, g| self_influence(g, cutoffs))
}

/// All twelve cross blocks for the current geometry.
pub fn cross_influence(geometries: &PerSurface<SurfaceGeometry>, cutoffs: &Cutoffs, parallel: bool) -> CrossBlocks {
    let pairs: Vec<(Surface, Surface)> = Surface::cross_pairs().collect();
    let build = |&(target, source): &(Surface, Surface)| {
        (
            (target, source),
            influence_matrix(&geometries[target], &geometries[source], cutoffs),
        )
    };
    if parallel {
        pairs.par_iter().map(build).collect()
    } else {
        pairs.iter().map(build).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::panel::Side;
    use crate::aero::wing::WingPlanform;
    use crate::math::Vec3;

    const CUTOFFS: Cutoffs = Cutoffs {
        rcut: 1.0e-10,
        lcut: 1.0e-4,
    };

    fn shifted(mut g: SurfaceGeometry, by: Vec3) -> SurfaceGeometry {
        for p in &mut g.panels {
            *p = p.map(|c| c + by);
        }
        for c in &mut g.collocation {
            *c = *c + by;
        }
        g
    }

    #[test]
    fn self_block_has_dominant_positive_diagonal() {
        let mesh = WingPlanform::new(1.0, 1.0, 3, 3).mesh(Side::Right);
        let m = self_influence(&mesh, &CUTOFFS);
        assert_eq!(m.shape(), (9, 9));
        for i in 0..9 {
            assert!(m[(i, i)] > 0.0);
            for j in 0..9 {
                assert!(m[(i, i)] > m[(i, j)].abs() || i == j);
            }
        }
    }

    #[test]
    fn self_block_is_invariant_under_translation() {
        let mesh = WingPlanform::new(1.5, 1.0, 3, 2).mesh(Side::Left);
        let moved = shifted(mesh.clone(), Vec3::new(3.0, -1.0, 0.5));
        let a = self_influence(&mesh, &CUTOFFS);
        let b = self_influence(&moved, &CUTOFFS);
        assert!((a - b).amax() < 1e-12);
    }

    #[test]
    fn cross_blocks_cover_every_pair_with_source_columns() {
        let front = WingPlanform::new(1.0, 0.5, 2, 2);
        let rear = WingPlanform::new(1.0, 0.5, 3, 2);
        let geometries = PerSurface::from_fn(|s| {
            let wing = match s {
                Surface::FrontRight | Surface::FrontLeft => &front,
                _ => &rear,
            };
            let offset = match s {
                Surface::FrontRight | Surface::FrontLeft => Vec3::zero(),
                _ => Vec3::new(1.0, 0.0, 0.0),
            };
            shifted(wing.mesh(s.side()), offset)
        });
        let serial = cross_influence(&geometries, &CUTOFFS, false);
        let parallel = cross_influence(&geometries, &CUTOFFS, true);
        assert_eq!(serial.len(), 12);
        for ((target, source), block) in &serial {
            assert_eq!(block.nrows(), geometries[*target].panel_count());
            assert_eq!(block.ncols(), geometries[*source].panel_count());
            assert_eq!(block, &parallel[&(*target, *source)]);
        }
    }
}
