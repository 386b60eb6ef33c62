//! Lifting surfaces, vortex rings and per-surface geometry.

use crate::math::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Range};

/// One of the four lifting surfaces, in system-matrix order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Surface {
    FrontRight,
    FrontLeft,
    RearRight,
    RearLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WingGroup {
    Front,
    Rear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::FrontRight,
        Surface::FrontLeft,
        Surface::RearRight,
        Surface::RearLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn group(self) -> WingGroup {
        match self {
            Surface::FrontRight | Surface::FrontLeft => WingGroup::Front,
            Surface::RearRight | Surface::RearLeft => WingGroup::Rear,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Surface::FrontRight | Surface::RearRight => Side::Right,
            Surface::FrontLeft | Surface::RearLeft => Side::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Surface::FrontRight => "front_right",
            Surface::FrontLeft => "front_left",
            Surface::RearRight => "rear_right",
            Surface::RearLeft => "rear_left",
        }
    }

    /// Every ordered `(target, source)` pair of distinct surfaces.
    pub fn cross_pairs() -> impl Iterator<Item = (Surface, Surface)> {
        Surface::ALL.into_iter().flat_map(|target| {
            Surface::ALL
                .into_iter()
                .filter(move |&source| source != target)
                .map(move |source| (target, source))
        })
    }
}

impl WingGroup {
    pub fn surfaces(self) -> [Surface; 2] {
        match self {
            WingGroup::Front => [Surface::FrontRight, Surface::FrontLeft],
            WingGroup::Rear => [Surface::RearRight, Surface::RearLeft],
        }
    }
}

/// One value per surface, addressable by [`Surface`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSurface<T> {
    pub front_right: T,
    pub front_left: T,
    pub rear_right: T,
    pub rear_left: T,
}

impl<T> PerSurface<T> {
    pub fn from_fn(mut f: impl FnMut(Surface) -> T) -> Self {
        Self {
            front_right: f(Surface::FrontRight),
            front_left: f(Surface::FrontLeft),
            rear_right: f(Surface::RearRight),
            rear_left: f(Surface::RearLeft),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Surface, &T)> {
        Surface::ALL.into_iter().map(move |s| (s, &self[s]))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Surface, &T) -> U) -> PerSurface<U> {
        PerSurface::from_fn(|s| f(s, &self[s]))
    }

    /// Like [`Self::from_fn`], evaluating the four surfaces on the rayon pool when `parallel`.
    pub fn par_from_fn<F>(parallel: bool, f: F) -> Self
    where
        T: Send,
        F: Fn(Surface) -> T + Sync,
    {
        if !parallel {
            return Self::from_fn(f);
        }
        let values: Vec<T> = Surface::ALL.par_iter().map(|&s| f(s)).collect();
        let mut it = values.into_iter();
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(front_right), Some(front_left), Some(rear_right), Some(rear_left)) => Self {
                front_right,
                front_left,
                rear_right,
                rear_left,
            },
            _ => unreachable!("rayon collect preserves all four surfaces"),
        }
    }
}

impl<A, B> PerSurface<(A, B)> {
    pub fn unzip(self) -> (PerSurface<A>, PerSurface<B>) {
        let PerSurface {
            front_right: (fr_a, fr_b),
            front_left: (fl_a, fl_b),
            rear_right: (rr_a, rr_b),
            rear_left: (rl_a, rl_b),
        } = self;
        (
            PerSurface {
                front_right: fr_a,
                front_left: fl_a,
                rear_right: rr_a,
                rear_left: rl_a,
            },
            PerSurface {
                front_right: fr_b,
                front_left: fl_b,
                rear_right: rr_b,
                rear_left: rl_b,
            },
        )
    }
}

impl<T> Index<Surface> for PerSurface<T> {
    type Output = T;
    fn index(&self, surface: Surface) -> &T {
        match surface {
            Surface::FrontRight => &self.front_right,
            Surface::FrontLeft => &self.front_left,
            Surface::RearRight => &self.rear_right,
            Surface::RearLeft => &self.rear_left,
        }
    }
}

impl<T> IndexMut<Surface> for PerSurface<T> {
    fn index_mut(&mut self, surface: Surface) -> &mut T {
        match surface {
            Surface::FrontRight => &mut self.front_right,
            Surface::FrontLeft => &mut self.front_left,
            Surface::RearRight => &mut self.rear_right,
            Surface::RearLeft => &mut self.rear_left,
        }
    }
}

/// Closed quadrilateral vortex loop of uniform strength.
///
/// Edges run `c0→c1→c2→c3→c0`; with corners counter-clockwise seen from the
/// normal side, positive `gamma` circulates right-handed about the normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexRing {
    pub corners: [Vec3; 4],
    pub gamma: f64,
}

impl VortexRing {
    pub fn new(corners: [Vec3; 4], gamma: f64) -> Self {
        Self { corners, gamma }
    }

    pub fn edges(&self) -> [(Vec3, Vec3); 4] {
        ring_edges(&self.corners)
    }
}

pub fn ring_edges(c: &[Vec3; 4]) -> [(Vec3, Vec3); 4] {
    [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
}

pub fn ring_centroid(c: &[Vec3; 4]) -> Vec3 {
    (c[0] + c[1] + c[2] + c[3]) * 0.25
}

/// Vector area of a quadrilateral (half the cross product of its diagonals).
pub fn ring_area_vector(c: &[Vec3; 4]) -> Vec3 {
    (c[2] - c[0]).cross(&(c[3] - c[1])) * 0.5
}

/// Bound-panel geometry of one surface in a single frame.
///
/// Border panels occupy indices `0..border_count`; interior panels follow.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGeometry {
    pub panels: Vec<[Vec3; 4]>,
    pub collocation: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub border_count: usize,
}

impl SurfaceGeometry {
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn border_range(&self) -> Range<usize> {
        0..self.border_count
    }

    pub fn border_panels(&self) -> &[[Vec3; 4]] {
        &self.panels[self.border_range()]
    }

    pub fn rings<'a>(&'a self, gamma: &'a [f64]) -> impl Iterator<Item = VortexRing> + 'a {
        self.panels
            .iter()
            .zip(gamma)
            .map(|(corners, &g)| VortexRing::new(*corners, g))
    }
}
