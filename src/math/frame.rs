use super::{Quat, Vec3};

/// Rigid pose: rotate, then translate.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Transform {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.orientation.rotate_vector(point) + self.position
    }

    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.orientation.rotate_vector(vector)
    }

    /// `self` applied after `inner`.
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform::new(
            self.transform_point(&inner.position),
            self.orientation * inner.orientation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn compose_matches_sequential_application() {
        let outer = Transform::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::unit_z(), FRAC_PI_2),
        );
        let inner = Transform::new(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_axis_angle(&Vec3::unit_x(), 0.3),
        );
        let p = Vec3::new(0.5, -0.2, 0.9);
        let composed = outer.compose(&inner).transform_point(&p);
        let sequential = outer.transform_point(&inner.transform_point(&p));
        assert!((composed - sequential).magnitude() < 1e-12);
    }
}
