//! Body-fixed wing meshes placed in the space-fixed frame.

use crate::aero::panel::{PerSurface, Side, Surface, SurfaceGeometry};
use crate::math::{Quat, Transform, Vec3};
use crate::physics::kinematics::WingAngles;

/// Space-fixed geometry of one surface and the normal component of the
/// fluid velocity relative to it at each collocation point.
#[derive(Debug, Clone)]
pub struct PlacedSurface {
    pub geometry: SurfaceGeometry,
    pub kinematic_normal: Vec<f64>,
}

/// Rigid placement of the four wings on the body.
///
/// The body translates with `-air_velocity` through still air and is
/// pitched by `body_angle`. Each wing hinges at `hinges[s]`, flaps about
/// the body x axis inside a stroke plane tilted by `stroke_plane[s]`, and
/// pitches about its span axis offset `pitch_axis[s]` from mid-chord.
#[derive(Debug, Clone)]
pub struct WingPlacement {
    pub meshes: PerSurface<SurfaceGeometry>,
    pub hinges: PerSurface<Vec3>,
    pub stroke_plane: PerSurface<f64>,
    pub pitch_axis: PerSurface<f64>,
    pub body_angle: f64,
    pub air_velocity: Vec3,
}

impl WingPlacement {
    pub fn body_origin(&self, t: f64) -> Vec3 {
        self.air_velocity * -t
    }

    fn flap_sign(surface: Surface) -> f64 {
        match surface.side() {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }

    fn body_transform(&self, t: f64) -> Transform {
        Transform::new(
            self.body_origin(t),
            Quat::from_axis_angle(&Vec3::unit_y(), self.body_angle),
        )
    }

    /// Wing frame (origin on the pitch axis at the root) to body frame.
    fn wing_transform(&self, surface: Surface, angles: &WingAngles) -> Transform {
        let q_beta = Quat::from_axis_angle(&Vec3::unit_y(), self.stroke_plane[surface]);
        let q_phi = Quat::from_axis_angle(&Vec3::unit_x(), Self::flap_sign(surface) * angles.phi);
        let q_theta = Quat::from_axis_angle(&Vec3::unit_y(), angles.theta);
        Transform::new(self.hinges[surface], q_beta * q_phi * q_theta)
    }

    /// Angular velocity of the wing in the space-fixed frame.
    fn angular_velocity(&self, surface: Surface, angles: &WingAngles) -> Vec3 {
        let q_delta = Quat::from_axis_angle(&Vec3::unit_y(), self.body_angle);
        let q_beta = Quat::from_axis_angle(&Vec3::unit_y(), self.stroke_plane[surface]);
        let sign = Self::flap_sign(surface);
        let q_phi = Quat::from_axis_angle(&Vec3::unit_x(), sign * angles.phi);
        let flap = (q_delta * q_beta).rotate_vector(&(Vec3::unit_x() * (sign * angles.dphi)));
        let pitch = (q_delta * q_beta * q_phi).rotate_vector(&(Vec3::unit_y() * angles.dtheta));
        flap + pitch
    }

    pub fn place(&self, surface: Surface, angles: &WingAngles, t: f64) -> PlacedSurface {
        let body = self.body_transform(t);
        let full = body.compose(&self.wing_transform(surface, angles));
        let axis_shift = Vec3::new(self.pitch_axis[surface], 0.0, 0.0);
        let to_space = |p: &Vec3| full.transform_point(&(*p - axis_shift));

        let mesh = &self.meshes[surface];
        let geometry = SurfaceGeometry {
            panels: mesh.panels.iter().map(|c| c.map(|p| to_space(&p))).collect(),
            collocation: mesh.collocation.iter().map(to_space).collect(),
            normals: mesh.normals.iter().map(|n| full.transform_vector(n)).collect(),
            border_count: mesh.border_count,
        };

        let omega = self.angular_velocity(surface, angles);
        let hinge = body.transform_point(&self.hinges[surface]);
        let body_velocity = -self.air_velocity;
        let kinematic_normal = geometry
            .collocation
            .iter()
            .zip(&geometry.normals)
            .map(|(x, n)| {
                let v = body_velocity + omega.cross(&(*x - hinge));
                -v.dot(n)
            })
            .collect();

        PlacedSurface {
            geometry,
            kinematic_normal,
        }
    }

    /// Geometry at zero angles and t = 0. Relative panel geometry is the same
    /// at every instant because each wing moves rigidly.
    pub fn reference_geometry(&self, surface: Surface) -> SurfaceGeometry {
        self.place(surface, &WingAngles::default(), 0.0).geometry
    }

    pub fn min_panel_height(&self) -> f64 {
        self.meshes
            .iter()
            .flat_map(|(_, m)| m.panels.iter())
            .map(|p| (p[1] - p[0]).magnitude().min((p[3] - p[0]).magnitude()))
            .fold(f64::INFINITY, f64::min)
    }
}
