use crate::aero::panel::{PerSurface, Surface};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Flap and pitch angles of one wing at one instant, with their rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WingAngles {
    pub phi: f64,
    pub theta: f64,
    pub dphi: f64,
    pub dtheta: f64,
}

/// Prescribed wing motion.
pub trait Kinematics: Send + Sync {
    fn angles(&self, surface: Surface, t: f64) -> WingAngles;
}

/// Non-dimensional stroke parameters of one wing (angles in radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeParams {
    /// Flap angle at the top of the stroke
    pub phi_top: f64,
    /// Flap angle at the bottom of the stroke
    pub phi_bottom: f64,
    /// Inclination of the stroke plane
    pub stroke_plane: f64,
    /// Pitch-axis offset from mid-chord
    pub pitch_axis: f64,
    /// Stroke frequency relative to the reference wing
    pub frequency: f64,
    /// Pitch amplitude
    pub pitch_max: f64,
    /// Pitch steepness; larger values give squarer pitch reversals
    pub steepness: f64,
    /// Pitch timing relative to stroke reversal, fraction of a half cycle
    pub rotation_offset: f64,
    /// Stroke phase, in units of π
    pub phase: f64,
}

impl StrokeParams {
    pub fn still() -> Self {
        Self {
            phi_top: 0.0,
            phi_bottom: 0.0,
            stroke_plane: 0.0,
            pitch_axis: 0.0,
            frequency: 1.0,
            pitch_max: 0.0,
            steepness: 4.0,
            rotation_offset: 0.0,
            phase: 0.0,
        }
    }

    /// Cosine flap and tanh-smoothed square-wave pitch.
    pub fn angles(&self, t: f64) -> WingAngles {
        let omega = 2.0 * PI * self.frequency;
        let half_amp = 0.5 * (self.phi_top - self.phi_bottom);
        let mean = 0.5 * (self.phi_top + self.phi_bottom);

        let flap_arg = omega * t + PI * self.phase;
        let phi = half_amp * flap_arg.cos() + mean;
        let dphi = -half_amp * omega * flap_arg.sin();

        let pitch_arg = omega * t + PI * (self.phase + self.rotation_offset);
        let p = self.steepness;
        let norm = p.tanh();
        let inner = p * pitch_arg.sin();
        let theta = self.pitch_max * inner.tanh() / norm;
        let sech = 1.0 / inner.cosh();
        let dtheta = self.pitch_max * p * omega * pitch_arg.cos() * sech * sech / norm;

        WingAngles {
            phi,
            theta,
            dphi,
            dtheta,
        }
    }
}

/// Periodic flapping with per-wing stroke parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicStroke {
    pub strokes: PerSurface<StrokeParams>,
}

impl HarmonicStroke {
    pub fn new(strokes: PerSurface<StrokeParams>) -> Self {
        Self { strokes }
    }
}

impl Kinematics for HarmonicStroke {
    fn angles(&self, surface: Surface, t: f64) -> WingAngles {
        self.strokes[surface].angles(t)
    }
}

/// Wings held at zero angles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stationary;

impl Kinematics for Stationary {
    fn angles(&self, _surface: Surface, _t: f64) -> WingAngles {
        WingAngles::default()
    }
}
