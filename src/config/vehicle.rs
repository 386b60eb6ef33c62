//! Physical description of the four-wing vehicle and its reduction to the
//! non-dimensional quantities the solver works with.
//!
//! Lengths are scaled by the front chord, frequencies by the front-right
//! stroke frequency, velocities by their product. Angles are given in
//! degrees here and converted to radians.

use crate::aero::panel::{PerSurface, Surface, WingGroup};
use crate::aero::wing::WingPlanform;
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use crate::physics::frames::WingPlacement;
use crate::physics::kinematics::{HarmonicStroke, StrokeParams};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lower bound of the pitch steepness parameter.
pub const MIN_STEEPNESS: f64 = 4.0;

/// One wing pair (left and right are mirror images).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingConfig {
    pub span: f64,
    pub chord: f64,
    /// Hinge position along the body x axis
    pub hinge: f64,
    pub chordwise_panels: usize,
    pub spanwise_panels: usize,
}

impl WingConfig {
    pub fn planform(&self) -> WingPlanform {
        WingPlanform::new(self.span, self.chord, self.chordwise_panels, self.spanwise_panels)
    }
}

/// Stroke of one wing, physical units with angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    pub phi_top: f64,
    pub phi_bottom: f64,
    pub stroke_plane: f64,
    /// Pitch-axis offset from mid-chord, positive toward the trailing edge
    pub pitch_axis: f64,
    /// Hz
    pub frequency: f64,
    pub pitch_max: f64,
    pub steepness: f64,
    pub rotation_offset: f64,
    pub phase: f64,
}

impl StrokeConfig {
    pub fn still() -> Self {
        Self {
            phi_top: 0.0,
            phi_bottom: 0.0,
            stroke_plane: 0.0,
            pitch_axis: 0.0,
            frequency: 1.0,
            pitch_max: 0.0,
            steepness: MIN_STEEPNESS,
            rotation_offset: 0.0,
            phase: 0.0,
        }
    }

    /// Arc length swept by the wing tip over half a stroke.
    pub fn tip_half_stroke(&self, span: f64) -> f64 {
        0.5 * span * (self.phi_top - self.phi_bottom).to_radians().abs()
    }

    /// Pitch speed at the leading edge over flapping speed at the tip,
    /// `½ · (c/2 + a)/d · (p/T) · (gMax/f)` with `T = 1/f` the stroke period.
    ///
    /// Zero when the tip does not sweep or the frequency is not positive.
    pub fn pitch_flapping_ratio(&self, span: f64, chord: f64) -> f64 {
        let tip = self.tip_half_stroke(span);
        if !(tip > 0.0 && self.frequency > 0.0) {
            return 0.0;
        }
        let period = 1.0 / self.frequency;
        0.5 * ((0.5 * chord + self.pitch_axis) / tip)
            * (self.steepness / period)
            * (self.pitch_max.to_radians() / self.frequency)
    }

    fn validate(&self, surface: Surface) -> SimResult<()> {
        let name = surface.name();
        if !(self.frequency > 0.0 && self.frequency.is_finite()) {
            return Err(SimError::config(
                "frequency",
                format!("{name}: must be positive, got {}", self.frequency),
            ));
        }
        if !(self.steepness >= MIN_STEEPNESS) {
            return Err(SimError::config(
                "steepness",
                format!("{name}: p must be >= {MIN_STEEPNESS}, got {}", self.steepness),
            ));
        }
        if !(self.rotation_offset.abs() <= 0.5) {
            return Err(SimError::config(
                "rotation_offset",
                format!("{name}: must lie in [-0.5, 0.5], got {}", self.rotation_offset),
            ));
        }
        if !(0.0..2.0).contains(&self.phase) {
            return Err(SimError::config(
                "phase",
                format!("{name}: tau must lie in [0, 2), got {}", self.phase),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub name: String,
    /// Body pitch angle, degrees
    pub body_angle: f64,
    /// Velocity of the air relative to the body
    pub air_velocity: [f64; 3],
    pub front: WingConfig,
    pub rear: WingConfig,
    pub strokes: PerSurface<StrokeConfig>,
}

/// Non-dimensional vehicle handed to the simulator.
#[derive(Debug, Clone)]
pub struct ScaledVehicle {
    pub placement: WingPlacement,
    pub strokes: PerSurface<StrokeParams>,
    pub reference_length: f64,
    pub reference_frequency: f64,
    pub min_panel_height: f64,
}

impl ScaledVehicle {
    pub fn kinematics(&self) -> HarmonicStroke {
        HarmonicStroke::new(self.strokes.clone())
    }

    /// Length cutoff derived from the finest panel dimension.
    pub fn default_lcut(&self) -> f64 {
        0.1 * self.min_panel_height
    }
}

impl VehicleConfig {
    /// Tandem dragonfly-like configuration in SI units, hind wings a quarter
    /// cycle ahead of the fore wings.
    pub fn dragonfly() -> Self {
        let fore = StrokeConfig {
            phi_top: 40.0,
            phi_bottom: -40.0,
            stroke_plane: 0.0,
            pitch_axis: 0.0,
            frequency: 30.0,
            pitch_max: 40.0,
            steepness: 5.0,
            rotation_offset: 0.0,
            phase: 0.0,
        };
        let hind = StrokeConfig {
            phase: 0.5,
            pitch_axis: 0.001,
            ..fore.clone()
        };
        Self {
            name: "Dragonfly".to_string(),
            body_angle: 10.0,
            air_velocity: [1.0, 0.0, 0.0],
            front: WingConfig {
                span: 0.04,
                chord: 0.01,
                hinge: 0.0,
                chordwise_panels: 4,
                spanwise_panels: 8,
            },
            rear: WingConfig {
                span: 0.038,
                chord: 0.011,
                hinge: 0.012,
                chordwise_panels: 4,
                spanwise_panels: 8,
            },
            strokes: PerSurface {
                front_right: fore.clone(),
                front_left: fore,
                rear_right: hind.clone(),
                rear_left: hind,
            },
        }
    }

    /// Same planforms as [`Self::dragonfly`], wings held still in still air.
    pub fn stationary() -> Self {
        Self {
            name: "Stationary".to_string(),
            body_angle: 0.0,
            air_velocity: [0.0; 3],
            strokes: PerSurface::from_fn(|_| StrokeConfig::still()),
            ..Self::dragonfly()
        }
    }

    pub fn wing(&self, group: WingGroup) -> &WingConfig {
        match group {
            WingGroup::Front => &self.front,
            WingGroup::Rear => &self.rear,
        }
    }

    pub fn air_speed(&self) -> f64 {
        Vec3::from_array(self.air_velocity).magnitude()
    }

    pub fn validate(&self) -> SimResult<()> {
        self.front.planform().validate()?;
        self.rear.planform().validate()?;

        let clearance = self.rear.hinge - self.front.hinge;
        let required = 0.5 * (self.rear.chord + self.front.chord);
        if !(clearance >= required) {
            return Err(SimError::config(
                "hinge",
                format!("rear and front wings interfere: clearance {clearance} < {required}"),
            ));
        }

        for (surface, stroke) in self.strokes.iter() {
            stroke.validate(surface)?;
        }
        if !Vec3::from_array(self.air_velocity).is_finite() || !self.body_angle.is_finite() {
            return Err(SimError::config("air_velocity", "body state must be finite"));
        }
        Ok(())
    }

    pub fn nondimensionalize(&self) -> SimResult<ScaledVehicle> {
        self.validate()?;

        let l_ref = self.front.chord;
        let f_ref = self.strokes[Surface::FrontRight].frequency;
        let v_ref = l_ref * f_ref;

        let planform = |group: WingGroup| {
            let w = self.wing(group);
            WingPlanform::new(w.span / l_ref, w.chord / l_ref, w.chordwise_panels, w.spanwise_panels)
        };
        let front = planform(WingGroup::Front);
        let rear = planform(WingGroup::Rear);
        let planform_of = |s: Surface| match s.group() {
            WingGroup::Front => &front,
            WingGroup::Rear => &rear,
        };

        let strokes = self.strokes.map(|_, s| StrokeParams {
            phi_top: s.phi_top.to_radians(),
            phi_bottom: s.phi_bottom.to_radians(),
            stroke_plane: s.stroke_plane.to_radians(),
            pitch_axis: s.pitch_axis / l_ref,
            frequency: s.frequency / f_ref,
            pitch_max: s.pitch_max.to_radians(),
            steepness: s.steepness,
            rotation_offset: s.rotation_offset,
            phase: s.phase,
        });

        let placement = WingPlacement {
            meshes: PerSurface::from_fn(|s| planform_of(s).mesh(s.side())),
            hinges: PerSurface::from_fn(|s| Vec3::new(self.wing(s.group()).hinge / l_ref, 0.0, 0.0)),
            stroke_plane: strokes.map(|_, s| s.stroke_plane),
            pitch_axis: strokes.map(|_, s| s.pitch_axis),
            body_angle: self.body_angle.to_radians(),
            air_velocity: Vec3::from_array(self.air_velocity) * (1.0 / v_ref),
        };

        Ok(ScaledVehicle {
            placement,
            strokes,
            reference_length: l_ref,
            reference_frequency: f_ref,
            min_panel_height: front.min_panel_height().min(rear.min_panel_height()),
        })
    }

    /// Log the run parameters and the characteristic speed ratios.
    pub fn log_summary(&self) {
        info!(
            vehicle = %self.name,
            body_angle = self.body_angle,
            front_hinge = self.front.hinge,
            rear_hinge = self.rear.hinge,
            "vehicle configuration"
        );
        for group in [WingGroup::Front, WingGroup::Rear] {
            let w = self.wing(group);
            info!(
                ?group,
                span = w.span,
                chord = w.chord,
                aspect_ratio = w.planform().aspect_ratio(),
                panels = w.chordwise_panels * w.spanwise_panels,
                "wing planform"
            );
        }

        let air = self.air_speed();
        info!(air_speed = air, "air speed");
        for (surface, s) in self.strokes.iter() {
            let w = self.wing(surface.group());
            let tip = s.tip_half_stroke(w.span);
            let pitch_ratio = s.pitch_flapping_ratio(w.span, w.chord);
            if air > 1.0e-3 {
                let fk = 2.0 * s.frequency * tip / air;
                info!(
                    surface = surface.name(),
                    flapping_air_ratio = fk,
                    pitch_flapping_ratio = pitch_ratio,
                    pitch_air_ratio = fk * pitch_ratio,
                    "stroke"
                );
            } else {
                info!(surface = surface.name(), pitch_flapping_ratio = pitch_ratio, "stroke");
            }
        }
    }
}
