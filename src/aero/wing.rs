use crate::aero::panel::{ring_area_vector, ring_centroid, Side, SurfaceGeometry};
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Rectangular wing planform, discretized into vortex-ring panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingPlanform {
    pub span: f64,
    pub chord: f64,
    pub chordwise_panels: usize,
    pub spanwise_panels: usize,
}

impl WingPlanform {
    pub fn new(span: f64, chord: f64, chordwise_panels: usize, spanwise_panels: usize) -> Self {
        Self {
            span,
            chord,
            chordwise_panels,
            spanwise_panels,
        }
    }

    pub fn area(&self) -> f64 {
        self.span * self.chord
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.span * self.span / self.area()
    }

    pub fn panel_count(&self) -> usize {
        self.chordwise_panels * self.spanwise_panels
    }

    /// Leading- and trailing-edge rows.
    pub fn border_count(&self) -> usize {
        2 * self.spanwise_panels
    }

    pub fn panel_height(&self) -> f64 {
        self.chord / self.chordwise_panels as f64
    }

    pub fn panel_width(&self) -> f64 {
        self.span / self.spanwise_panels as f64
    }

    /// Smallest panel dimension; the length cutoff is derived from it.
    pub fn min_panel_height(&self) -> f64 {
        self.panel_height().min(self.panel_width())
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.span > 0.0) {
            return Err(SimError::config("span", format!("must be positive, got {}", self.span)));
        }
        if !(self.chord > 0.0) {
            return Err(SimError::config("chord", format!("must be positive, got {}", self.chord)));
        }
        if self.chordwise_panels < 2 {
            return Err(SimError::config(
                "chordwise_panels",
                format!("need at least 2 (leading and trailing edge rows), got {}", self.chordwise_panels),
            ));
        }
        if self.spanwise_panels < 1 {
            return Err(SimError::config("spanwise_panels", "need at least 1"));
        }
        Ok(())
    }

    /// Body-fixed mesh of the wing on `side`.
    ///
    /// Chord runs along +x from the leading edge at `-chord/2`, span along
    /// +y (right) or -y (left) from the root, normals along +z.
    pub fn mesh(&self, side: Side) -> SurfaceGeometry {
        let nx = self.chordwise_panels;
        let ny = self.spanwise_panels;
        let dx = self.panel_height();
        let dy = self.panel_width();
        let x0 = -0.5 * self.chord;

        let rows: Vec<usize> = [0, nx - 1].into_iter().chain(1..nx - 1).collect();

        let mut panels = Vec::with_capacity(self.panel_count());
        for i in rows {
            for j in 0..ny {
                let (xa, xb) = (x0 + i as f64 * dx, x0 + (i + 1) as f64 * dx);
                let (ya, yb) = (j as f64 * dy, (j + 1) as f64 * dy);
                let corners = [
                    Vec3::new(xa, ya, 0.0),
                    Vec3::new(xb, ya, 0.0),
                    Vec3::new(xb, yb, 0.0),
                    Vec3::new(xa, yb, 0.0),
                ];
                panels.push(match side {
                    Side::Right => corners,
                    Side::Left => {
                        let m = corners.map(|c| c.mirror_y());
                        [m[0], m[3], m[2], m[1]]
                    }
                });
            }
        }

        let collocation = panels.iter().map(ring_centroid).collect();
        let normals = panels.iter().map(|p| ring_area_vector(p).normalize()).collect();

        SurfaceGeometry {
            panels,
            collocation,
            normals,
            border_count: self.border_count(),
        }
    }
}
