use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Numerical controls of a run. Times are non-dimensional (reference period = 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub nstep: usize,
    pub dt: f64,
    /// Point cutoff radius of the Biot–Savart kernel
    pub rcut: f64,
    /// Filament-length cutoff; `0.1 × min panel height` when absent
    pub lcut: Option<f64>,
    /// Largest LU pivot ratio accepted by the solver
    pub max_condition: f64,
    /// Include wake-induced velocity when moving wake and border corners
    pub free_wake: bool,
    /// Evaluate independent blocks on the rayon pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nstep: 80,
            dt: 0.025,
            rcut: 1.0e-10,
            lcut: None,
            max_condition: 1.0e12,
            free_wake: true,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn short_test() -> Self {
        Self {
            nstep: 6,
            dt: 0.05,
            parallel: false,
            ..Self::default()
        }
    }

    pub fn final_time(&self) -> f64 {
        self.nstep as f64 * self.dt
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.nstep < 1 {
            return Err(SimError::config("nstep", "at least one step is required"));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::config("dt", format!("must be positive, got {}", self.dt)));
        }
        if !(self.rcut > 0.0) {
            return Err(SimError::config("rcut", format!("must be positive, got {}", self.rcut)));
        }
        if let Some(lcut) = self.lcut {
            if !(lcut > 0.0) {
                return Err(SimError::config("lcut", format!("must be positive, got {lcut}")));
            }
        }
        if !(self.max_condition > 1.0) {
            return Err(SimError::config(
                "max_condition",
                format!("must exceed 1, got {}", self.max_condition),
            ));
        }
        Ok(())
    }
}
