pub mod simulation;
pub mod vehicle;

pub use simulation::SimulationConfig;
pub use vehicle::{ScaledVehicle, StrokeConfig, VehicleConfig, WingConfig};

use crate::error::SimResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Everything needed to start a run, as stored in a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub vehicle: VehicleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            vehicle: VehicleConfig::dragonfly(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(content: &str) -> SimResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> SimResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded run configuration");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> SimResult<()> {
        self.simulation.validate()?;
        self.vehicle.validate()
    }
}
