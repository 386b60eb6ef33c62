//! Unsteady vortex-lattice aerodynamics of a four-wing flapping vehicle.
//!
//! Each wing is a lattice of quadrilateral vortex rings. Every step the
//! no-penetration condition is solved for the bound circulation, the
//! border rings are shed into a free wake, and the linear and angular
//! impulses of bound and wake vorticity are recorded.

pub mod aero;
pub mod config;
pub mod error;
pub mod math;
pub mod physics;
pub mod sim;

pub use config::{RunConfig, SimulationConfig, VehicleConfig};
pub use error::{SimError, SimResult};
pub use sim::{Simulator, StepRecord};
