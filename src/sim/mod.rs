pub mod record;
pub mod simulator;

pub use record::StepRecord;
pub use simulator::{Phase, SimulationContext, Simulator};
