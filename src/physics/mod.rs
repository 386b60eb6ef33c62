pub mod frames;
pub mod kinematics;
pub mod solver;

pub use frames::{PlacedSurface, WingPlacement};
pub use kinematics::{HarmonicStroke, Kinematics, Stationary, StrokeParams, WingAngles};
pub use solver::LinearSolver;
