pub mod vector;
pub mod quaternion;
pub mod frame;

pub use vector::Vec3;
pub use quaternion::Quat;
pub use frame::Transform;

/// 1 / (4π), the Biot–Savart prefactor.
pub const INV_FOUR_PI: f64 = 0.25 * std::f64::consts::FRAC_1_PI;
