pub mod assembly;
pub mod border;
pub mod impulse;
pub mod influence;
pub mod kernel;
pub mod panel;
pub mod wake;
pub mod wing;

pub use assembly::SystemLayout;
pub use impulse::Impulse;
pub use influence::CrossBlocks;
pub use kernel::{Cutoffs, FilamentBatch};
pub use panel::{PerSurface, Side, Surface, SurfaceGeometry, VortexRing, WingGroup};
pub use wake::{WakeRow, WakeSheet};
pub use wing::WingPlanform;
