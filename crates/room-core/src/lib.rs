pub mod constants;
pub mod convolution;
pub mod error;
pub mod fourier;
pub mod impulse_response;
pub mod layout;
pub mod levels;
pub mod material;
pub mod reverb;
pub mod room;
pub mod simulation;
pub mod spectrum;
pub mod speaker;
pub mod surface;
pub mod tracer;

pub use error::{Error, Result};
pub use glam::DVec3;
pub use layout::SurroundLayout;
pub use levels::ListenerLevels;
pub use material::AcousticMaterial;
pub use reverb::sabine_t60;
pub use room::Room;
pub use simulation::{run_simulation, ImpulseMode, SimulationConfig, SimulationResult, Simulator};
pub use spectrum::{ReflectionMode, TransferFunction};
pub use speaker::{DirectivityCurve, Listener, Speaker};
pub use surface::{BoxRegion, MeshRegion, Placement, RoomSurface, SurfaceShape, TerrainRegion};
pub use tracer::{AcousticPath, PathTracer};
