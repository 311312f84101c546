// Concrete hosts for the ports in `domain::ports`.
pub mod memory_world;
pub mod presenter;

pub use memory_world::{Building, BuildingKind, FarmObject, MemoryWorld};
pub use presenter::{ConsolePresenter, Presented, RecordingPresenter};
