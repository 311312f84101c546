pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsolePresenter, MemoryWorld, RecordingPresenter};
pub use config::{KeyBinding, Reporter, RunConfiguration, SitterConfig};
pub use core::{
    dialogue::DialogueCatalog,
    sitter::AnimalSitter,
    state::SitterState,
    stats::{Outcome, RunReport, RunStatistics},
};
pub use domain::ports::{Presenter, WorldModel};
pub use utils::error::{Result, SitterError};
