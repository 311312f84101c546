#[cfg(feature = "cli")]
pub mod cli;
pub mod run_config;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use run_config::{CareToggles, KeyBinding, Reporter, RunConfiguration};
pub use toml_config::SitterConfig;
