pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;

pub use toml_config::{ApiConfig, LookupConfig, LookupSettings};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
