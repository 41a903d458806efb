pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpTransport;
pub use config::LookupConfig;
pub use crate::core::{CodeKind, LeiLookup, LookupFilter, OutputFormat};
pub use domain::model::{BatchReport, EntityRecord};
pub use utils::error::{LeiError, Result};
