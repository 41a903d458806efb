pub mod codes;
pub mod lookup;
pub mod mapping;
pub mod report;

pub use crate::domain::model::{BatchReport, EntityRecord};
pub use crate::domain::ports::{ConfigProvider, Transport};
pub use crate::utils::error::Result;
pub use codes::CodeKind;
pub use lookup::{LeiLookup, LookupFilter};
pub use report::OutputFormat;
