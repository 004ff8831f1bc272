pub mod config;
pub mod error;
pub mod types;

pub use config::RteConfig;
pub use error::{Result, RteError};
