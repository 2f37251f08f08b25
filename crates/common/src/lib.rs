pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result, CONFIG_EXIT_CODE};
pub use types::*;
