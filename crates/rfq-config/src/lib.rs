//! Configuration for the RFQ engine service.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, ProtocolSettings, ServiceSettings};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}
