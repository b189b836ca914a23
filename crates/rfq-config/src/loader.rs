//! Configuration loading with environment variable substitution.

use std::env;
use std::path::Path;

use tracing::debug;

use crate::{ConfigError, EngineConfig};

/// Loads [`EngineConfig`] from a TOML file, substituting `${VAR}` patterns
/// from the environment and applying `RFQ_`-prefixed overrides.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "RFQ_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub fn load(&self) -> Result<EngineConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path)?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		self.validate_config(&config)?;

		Ok(config)
	}

	fn load_from_file(&self, file_path: &str) -> Result<EngineConfig, ConfigError> {
		debug!(file_path, "loading configuration");
		let content = std::fs::read_to_string(file_path)?;

		let substituted_content = self.substitute_env_vars(&content)?;

		let config: EngineConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns.
		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut EngineConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.service.log_level = log_level;
		}

		if let Ok(chain_id) = env::var(format!("{}CHAIN_ID", self.env_prefix)) {
			config.protocol.chain_id = chain_id
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid chain id: {}", e)))?;
		}

		Ok(())
	}

	fn validate_config(&self, config: &EngineConfig) -> Result<(), ConfigError> {
		if config.protocol.name.is_empty() {
			return Err(ConfigError::ValidationError(
				"Protocol name must not be empty".to_string(),
			));
		}

		if config.protocol.version.is_empty() {
			return Err(ConfigError::ValidationError(
				"Protocol version must not be empty".to_string(),
			));
		}

		if config.protocol.verifying_contract == config.protocol.wrapped_native {
			return Err(ConfigError::ValidationError(
				"Verifying contract and wrapped-native addresses must differ".to_string(),
			));
		}

		Ok(())
	}
}
