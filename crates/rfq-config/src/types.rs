//! Configuration types for the RFQ engine.

use alloy_primitives::Address;
use rfq_types::OrderDomain;
use serde::{Deserialize, Serialize};

/// Complete engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
	/// Typed-data domain and asset bindings.
	pub protocol: ProtocolSettings,
	/// Service-level settings.
	#[serde(default)]
	pub service: ServiceSettings,
}

/// Typed-data domain parameters plus the wrapped-native asset binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtocolSettings {
	/// EIP-712 domain name.
	pub name: String,
	/// EIP-712 domain version.
	pub version: String,
	/// Chain the signatures bind to.
	pub chain_id: u64,
	/// Protocol address signatures bind to; doubles as the engine's escrow
	/// account.
	pub verifying_contract: Address,
	/// Wrapped-native token accepted for attached-value fills.
	pub wrapped_native: Address,
}

impl ProtocolSettings {
	pub fn domain(&self) -> OrderDomain {
		OrderDomain {
			name: self.name.clone(),
			version: self.version.clone(),
			chain_id: self.chain_id,
			verifying_contract: self.verifying_contract,
		}
	}
}

/// Service-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
	/// Log level when RUST_LOG is unset.
	pub log_level: String,
}

impl Default for ServiceSettings {
	fn default() -> Self {
		Self {
			log_level: "info".to_string(),
		}
	}
}
