//! Common types used throughout the engine.

// Re-export the ethereum primitives the whole workspace builds on.
pub use alloy_primitives::{keccak256, Address, B256, U256};

/// EIP-712 typed-data hash identifying a signed order.
pub type OrderHash = B256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;
