//! Replay-protection state for the RFQ engine.
//!
//! Two invalidation modes track order consumption per maker: a bitmap for
//! single-fill orders and a cumulative filled amount for multi-fill orders.
//! Both are plain in-memory maps owned by the settlement engine and passed
//! by handle; mutations happen read-modify-write inside a single fill.

mod bit;
mod remaining;
mod store;

pub use bit::BitInvalidator;
pub use remaining::RemainingInvalidator;
pub use store::InvalidatorStore;

use thiserror::Error;

/// Errors raised by invalidator bookkeeping.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidatorError {
	/// Test-and-set found the nonce bit already spent.
	#[error("Nonce already invalidated")]
	AlreadyInvalidated,
	/// Recording the fill would push the total past the order size.
	#[error("Fill exceeds order capacity")]
	ExceedsOrderCapacity,
}
