//! Cumulative-fill invalidator for multi-fill orders.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use rfq_types::OrderHash;
use tracing::debug;

use crate::InvalidatorError;

// Cancellation sentinel: no making amount reaches this, and any further
// fill overflows the checked add.
const CANCELLED: U256 = U256::MAX;

/// Running filled total per `(maker, order hash)`. The total only grows and
/// never exceeds the order's making amount; cancellation stores a terminal
/// sentinel so it needs no knowledge of the order size.
#[derive(Debug, Clone, Default)]
pub struct RemainingInvalidator {
	filled: HashMap<(Address, OrderHash), U256>,
}

impl RemainingInvalidator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Total making amount consumed so far.
	pub fn filled_amount(&self, maker: Address, order_hash: OrderHash) -> U256 {
		self.filled
			.get(&(maker, order_hash))
			.copied()
			.unwrap_or_default()
	}

	/// Making amount still fillable given the order's full size.
	pub fn remaining_capacity(
		&self,
		maker: Address,
		order_hash: OrderHash,
		making_amount: U256,
	) -> U256 {
		making_amount.saturating_sub(self.filled_amount(maker, order_hash))
	}

	/// Atomically adds `amount` to the filled total.
	pub fn record_fill(
		&mut self,
		maker: Address,
		order_hash: OrderHash,
		amount: U256,
		making_amount: U256,
	) -> Result<(), InvalidatorError> {
		let filled = self.filled.entry((maker, order_hash)).or_default();
		let total = filled
			.checked_add(amount)
			.filter(|total| *total <= making_amount)
			.ok_or(InvalidatorError::ExceedsOrderCapacity)?;
		*filled = total;
		debug!(%maker, %order_hash, %amount, %total, "fill recorded");
		Ok(())
	}

	/// Marks the order permanently consumed. Idempotent.
	pub fn cancel(&mut self, maker: Address, order_hash: OrderHash) {
		self.filled.insert((maker, order_hash), CANCELLED);
		debug!(%maker, %order_hash, "order cancelled");
	}

	/// Whether the order was cancelled rather than naturally exhausted.
	pub fn is_cancelled(&self, maker: Address, order_hash: OrderHash) -> bool {
		self.filled_amount(maker, order_hash) == CANCELLED
	}
}
