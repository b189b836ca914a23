//! Bitmap invalidator for single-fill orders.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::InvalidatorError;

/// One-shot consumption tracking: nonce `n` addresses bit `n % 256` of the
/// maker's slot `n / 256`. Slots default to zero and are materialized on
/// first write, so arbitrarily large nonces cost one map entry each.
///
/// A set bit is terminal: fills never clear it, and [`cancel`] sets it
/// explicitly.
///
/// [`cancel`]: BitInvalidator::cancel
#[derive(Debug, Clone, Default)]
pub struct BitInvalidator {
	slots: HashMap<(Address, u64), U256>,
}

impl BitInvalidator {
	pub fn new() -> Self {
		Self::default()
	}

	fn locate(nonce: u64) -> (u64, U256) {
		(nonce >> 8, U256::from(1u8) << (nonce & 0xff) as usize)
	}

	/// Whether the nonce is still unspent.
	pub fn is_valid(&self, maker: Address, nonce: u64) -> bool {
		let (slot, mask) = Self::locate(nonce);
		self.slots
			.get(&(maker, slot))
			.map_or(true, |word| (*word & mask).is_zero())
	}

	/// Atomically tests and sets the nonce bit.
	pub fn mark_spent(&mut self, maker: Address, nonce: u64) -> Result<(), InvalidatorError> {
		let (slot, mask) = Self::locate(nonce);
		let word = self.slots.entry((maker, slot)).or_default();
		if !(*word & mask).is_zero() {
			return Err(InvalidatorError::AlreadyInvalidated);
		}
		*word |= mask;
		debug!(%maker, nonce, slot, "nonce spent");
		Ok(())
	}

	/// Sets the nonce bit unconditionally. Idempotent, and valid for nonces
	/// that were never filled: any later fill attempt observes the spent bit.
	pub fn cancel(&mut self, maker: Address, nonce: u64) {
		let (slot, mask) = Self::locate(nonce);
		*self.slots.entry((maker, slot)).or_default() |= mask;
		debug!(%maker, nonce, slot, "nonce cancelled");
	}

	/// Raw slot word, for introspection.
	pub fn slot(&self, maker: Address, slot: u64) -> U256 {
		self.slots.get(&(maker, slot)).copied().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn maker() -> Address {
		Address::from([0x01u8; 20])
	}

	#[test]
	fn test_mark_spent_is_test_and_set() {
		let mut bits = BitInvalidator::new();
		assert!(bits.is_valid(maker(), 1));
		bits.mark_spent(maker(), 1).unwrap();
		assert!(!bits.is_valid(maker(), 1));
		assert_eq!(
			bits.mark_spent(maker(), 1),
			Err(InvalidatorError::AlreadyInvalidated)
		);
	}

	#[test]
	fn test_cancel_is_idempotent_and_terminal() {
		let mut bits = BitInvalidator::new();
		bits.cancel(maker(), 5);
		bits.cancel(maker(), 5);
		assert!(!bits.is_valid(maker(), 5));
		assert_eq!(
			bits.mark_spent(maker(), 5),
			Err(InvalidatorError::AlreadyInvalidated)
		);
	}

	#[test]
	fn test_slot_addressing() {
		let mut bits = BitInvalidator::new();
		bits.cancel(maker(), 1);
		assert_eq!(bits.slot(maker(), 0), U256::from(2u8));

		// Nonce 1023 lands on bit 255 of slot 3.
		bits.cancel(maker(), 1023);
		assert_eq!(bits.slot(maker(), 3), U256::from(1u8) << 255);
	}

	#[test]
	fn test_slots_materialize_lazily() {
		let mut bits = BitInvalidator::new();
		bits.mark_spent(maker(), 100_000).unwrap();
		assert_eq!(bits.slots.len(), 1);
		assert_eq!(bits.slot(maker(), 0), U256::ZERO);
	}

	#[test]
	fn test_makers_are_independent() {
		let mut bits = BitInvalidator::new();
		bits.mark_spent(maker(), 1).unwrap();
		assert!(bits.is_valid(Address::from([0x02u8; 20]), 1));
	}
}
