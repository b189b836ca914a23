//! In-memory ledger implementation.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use tracing::trace;

use crate::{Ledger, LedgerError};

/// Balance maps behind the [`Ledger`] trait. Backs the test suites and the
/// demonstration service; a production embedding would adapt the trait to
/// its own settlement substrate.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
	wrapped_native: Address,
	balances: HashMap<(Address, Address), U256>,
	native: HashMap<Address, U256>,
}

impl InMemoryLedger {
	pub fn new(wrapped_native: Address) -> Self {
		Self {
			wrapped_native,
			balances: HashMap::new(),
			native: HashMap::new(),
		}
	}

	/// Credits `account` with `amount` of `asset` out of thin air.
	pub fn mint(&mut self, asset: Address, account: Address, amount: U256) {
		let balance = self.balances.entry((asset, account)).or_default();
		*balance = balance.saturating_add(amount);
	}

	/// Credits `account` with native balance out of thin air.
	pub fn mint_native(&mut self, account: Address, amount: U256) {
		let balance = self.native.entry(account).or_default();
		*balance = balance.saturating_add(amount);
	}

	fn debit(
		&mut self,
		asset: Address,
		account: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		let balance = self.balances.entry((asset, account)).or_default();
		*balance = balance
			.checked_sub(amount)
			.ok_or(LedgerError::InsufficientBalance {
				asset,
				account,
				needed: amount,
				available: *balance,
			})?;
		Ok(())
	}

	fn credit(
		&mut self,
		asset: Address,
		account: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		let balance = self.balances.entry((asset, account)).or_default();
		*balance = balance
			.checked_add(amount)
			.ok_or(LedgerError::BalanceOverflow { account })?;
		Ok(())
	}

	fn debit_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
		let balance = self.native.entry(account).or_default();
		*balance = balance
			.checked_sub(amount)
			.ok_or(LedgerError::InsufficientNativeBalance {
				account,
				needed: amount,
				available: *balance,
			})?;
		Ok(())
	}

	fn credit_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
		let balance = self.native.entry(account).or_default();
		*balance = balance
			.checked_add(amount)
			.ok_or(LedgerError::BalanceOverflow { account })?;
		Ok(())
	}
}

impl Ledger for InMemoryLedger {
	fn transfer(
		&mut self,
		asset: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		self.debit(asset, from, amount)?;
		self.credit(asset, to, amount)?;
		trace!(%asset, %from, %to, %amount, "transfer");
		Ok(())
	}

	fn native_transfer(
		&mut self,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		self.debit_native(from, amount)?;
		self.credit_native(to, amount)?;
		trace!(%from, %to, %amount, "native transfer");
		Ok(())
	}

	fn wrap_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
		self.debit_native(account, amount)?;
		self.credit(self.wrapped_native, account, amount)?;
		Ok(())
	}

	fn unwrap_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
		self.debit(self.wrapped_native, account, amount)?;
		self.credit_native(account, amount)?;
		Ok(())
	}

	fn wrapped_native(&self) -> Address {
		self.wrapped_native
	}

	fn balance_of(&self, asset: Address, account: Address) -> U256 {
		self.balances
			.get(&(asset, account))
			.copied()
			.unwrap_or_default()
	}

	fn native_balance_of(&self, account: Address) -> U256 {
		self.native.get(&account).copied().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WETH: Address = Address::new([0xeeu8; 20]);
	const DAI: Address = Address::new([0xd1u8; 20]);

	fn alice() -> Address {
		Address::from([0x01u8; 20])
	}

	fn bob() -> Address {
		Address::from([0x02u8; 20])
	}

	#[test]
	fn test_transfer_moves_balances() {
		let mut ledger = InMemoryLedger::new(WETH);
		ledger.mint(DAI, alice(), U256::from(100u64));

		ledger
			.transfer(DAI, alice(), bob(), U256::from(30u64))
			.unwrap();
		assert_eq!(ledger.balance_of(DAI, alice()), U256::from(70u64));
		assert_eq!(ledger.balance_of(DAI, bob()), U256::from(30u64));
	}

	#[test]
	fn test_transfer_rejects_insufficient_balance() {
		let mut ledger = InMemoryLedger::new(WETH);
		ledger.mint(DAI, alice(), U256::from(10u64));

		let err = ledger
			.transfer(DAI, alice(), bob(), U256::from(11u64))
			.unwrap_err();
		assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
		// Nothing moved.
		assert_eq!(ledger.balance_of(DAI, alice()), U256::from(10u64));
	}

	#[test]
	fn test_wrap_and_unwrap_round_trip() {
		let mut ledger = InMemoryLedger::new(WETH);
		ledger.mint_native(alice(), U256::from(5u64));

		ledger.wrap_native(alice(), U256::from(5u64)).unwrap();
		assert_eq!(ledger.native_balance_of(alice()), U256::ZERO);
		assert_eq!(ledger.balance_of(WETH, alice()), U256::from(5u64));

		ledger.unwrap_native(alice(), U256::from(2u64)).unwrap();
		assert_eq!(ledger.native_balance_of(alice()), U256::from(2u64));
		assert_eq!(ledger.balance_of(WETH, alice()), U256::from(3u64));
	}

	#[test]
	fn test_clone_snapshots_state() {
		let mut ledger = InMemoryLedger::new(WETH);
		ledger.mint(DAI, alice(), U256::from(100u64));

		let snapshot = ledger.clone();
		ledger
			.transfer(DAI, alice(), bob(), U256::from(100u64))
			.unwrap();

		let restored = snapshot;
		assert_eq!(restored.balance_of(DAI, alice()), U256::from(100u64));
		assert_eq!(restored.balance_of(DAI, bob()), U256::ZERO);
	}
}
