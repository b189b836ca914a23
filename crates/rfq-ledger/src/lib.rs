//! Asset-balance collaborators for the settlement engine.
//!
//! The engine never touches token mechanics directly: it drives the
//! [`Ledger`] trait, which models the transfer primitives of the hosting
//! environment: fungible token balances, native-asset balances, and
//! wrapping between the native asset and its wrapped token form.

use alloy_primitives::{Address, U256};
use thiserror::Error;

pub mod implementations {
	pub mod memory;
}

pub use implementations::memory::InMemoryLedger;

/// Errors that can occur while moving balances.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
	#[error("Insufficient balance of {asset} for {account}: need {needed}, have {available}")]
	InsufficientBalance {
		asset: Address,
		account: Address,
		needed: U256,
		available: U256,
	},
	#[error("Insufficient native balance for {account}: need {needed}, have {available}")]
	InsufficientNativeBalance {
		account: Address,
		needed: U256,
		available: U256,
	},
	#[error("Balance overflow for {account}")]
	BalanceOverflow { account: Address },
}

/// Transfer primitives the settlement engine calls into.
///
/// Permit/allowance mechanics are applied before the core runs and are not
/// modeled here; transfers are bounded by balances only. Implementations
/// must be `Clone`: a fill snapshots the ledger on entry and restores it on
/// failure, which is the engine's all-or-nothing guarantee.
pub trait Ledger: Clone {
	/// Moves `amount` of a fungible `asset` between accounts.
	fn transfer(
		&mut self,
		asset: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError>;

	/// Moves native-asset balance between accounts.
	fn native_transfer(
		&mut self,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError>;

	/// Converts `account`'s native balance into wrapped-native tokens.
	fn wrap_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError>;

	/// Converts `account`'s wrapped-native tokens back into native balance.
	fn unwrap_native(&mut self, account: Address, amount: U256) -> Result<(), LedgerError>;

	/// Address of the wrapped-native token.
	fn wrapped_native(&self) -> Address;

	fn balance_of(&self, asset: Address, account: Address) -> U256;

	fn native_balance_of(&self, account: Address) -> U256;
}
