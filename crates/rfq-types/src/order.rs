//! Signed RFQ order model and typed-data hashing.

use std::borrow::Cow;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};

use crate::{common::OrderHash, maker_traits::MakerTraits};

// Typed-data schema the maker signs. Field order is part of the hash.
mod typed {
	use alloy_sol_types::sol;

	sol! {
		struct Order {
			uint256 salt;
			address maker;
			address receiver;
			address makerAsset;
			address takerAsset;
			uint256 makingAmount;
			uint256 takingAmount;
			uint256 makerTraits;
		}
	}
}

/// A signed trade intent: the maker gives `maker_asset` and receives
/// `taker_asset` at the fixed `making_amount : taking_amount` ratio.
/// Immutable once signed; identity is [`Order::hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Maker-chosen entropy distinguishing otherwise identical orders.
	pub salt: U256,
	pub maker: Address,
	/// Receives the taker asset; zero means the maker itself.
	pub receiver: Address,
	pub maker_asset: Address,
	pub taker_asset: Address,
	pub making_amount: U256,
	pub taking_amount: U256,
	pub maker_traits: MakerTraits,
}

impl Order {
	/// EIP-712 typed-data hash under `domain`: the order key used for
	/// signatures and invalidation state.
	pub fn hash(&self, domain: &Eip712Domain) -> OrderHash {
		let typed = typed::Order {
			salt: self.salt,
			maker: self.maker,
			receiver: self.receiver,
			makerAsset: self.maker_asset,
			takerAsset: self.taker_asset,
			makingAmount: self.making_amount,
			takingAmount: self.taking_amount,
			makerTraits: self.maker_traits.encode(),
		};
		typed.eip712_signing_hash(domain)
	}

	/// The account the taker asset settles to.
	pub fn receiver_or_maker(&self) -> Address {
		if self.receiver.is_zero() {
			self.maker
		} else {
			self.receiver
		}
	}
}

/// Domain parameters binding orders to one protocol deployment: signatures
/// for one chain or contract address never validate on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDomain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl OrderDomain {
	pub fn eip712(&self) -> Eip712Domain {
		Eip712Domain::new(
			Some(Cow::Owned(self.name.clone())),
			Some(Cow::Owned(self.version.clone())),
			Some(U256::from(self.chain_id)),
			Some(self.verifying_contract),
			None,
		)
	}
}
