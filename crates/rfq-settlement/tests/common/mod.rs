#![allow(dead_code)]

//! Shared fixture for the settlement test suites.

use alloy_primitives::{Address, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use rfq_ledger::{InMemoryLedger, Ledger};
use rfq_settlement::{Clock, SettlementEngine};
use rfq_types::{CompactSignature, MakerTraits, Order, OrderDomain};

pub const DAI: Address = Address::new([0xd1u8; 20]);
pub const WETH: Address = Address::new([0xeeu8; 20]);
pub const USDC: Address = Address::new([0x5cu8; 20]);

pub const NOW: u64 = 1_700_000_000;

pub fn domain() -> OrderDomain {
	OrderDomain {
		name: "RFQ Engine".to_string(),
		version: "1".to_string(),
		chain_id: 31337,
		verifying_contract: Address::from([0xaau8; 20]),
	}
}

/// 0.001 of an 18-decimals asset.
pub fn milli(amount: u64) -> U256 {
	U256::from(amount) * U256::from(10u64).pow(U256::from(15u64))
}

pub struct Fixture {
	pub engine: SettlementEngine<InMemoryLedger>,
	/// Order maker in most scenarios.
	pub maker: PrivateKeySigner,
	/// Default taker.
	pub taker: PrivateKeySigner,
	/// Unfunded bystander account.
	pub charlie: Address,
}

impl Fixture {
	pub fn new() -> Self {
		let maker = PrivateKeySigner::from_bytes(&B256::from([0x11u8; 32])).unwrap();
		let taker = PrivateKeySigner::from_bytes(&B256::from([0x22u8; 32])).unwrap();
		let charlie = Address::from([0xc4u8; 20]);

		let mut ledger = InMemoryLedger::new(WETH);
		for account in [maker.address(), taker.address()] {
			ledger.mint(DAI, account, U256::from(1_000_000u64));
			ledger.mint(WETH, account, U256::from(1_000_000u64));
			ledger.mint(USDC, account, U256::from(1_000_000u64));
			ledger.mint_native(account, U256::from(1_000_000u64));
		}

		let engine =
			SettlementEngine::new(&domain(), ledger).with_clock(Clock::Fixed(NOW));

		Self {
			engine,
			maker,
			taker,
			charlie,
		}
	}

	pub fn balance(&self, asset: Address, account: Address) -> U256 {
		self.engine.ledger().balance_of(asset, account)
	}

	pub fn native(&self, account: Address) -> U256 {
		self.engine.ledger().native_balance_of(account)
	}

	pub fn sign(&self, order: &Order, signer: &PrivateKeySigner) -> CompactSignature {
		let hash = self.engine.order_hash(order);
		CompactSignature::from_signature(&signer.sign_hash_sync(&hash).unwrap())
	}
}

/// Single-fill (bit-invalidated) maker traits with the given nonce.
pub fn rfq_traits(nonce: u64) -> MakerTraits {
	MakerTraits::default()
		.with_nonce(nonce)
		.with_multiple_fills(false)
}

pub fn order(
	maker: Address,
	maker_asset: Address,
	taker_asset: Address,
	making_amount: U256,
	taking_amount: U256,
	maker_traits: MakerTraits,
) -> Order {
	Order {
		salt: U256::from(1u64),
		maker,
		receiver: Address::ZERO,
		maker_asset,
		taker_asset,
		making_amount,
		taking_amount,
		maker_traits,
	}
}
