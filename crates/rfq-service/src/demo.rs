//! Self-contained demonstration scenario over the in-memory ledger.

use alloy_primitives::{Address, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{Context, Result};
use rfq_config::EngineConfig;
use rfq_ledger::{InMemoryLedger, Ledger};
use rfq_settlement::SettlementEngine;
use rfq_types::{CompactSignature, MakerTraits, Order, TakerTraits};
use tracing::info;

// Deterministic development keys, same spirit as a local devnet's
// pre-funded accounts.
const MAKER_KEY: [u8; 32] = [0x11u8; 32];
const TAKER_KEY: [u8; 32] = [0x22u8; 32];

const DEMO_ASSET: Address = Address::new([0xd1u8; 20]);

/// Mints balances, signs one single-fill order, fills it, and reports the
/// resulting balances and invalidator state.
pub fn run(config: &EngineConfig) -> Result<()> {
	let maker_signer = PrivateKeySigner::from_bytes(&B256::from(MAKER_KEY))
		.context("Failed to build maker signer")?;
	let taker_signer = PrivateKeySigner::from_bytes(&B256::from(TAKER_KEY))
		.context("Failed to build taker signer")?;
	let maker = maker_signer.address();
	let taker = taker_signer.address();

	let wrapped_native = config.protocol.wrapped_native;
	let mut ledger = InMemoryLedger::new(wrapped_native);
	ledger.mint(DEMO_ASSET, maker, U256::from(1_000_000u64));
	ledger.mint(wrapped_native, taker, U256::from(1_000u64));

	let domain = config.protocol.domain();
	let mut engine = SettlementEngine::new(&domain, ledger);

	// Maker offers 900 of the demo asset for 3 wrapped-native.
	let order = Order {
		salt: U256::from(1u64),
		maker,
		receiver: Address::ZERO,
		maker_asset: DEMO_ASSET,
		taker_asset: wrapped_native,
		making_amount: U256::from(900u64),
		taking_amount: U256::from(3u64),
		maker_traits: MakerTraits::default()
			.with_nonce(1)
			.with_multiple_fills(false),
	};

	let order_hash = engine.order_hash(&order);
	let signature = maker_signer
		.sign_hash_sync(&order_hash)
		.context("Failed to sign order")?;
	let signature = CompactSignature::from_signature(&signature);
	info!(%order_hash, %maker, "order signed");

	let (taker_traits, _) = TakerTraits::default()
		.with_making_amount()
		.with_threshold(U256::from(3u64))
		.encode();
	let outcome = engine.fill_order(
		taker,
		U256::ZERO,
		&order,
		&signature,
		U256::from(900u64),
		taker_traits,
	)?;

	info!(
		making = %outcome.making_amount,
		taking = %outcome.taking_amount,
		"fill settled"
	);
	info!(
		maker_asset_balance = %engine.ledger().balance_of(DEMO_ASSET, taker),
		taker_asset_balance = %engine.ledger().balance_of(wrapped_native, maker),
		"balances after fill"
	);
	info!(
		invalidator = %engine.bit_invalidator_for_order(maker, 1),
		"bit invalidator slot"
	);

	Ok(())
}
