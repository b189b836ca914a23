//! The settlement engine: order filling, cancellation, and introspection.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use rfq_ledger::Ledger;
use rfq_state::InvalidatorStore;
use rfq_types::{
	CompactSignature, MakerTraits, Order, OrderDomain, OrderHash, TakerTraits, Timestamp,
};
use tracing::{debug, info};

use crate::{
	interaction::TakerInteractionInterface,
	reconcile::{reconcile, FillAmounts},
	validate::validate_order,
	SettlementError,
};

/// Time source for expiry checks.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
	/// Wall clock, Unix seconds.
	System,
	/// Fixed timestamp, for deterministic replay and tests.
	Fixed(Timestamp),
}

impl Clock {
	pub fn now(&self) -> Timestamp {
		match self {
			Clock::System => SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.unwrap()
				.as_secs(),
			Clock::Fixed(now) => *now,
		}
	}
}

/// Amounts actually exchanged by a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
	pub making_amount: U256,
	pub taking_amount: U256,
	pub order_hash: OrderHash,
}

/// Introspected lifecycle state of an order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
	/// Fillable with this much making-side capacity left.
	Fillable { remaining: U256 },
	/// Terminal. In bit-invalidation mode a cancelled nonce also reads as
	/// filled: the two share one bit.
	Filled,
	/// Terminal, maker-initiated.
	Cancelled,
}

/// Orchestrates the atomic exchange of a signed order's two asset legs.
///
/// Owns the replay-protection state and a handle to the asset ledger. Every
/// fill is all-or-nothing: the engine snapshots both on entry and restores
/// them on any failure, including failures surfacing from nested fills
/// dispatched through a taker interaction.
pub struct SettlementEngine<L: Ledger> {
	domain: Eip712Domain,
	/// Escrow account for native-value handling, wrapping, and refunds;
	/// the protocol's own address in the ledger.
	address: Address,
	clock: Clock,
	invalidators: InvalidatorStore,
	ledger: L,
	depth: usize,
}

impl<L: Ledger> SettlementEngine<L> {
	pub fn new(domain: &OrderDomain, ledger: L) -> Self {
		Self {
			address: domain.verifying_contract,
			domain: domain.eip712(),
			clock: Clock::System,
			invalidators: InvalidatorStore::new(),
			ledger,
			depth: 0,
		}
	}

	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;
		self
	}

	pub fn set_clock(&mut self, clock: Clock) {
		self.clock = clock;
	}

	/// The engine's own (escrow) address.
	pub fn address(&self) -> Address {
		self.address
	}

	pub fn ledger(&self) -> &L {
		&self.ledger
	}

	/// Interactions act on balances through this handle.
	pub fn ledger_mut(&mut self) -> &mut L {
		&mut self.ledger
	}

	/// The order key under this engine's domain.
	pub fn order_hash(&self, order: &Order) -> OrderHash {
		order.hash(&self.domain)
	}

	/// Fills `order` with the signalled `amount`, interpreting it per the
	/// packed `taker_traits` word. `native_value` models value attached to
	/// the call and is only legal when the taker asset is wrapped-native.
	pub fn fill_order(
		&mut self,
		taker: Address,
		native_value: U256,
		order: &Order,
		signature: &CompactSignature,
		amount: U256,
		taker_traits: U256,
	) -> Result<FillOutcome, SettlementError> {
		let traits = TakerTraits::decode(taker_traits, &[])?;
		self.fill(taker, native_value, order, signature, amount, &traits, None)
	}

	/// Extended fill carrying the variable-length taker args: an optional
	/// delivery target and an interaction payload dispatched mid-settlement
	/// through `dispatcher`.
	#[allow(clippy::too_many_arguments)]
	pub fn fill_order_args(
		&mut self,
		taker: Address,
		native_value: U256,
		order: &Order,
		r: B256,
		vs: B256,
		amount: U256,
		taker_traits: U256,
		args: &[u8],
		dispatcher: Option<&mut dyn TakerInteractionInterface<L>>,
	) -> Result<FillOutcome, SettlementError> {
		let signature = CompactSignature::new(r, vs);
		let traits = TakerTraits::decode(taker_traits, args)?;
		self.fill(
			taker,
			native_value,
			order,
			&signature,
			amount,
			&traits,
			dispatcher,
		)
	}

	/// Withdraws the caller's own intent: marks the nonce (single-fill) or
	/// the order key (multi-fill) permanently consumed. Idempotent, and
	/// valid for orders that were never filled. Only touches the caller's
	/// invalidator rows, so cancelling a foreign order hash has no effect
	/// on the real order.
	pub fn cancel_order(&mut self, caller: Address, maker_traits: &MakerTraits, order_hash: OrderHash) {
		if maker_traits.use_bit_invalidator() {
			self.invalidators.bit_mut().cancel(caller, maker_traits.nonce);
		} else {
			self.invalidators.remaining_mut().cancel(caller, order_hash);
		}
		info!(%caller, %order_hash, "order cancelled");
	}

	/// The 256-bit invalidator word holding `nonce` for `maker`.
	pub fn bit_invalidator_for_order(&self, maker: Address, nonce: u64) -> U256 {
		self.invalidators.bit().slot(maker, nonce >> 8)
	}

	/// Cumulative making amount already filled against an order key.
	pub fn filled_amount(&self, maker: Address, order_hash: OrderHash) -> U256 {
		self.invalidators.remaining().filled_amount(maker, order_hash)
	}

	/// Lifecycle state of `order` under the current invalidation records.
	pub fn order_state(&self, order: &Order) -> OrderState {
		let traits = &order.maker_traits;
		if traits.use_bit_invalidator() {
			if self.invalidators.bit().is_valid(order.maker, traits.nonce) {
				OrderState::Fillable {
					remaining: order.making_amount,
				}
			} else {
				OrderState::Filled
			}
		} else {
			let order_hash = order.hash(&self.domain);
			if self
				.invalidators
				.remaining()
				.is_cancelled(order.maker, order_hash)
			{
				return OrderState::Cancelled;
			}
			let remaining = self.invalidators.remaining().remaining_capacity(
				order.maker,
				order_hash,
				order.making_amount,
			);
			if remaining.is_zero() {
				OrderState::Filled
			} else {
				OrderState::Fillable { remaining }
			}
		}
	}

	#[allow(clippy::too_many_arguments)]
	fn fill(
		&mut self,
		taker: Address,
		native_value: U256,
		order: &Order,
		signature: &CompactSignature,
		amount: U256,
		traits: &TakerTraits,
		dispatcher: Option<&mut dyn TakerInteractionInterface<L>>,
	) -> Result<FillOutcome, SettlementError> {
		let order_hash = order.hash(&self.domain);
		debug!(%order_hash, %taker, %amount, depth = self.depth, "filling order");

		let snapshot = (self.invalidators.clone(), self.ledger.clone());
		self.depth += 1;
		let result = self.fill_inner(
			taker,
			native_value,
			order,
			order_hash,
			signature,
			amount,
			traits,
			dispatcher,
		);
		self.depth -= 1;

		match result {
			Ok(outcome) => {
				info!(
					%order_hash,
					making = %outcome.making_amount,
					taking = %outcome.taking_amount,
					depth = self.depth,
					"order filled"
				);
				Ok(outcome)
			}
			Err(err) => {
				let (invalidators, ledger) = snapshot;
				self.invalidators = invalidators;
				self.ledger = ledger;
				debug!(%order_hash, %err, "fill rolled back");
				Err(err)
			}
		}
	}

	#[allow(clippy::too_many_arguments)]
	fn fill_inner(
		&mut self,
		taker: Address,
		native_value: U256,
		order: &Order,
		order_hash: OrderHash,
		signature: &CompactSignature,
		amount: U256,
		traits: &TakerTraits,
		dispatcher: Option<&mut dyn TakerInteractionInterface<L>>,
	) -> Result<FillOutcome, SettlementError> {
		validate_order(
			order,
			order_hash,
			signature,
			taker,
			self.clock.now(),
			&self.invalidators,
		)?;

		let maker_traits = &order.maker_traits;
		let remaining = if maker_traits.use_bit_invalidator() {
			order.making_amount
		} else {
			self.invalidators.remaining().remaining_capacity(
				order.maker,
				order_hash,
				order.making_amount,
			)
		};
		let FillAmounts { making, taking } = reconcile(
			order.making_amount,
			order.taking_amount,
			remaining,
			amount,
			traits.amount_is_making,
			traits.threshold,
		)?;

		// Attached value is only legal when the taker asset is the
		// wrapped-native token and covers the full taking amount.
		if !native_value.is_zero()
			&& (order.taker_asset != self.ledger.wrapped_native() || native_value < taking)
		{
			return Err(SettlementError::InvalidMsgValue);
		}

		// Replay protection commits ahead of the transfers and of the
		// interaction re-entry point: a nested fill of the same order key
		// observes the spent state and fails.
		if maker_traits.use_bit_invalidator() {
			self.invalidators
				.bit_mut()
				.mark_spent(order.maker, maker_traits.nonce)
				.map_err(|_| SettlementError::BitInvalidatedOrder)?;
		} else {
			self.invalidators.remaining_mut().record_fill(
				order.maker,
				order_hash,
				making,
				order.making_amount,
			)?;
		}

		// Attached native value moves into escrow up front.
		if !native_value.is_zero() {
			self.ledger
				.native_transfer(taker, self.address, native_value)
				.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
		}

		// Maker => taker leg.
		let recipient = traits.target.unwrap_or(taker);
		if order.maker_asset == self.ledger.wrapped_native() && traits.unwrap_native {
			self.ledger
				.transfer(order.maker_asset, order.maker, self.address, making)
				.map_err(SettlementError::TransferFromMakerToTakerFailed)?;
			self.ledger
				.unwrap_native(self.address, making)
				.map_err(SettlementError::TransferFromMakerToTakerFailed)?;
			self.ledger
				.native_transfer(self.address, recipient, making)
				.map_err(SettlementError::TransferFromMakerToTakerFailed)?;
		} else {
			self.ledger
				.transfer(order.maker_asset, order.maker, recipient, making)
				.map_err(SettlementError::TransferFromMakerToTakerFailed)?;
		}

		// Interaction re-entry point: the taker holds the maker asset but
		// has not paid yet, so the payment can be sourced from whatever the
		// interaction does, including filling other orders.
		if !traits.interaction.is_empty() {
			let dispatcher = dispatcher.ok_or(SettlementError::MissingInteractionHandler)?;
			debug!(%order_hash, depth = self.depth, "dispatching taker interaction");
			dispatcher.on_taker_interaction(
				self,
				order,
				order_hash,
				taker,
				making,
				taking,
				&traits.interaction,
			)?;
		}

		// Taker => maker leg.
		let receiver = order.receiver_or_maker();
		let maker_unwraps =
			maker_traits.unwrap_native && order.taker_asset == self.ledger.wrapped_native();
		if !native_value.is_zero() {
			if maker_unwraps {
				self.ledger
					.native_transfer(self.address, receiver, taking)
					.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
			} else {
				self.ledger
					.wrap_native(self.address, taking)
					.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
				self.ledger
					.transfer(order.taker_asset, self.address, receiver, taking)
					.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
			}
			// Refund the excess exactly.
			let excess = native_value - taking;
			if !excess.is_zero() {
				self.ledger
					.native_transfer(self.address, taker, excess)
					.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
			}
		} else if maker_unwraps {
			self.ledger
				.transfer(order.taker_asset, taker, self.address, taking)
				.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
			self.ledger
				.unwrap_native(self.address, taking)
				.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
			self.ledger
				.native_transfer(self.address, receiver, taking)
				.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
		} else {
			self.ledger
				.transfer(order.taker_asset, taker, receiver, taking)
				.map_err(SettlementError::TransferFromTakerToMakerFailed)?;
		}

		Ok(FillOutcome {
			making_amount: making,
			taking_amount: taking,
			order_hash,
		})
	}
}
