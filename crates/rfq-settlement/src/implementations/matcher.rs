//! Recursive order matcher.
//!
//! Reference dispatcher reproducing the two interaction payload shapes the
//! protocol supports: a forwarded nested fill (opcode `0x00`) whose
//! proceeds satisfy the outer fill's taker-side obligation, and a fail-fast
//! batch of ledger operations (opcode `0x01`). Interaction bytes are laid
//! out `[target: 20][opcode: 1][serde_json payload]`; the matcher only
//! accepts payloads addressed to its own account.

use alloy_primitives::{Address, B256, U256};
use rfq_ledger::Ledger;
use rfq_types::{Order, OrderHash};
use serde::{Deserialize, Serialize};

use crate::{
	engine::{FillOutcome, SettlementEngine},
	interaction::TakerInteractionInterface,
	SettlementError,
};

const FORWARD_FILL_OPCODE: u8 = 0x00;
const BATCH_OPCODE: u8 = 0x01;

/// Nested fill forwarded by an opcode-`0x00` interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardedFill {
	pub order: Order,
	pub r: B256,
	pub vs: B256,
	pub amount: U256,
	pub taker_traits: U256,
	pub args: Vec<u8>,
}

/// One step of an opcode-`0x01` batch, executed in order, fail-fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerCall {
	Transfer {
		asset: Address,
		from: Address,
		to: Address,
		amount: U256,
	},
	NativeTransfer {
		from: Address,
		to: Address,
		amount: U256,
	},
}

/// Taker that chains fills: it enters the engine as the taker of an outer
/// order and services that order's payment from the proceeds of nested
/// fills carried in the interaction payload.
pub struct RecursiveMatcher {
	address: Address,
}

impl RecursiveMatcher {
	pub fn new(address: Address) -> Self {
		Self { address }
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Top-level entry: fills `order` as this matcher, dispatching any
	/// nested interactions back into itself.
	#[allow(clippy::too_many_arguments)]
	pub fn match_orders<L: Ledger>(
		&mut self,
		engine: &mut SettlementEngine<L>,
		order: &Order,
		r: B256,
		vs: B256,
		amount: U256,
		taker_traits: U256,
		args: &[u8],
	) -> Result<FillOutcome, SettlementError> {
		engine.fill_order_args(
			self.address,
			U256::ZERO,
			order,
			r,
			vs,
			amount,
			taker_traits,
			args,
			Some(self),
		)
	}

	/// Encodes a forwarded-fill interaction addressed to this matcher.
	pub fn encode_forward_fill(&self, fill: &ForwardedFill) -> Result<Vec<u8>, serde_json::Error> {
		let mut out = self.address.to_vec();
		out.push(FORWARD_FILL_OPCODE);
		out.extend(serde_json::to_vec(fill)?);
		Ok(out)
	}

	/// Encodes a batch interaction addressed to this matcher.
	pub fn encode_batch(&self, calls: &[LedgerCall]) -> Result<Vec<u8>, serde_json::Error> {
		let mut out = self.address.to_vec();
		out.push(BATCH_OPCODE);
		out.extend(serde_json::to_vec(calls)?);
		Ok(out)
	}
}

impl<L: Ledger> TakerInteractionInterface<L> for RecursiveMatcher {
	fn on_taker_interaction(
		&mut self,
		engine: &mut SettlementEngine<L>,
		_order: &Order,
		_order_hash: OrderHash,
		_taker: Address,
		_making_amount: U256,
		_taking_amount: U256,
		interaction: &[u8],
	) -> Result<(), SettlementError> {
		if interaction.len() < Address::len_bytes() + 1 {
			return Err(SettlementError::InteractionFailed(
				"interaction shorter than target and opcode".to_string(),
			));
		}
		let (target, rest) = interaction.split_at(Address::len_bytes());
		let target = Address::from_slice(target);
		if target != self.address {
			return Err(SettlementError::InteractionFailed(format!(
				"interaction addressed to unknown target {}",
				target
			)));
		}

		let (opcode, payload) = (rest[0], &rest[1..]);
		match opcode {
			FORWARD_FILL_OPCODE => {
				let fill: ForwardedFill = serde_json::from_slice(payload)
					.map_err(|e| SettlementError::InteractionFailed(e.to_string()))?;
				engine.fill_order_args(
					self.address,
					U256::ZERO,
					&fill.order,
					fill.r,
					fill.vs,
					fill.amount,
					fill.taker_traits,
					&fill.args,
					Some(self),
				)?;
				Ok(())
			}
			BATCH_OPCODE => {
				let calls: Vec<LedgerCall> = serde_json::from_slice(payload)
					.map_err(|e| SettlementError::InteractionFailed(e.to_string()))?;
				for call in calls {
					match call {
						LedgerCall::Transfer {
							asset,
							from,
							to,
							amount,
						} => engine.ledger_mut().transfer(asset, from, to, amount),
						LedgerCall::NativeTransfer { from, to, amount } => {
							engine.ledger_mut().native_transfer(from, to, amount)
						}
					}
					.map_err(|e| SettlementError::InteractionFailed(e.to_string()))?;
				}
				Ok(())
			}
			other => Err(SettlementError::InteractionFailed(format!(
				"unknown interaction opcode {:#04x}",
				other
			))),
		}
	}
}
