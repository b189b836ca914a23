//! Error taxonomy for order settlement.

use rfq_ledger::LedgerError;
use rfq_state::InvalidatorError;
use rfq_types::TraitsError;
use thiserror::Error;

/// Every failure surfaces to the immediate caller with no partial state
/// change; the engine rolls transfers and bookkeeping back together.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
	// Authentication
	#[error("Signature does not recover to the order maker")]
	BadSignature,

	// Temporal
	#[error("Order expired")]
	OrderExpired,

	// Replay / invalidation
	#[error("Order is private to another taker")]
	PrivateOrder,
	#[error("Order nonce bit already invalidated")]
	BitInvalidatedOrder,
	#[error("Nonce already invalidated")]
	AlreadyInvalidated,
	#[error("Fill exceeds order capacity")]
	ExceedsOrderCapacity,

	// Amounts
	#[error("Swap with zero amount")]
	SwapWithZeroAmount,
	#[error("Taking amount too high")]
	TakingAmountTooHigh,
	#[error("Making amount too low")]
	MakingAmountTooLow,
	#[error("Fill amounts overflow")]
	AmountOverflow,

	// Value / assets
	#[error("Invalid native value attached to fill")]
	InvalidMsgValue,
	#[error("Transfer from taker to maker failed: {0}")]
	TransferFromTakerToMakerFailed(LedgerError),
	#[error("Transfer from maker to taker failed: {0}")]
	TransferFromMakerToTakerFailed(LedgerError),

	// Interactions
	#[error("Order fill carries an interaction but no dispatcher was provided")]
	MissingInteractionHandler,
	#[error("Malformed taker args: {0}")]
	InvalidTakerArgs(#[from] TraitsError),
	#[error("Interaction failed: {0}")]
	InteractionFailed(String),
}

impl From<InvalidatorError> for SettlementError {
	fn from(err: InvalidatorError) -> Self {
		match err {
			InvalidatorError::AlreadyInvalidated => Self::AlreadyInvalidated,
			InvalidatorError::ExceedsOrderCapacity => Self::ExceedsOrderCapacity,
		}
	}
}
