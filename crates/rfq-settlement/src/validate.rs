//! Pre-fill order validation.

use alloy_primitives::Address;
use rfq_state::InvalidatorStore;
use rfq_types::{CompactSignature, Order, OrderHash, Timestamp};

use crate::SettlementError;

/// Checks an order is fillable by `taker` at `now`: signature authenticity,
/// expiry, private-order restriction, then invalidation state. Amount math
/// is the reconciler's concern and runs after this passes.
pub(crate) fn validate_order(
	order: &Order,
	order_hash: OrderHash,
	signature: &CompactSignature,
	taker: Address,
	now: Timestamp,
	invalidators: &InvalidatorStore,
) -> Result<(), SettlementError> {
	let signer = signature
		.recover(order_hash)
		.map_err(|_| SettlementError::BadSignature)?;
	if signer != order.maker {
		return Err(SettlementError::BadSignature);
	}

	let traits = &order.maker_traits;
	if traits.is_expired(now) {
		return Err(SettlementError::OrderExpired);
	}
	if !traits.sender_allowed(taker) {
		return Err(SettlementError::PrivateOrder);
	}

	if traits.use_bit_invalidator() {
		if !invalidators.bit().is_valid(order.maker, traits.nonce) {
			return Err(SettlementError::BitInvalidatedOrder);
		}
	} else if invalidators
		.remaining()
		.remaining_capacity(order.maker, order_hash, order.making_amount)
		.is_zero()
	{
		return Err(SettlementError::ExceedsOrderCapacity);
	}

	Ok(())
}
