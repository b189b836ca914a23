//! Fill-amount reconciliation.
//!
//! Pure computation resolving a caller-signalled quantity against the order
//! ratio and the remaining capacity. Rounding always favors the maker: the
//! amount the maker receives rounds up, the amount the maker pays rounds
//! down, and a fill whose rounded counterpart would reach zero is rejected
//! outright.

use alloy_primitives::{U256, U512};

use crate::SettlementError;

/// Reconciled fill quantities, both nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillAmounts {
	pub making: U256,
	pub taking: U256,
}

/// Resolves `amount` against the order's `making_total : taking_total`
/// ratio.
///
/// `amount` denotes the making side when `amount_is_making` is set, the
/// taking side otherwise; either way it is clamped to `remaining_making`
/// capacity rather than rejected when it over-requests. A nonzero
/// `threshold` bounds the taker's side of the bargain: the maximum paid in
/// making mode, the minimum received in taking mode, scaled proportionally
/// when the fill was clamped below the signalled amount.
pub fn reconcile(
	making_total: U256,
	taking_total: U256,
	remaining_making: U256,
	amount: U256,
	amount_is_making: bool,
	threshold: U256,
) -> Result<FillAmounts, SettlementError> {
	if amount.is_zero() || making_total.is_zero() || taking_total.is_zero() {
		return Err(SettlementError::SwapWithZeroAmount);
	}

	let (making, taking) = if amount_is_making {
		let making = amount.min(remaining_making);
		let taking = mul_div_ceil(making, taking_total, making_total)?;
		if !threshold.is_zero() {
			let too_high = if making == amount {
				taking > threshold
			} else {
				wide(taking) * wide(amount) > wide(threshold) * wide(making)
			};
			if too_high {
				return Err(SettlementError::TakingAmountTooHigh);
			}
		}
		(making, taking)
	} else {
		let mut taking = amount;
		let mut making = mul_div_floor(taking, making_total, taking_total)?;
		if making > remaining_making {
			making = remaining_making;
			taking = mul_div_ceil(making, taking_total, making_total)?;
		}
		if !threshold.is_zero() {
			let too_low = if taking == amount {
				making < threshold
			} else {
				wide(making) * wide(amount) < wide(threshold) * wide(taking)
			};
			if too_low {
				return Err(SettlementError::MakingAmountTooLow);
			}
		}
		(making, taking)
	};

	if making.is_zero() || taking.is_zero() {
		return Err(SettlementError::SwapWithZeroAmount);
	}

	Ok(FillAmounts { making, taking })
}

fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256, SettlementError> {
	mul_div(a, b, denominator, false)
}

fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Result<U256, SettlementError> {
	mul_div(a, b, denominator, true)
}

// Products are taken in 512-bit space so only quotients that genuinely do
// not fit 256 bits are rejected.
fn mul_div(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256, SettlementError> {
	if denominator.is_zero() {
		return Err(SettlementError::SwapWithZeroAmount);
	}
	let (quotient, remainder) = (wide(a) * wide(b)).div_rem(wide(denominator));
	let quotient = if round_up && !remainder.is_zero() {
		quotient + U512::from(1u8)
	} else {
		quotient
	};
	narrow(quotient).ok_or(SettlementError::AmountOverflow)
}

fn wide(value: U256) -> U512 {
	U512::from_limbs_slice(value.as_limbs())
}

fn narrow(value: U512) -> Option<U256> {
	let limbs = value.as_limbs();
	if limbs[4..].iter().any(|&limb| limb != 0) {
		return None;
	}
	Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}
