//! Packed maker traits word and its decoded form.
//!
//! A maker signs a single 256-bit traits word alongside the order fields.
//! The word is decoded once at the engine boundary into [`MakerTraits`];
//! nothing downstream re-derives flags from raw bits.
//!
//! Layout:
//! - bits [0, 80)    allowed-sender tail (low 80 bits of an address, 0 = public)
//! - bits [80, 120)  expiration timestamp, Unix seconds (0 = none)
//! - bits [120, 160) nonce
//! - bit 247         unwrap native asset on receive
//! - bit 248         use alternate permit source
//! - bit 254         allow multiple fills (cumulative invalidation)

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::common::Timestamp;

const ALLOWED_SENDER_BITS: usize = 80;
const EXPIRATION_OFFSET: usize = 80;
const NONCE_OFFSET: usize = 120;
const FIELD_BITS: usize = 40;

const UNWRAP_NATIVE_FLAG: usize = 247;
const USE_ALTERNATE_PERMIT_FLAG: usize = 248;
const ALLOW_MULTIPLE_FILLS_FLAG: usize = 254;

/// Maker-side order traits, decoded from the packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerTraits {
	/// Low 80 bits of the only taker allowed to fill, 0 for a public order.
	pub allowed_sender: u128,
	/// Expiration timestamp in Unix seconds, 0 for no expiry.
	pub expiration: Timestamp,
	/// Per-maker nonce scoping bit-flag invalidation.
	pub nonce: u64,
	/// Cumulative-amount invalidation instead of one-shot bit invalidation.
	pub allow_multiple_fills: bool,
	/// Maker receives the native asset when the taker asset is wrapped-native.
	pub unwrap_native: bool,
	/// Permit pre-authorization comes from the alternate source.
	pub use_alternate_permit: bool,
}

impl Default for MakerTraits {
	fn default() -> Self {
		Self {
			allowed_sender: 0,
			expiration: 0,
			nonce: 0,
			allow_multiple_fills: true,
			unwrap_native: false,
			use_alternate_permit: false,
		}
	}
}

impl MakerTraits {
	/// Decodes the packed traits word.
	pub fn decode(word: U256) -> Self {
		let field_mask = U256::from(1u8) << FIELD_BITS;
		let field_mask = field_mask - U256::from(1u8);
		let sender_mask = (U256::from(1u8) << ALLOWED_SENDER_BITS) - U256::from(1u8);
		Self {
			allowed_sender: (word & sender_mask).to::<u128>(),
			expiration: ((word >> EXPIRATION_OFFSET) & field_mask).to::<u64>(),
			nonce: ((word >> NONCE_OFFSET) & field_mask).to::<u64>(),
			allow_multiple_fills: word.bit(ALLOW_MULTIPLE_FILLS_FLAG),
			unwrap_native: word.bit(UNWRAP_NATIVE_FLAG),
			use_alternate_permit: word.bit(USE_ALTERNATE_PERMIT_FLAG),
		}
	}

	/// Encodes back into the packed word signed by the maker.
	pub fn encode(&self) -> U256 {
		let field_mask = (1u64 << FIELD_BITS) - 1;
		let mut word = U256::from(self.allowed_sender)
			| (U256::from(self.expiration & field_mask) << EXPIRATION_OFFSET)
			| (U256::from(self.nonce & field_mask) << NONCE_OFFSET);
		if self.allow_multiple_fills {
			word |= U256::from(1u8) << ALLOW_MULTIPLE_FILLS_FLAG;
		}
		if self.unwrap_native {
			word |= U256::from(1u8) << UNWRAP_NATIVE_FLAG;
		}
		if self.use_alternate_permit {
			word |= U256::from(1u8) << USE_ALTERNATE_PERMIT_FLAG;
		}
		word
	}

	/// Single-fill orders are tracked by the bit invalidator.
	pub fn use_bit_invalidator(&self) -> bool {
		!self.allow_multiple_fills
	}

	/// Whether `taker` may fill this order.
	pub fn sender_allowed(&self, taker: Address) -> bool {
		self.allowed_sender == 0 || self.allowed_sender == address_tail(taker)
	}

	/// Whether the order has expired at `now`.
	pub fn is_expired(&self, now: Timestamp) -> bool {
		self.expiration != 0 && now > self.expiration
	}

	pub fn with_nonce(mut self, nonce: u64) -> Self {
		self.nonce = nonce;
		self
	}

	pub fn with_expiration(mut self, expiration: Timestamp) -> Self {
		self.expiration = expiration;
		self
	}

	pub fn with_allowed_sender(mut self, sender: Address) -> Self {
		self.allowed_sender = address_tail(sender);
		self
	}

	pub fn with_multiple_fills(mut self, allow: bool) -> Self {
		self.allow_multiple_fills = allow;
		self
	}

	pub fn with_unwrap_native(mut self, unwrap: bool) -> Self {
		self.unwrap_native = unwrap;
		self
	}
}

/// Low 80 bits of an address, used for private-order matching.
fn address_tail(addr: Address) -> u128 {
	let mut tail = [0u8; 16];
	tail[6..].copy_from_slice(&addr.as_slice()[10..]);
	u128::from_be_bytes(tail)
}
