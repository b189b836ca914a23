//! Packed taker traits word, decoded together with the variable-length args.
//!
//! Layout of the word:
//! - bits [0, 185)   threshold: max pay when the amount is making-side,
//!                   min return when the amount is taking-side (0 = unchecked)
//! - bits [200, 224) interaction payload length inside args
//! - bit 251         args start with a 20-byte delivery target
//! - bit 252         use alternate permit source
//! - bit 254         unwrap native asset on receive
//! - bit 255         signalled amount denotes the making side
//!
//! Args layout: `[target: 20 bytes]? [interaction: length per word]`.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const THRESHOLD_BITS: usize = 185;
const INTERACTION_LEN_OFFSET: usize = 200;
const INTERACTION_LEN_BITS: usize = 24;

const HAS_TARGET_FLAG: usize = 251;
const USE_ALTERNATE_PERMIT_FLAG: usize = 252;
const UNWRAP_NATIVE_FLAG: usize = 254;
const MAKING_AMOUNT_FLAG: usize = 255;

/// Errors produced while decoding taker traits args.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraitsError {
	#[error("Taker args too short: expected {expected} bytes, got {actual}")]
	ArgsTooShort { expected: usize, actual: usize },
	#[error("Taker args carry {0} undeclared trailing bytes")]
	TrailingArgs(usize),
}

/// Taker-side fill parameters, decoded from the packed word plus args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakerTraits {
	/// The signalled amount is the making-side quantity.
	pub amount_is_making: bool,
	/// Taker receives the native asset when the maker asset is wrapped-native.
	pub unwrap_native: bool,
	/// Permit pre-authorization comes from the alternate source.
	pub use_alternate_permit: bool,
	/// Slippage bound; interpretation depends on `amount_is_making`.
	pub threshold: U256,
	/// Receives the maker asset instead of the taker when set.
	pub target: Option<Address>,
	/// Opaque interaction payload dispatched mid-settlement.
	pub interaction: Vec<u8>,
}

impl Default for TakerTraits {
	fn default() -> Self {
		Self {
			amount_is_making: false,
			unwrap_native: false,
			use_alternate_permit: false,
			threshold: U256::ZERO,
			target: None,
			interaction: Vec::new(),
		}
	}
}

impl TakerTraits {
	/// Decodes the packed word and its args blob.
	pub fn decode(word: U256, args: &[u8]) -> Result<Self, TraitsError> {
		let threshold_mask = (U256::from(1u8) << THRESHOLD_BITS) - U256::from(1u8);
		let len_mask = (U256::from(1u8) << INTERACTION_LEN_BITS) - U256::from(1u8);
		let interaction_len = ((word >> INTERACTION_LEN_OFFSET) & len_mask).to::<usize>();

		let mut cursor = args;
		let target = if word.bit(HAS_TARGET_FLAG) {
			if cursor.len() < Address::len_bytes() {
				return Err(TraitsError::ArgsTooShort {
					expected: Address::len_bytes(),
					actual: cursor.len(),
				});
			}
			let (head, rest) = cursor.split_at(Address::len_bytes());
			cursor = rest;
			Some(Address::from_slice(head))
		} else {
			None
		};

		if cursor.len() < interaction_len {
			return Err(TraitsError::ArgsTooShort {
				expected: interaction_len,
				actual: cursor.len(),
			});
		}
		let (interaction, rest) = cursor.split_at(interaction_len);
		if !rest.is_empty() {
			return Err(TraitsError::TrailingArgs(rest.len()));
		}

		Ok(Self {
			amount_is_making: word.bit(MAKING_AMOUNT_FLAG),
			unwrap_native: word.bit(UNWRAP_NATIVE_FLAG),
			use_alternate_permit: word.bit(USE_ALTERNATE_PERMIT_FLAG),
			threshold: word & threshold_mask,
			target,
			interaction: interaction.to_vec(),
		})
	}

	/// Encodes into the packed word and args blob consumed by the engine.
	pub fn encode(&self) -> (U256, Vec<u8>) {
		let mut word = self.threshold;
		let mut args = Vec::new();
		if self.amount_is_making {
			word |= U256::from(1u8) << MAKING_AMOUNT_FLAG;
		}
		if self.unwrap_native {
			word |= U256::from(1u8) << UNWRAP_NATIVE_FLAG;
		}
		if self.use_alternate_permit {
			word |= U256::from(1u8) << USE_ALTERNATE_PERMIT_FLAG;
		}
		if let Some(target) = self.target {
			word |= U256::from(1u8) << HAS_TARGET_FLAG;
			args.extend_from_slice(target.as_slice());
		}
		word |= U256::from(self.interaction.len()) << INTERACTION_LEN_OFFSET;
		args.extend_from_slice(&self.interaction);
		(word, args)
	}

	pub fn with_making_amount(mut self) -> Self {
		self.amount_is_making = true;
		self
	}

	pub fn with_threshold(mut self, threshold: U256) -> Self {
		self.threshold = threshold;
		self
	}

	pub fn with_target(mut self, target: Address) -> Self {
		self.target = Some(target);
		self
	}

	pub fn with_interaction(mut self, interaction: Vec<u8>) -> Self {
		self.interaction = interaction;
		self
	}

	pub fn with_unwrap_native(mut self) -> Self {
		self.unwrap_native = true;
		self
	}
}
