//! Compact ERC-2098 signatures over order hashes.

use alloy_primitives::{Address, PrimitiveSignature, SignatureError, B256, U256};
use serde::{Deserialize, Serialize};

use crate::common::OrderHash;

/// Maker signature in compact (r, vs) form: the y-parity bit rides in the
/// top bit of `vs`, the rest is `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactSignature {
	pub r: B256,
	pub vs: B256,
}

impl CompactSignature {
	pub fn new(r: B256, vs: B256) -> Self {
		Self { r, vs }
	}

	/// Packs a full ECDSA signature into compact form.
	pub fn from_signature(signature: &PrimitiveSignature) -> Self {
		let mut vs = signature.s();
		if signature.v() {
			vs |= U256::from(1u8) << 255;
		}
		Self {
			r: signature.r().into(),
			vs: vs.into(),
		}
	}

	/// Recovers the signer of `hash`.
	pub fn recover(&self, hash: OrderHash) -> Result<Address, SignatureError> {
		let vs = U256::from_be_bytes(self.vs.0);
		let s = vs & (U256::MAX >> 1);
		let signature =
			PrimitiveSignature::new(U256::from_be_bytes(self.r.0), s, vs.bit(255));
		signature.recover_address_from_prehash(&hash)
	}
}
