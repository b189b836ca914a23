//! Taker interactions: the mid-settlement re-entry capability.

use alloy_primitives::{Address, U256};
use rfq_ledger::Ledger;
use rfq_types::{Order, OrderHash};

use crate::{engine::SettlementEngine, SettlementError};

/// Callback invoked between the maker-side and taker-side transfer legs of
/// a fill, once the taker holds the maker asset but before it has paid.
///
/// The dispatcher receives the engine itself and may re-enter it: a nested
/// `fill_order_args` of a *different* order is the chained-fill mechanism.
/// Re-entry on the *same* order key fails deterministically: the engine
/// commits invalidation bookkeeping before dispatching. Errors returned
/// here fail the outer fill; nothing is swallowed.
pub trait TakerInteractionInterface<L: Ledger> {
	#[allow(clippy::too_many_arguments)]
	fn on_taker_interaction(
		&mut self,
		engine: &mut SettlementEngine<L>,
		order: &Order,
		order_hash: OrderHash,
		taker: Address,
		making_amount: U256,
		taking_amount: U256,
		interaction: &[u8],
	) -> Result<(), SettlementError>;
}
