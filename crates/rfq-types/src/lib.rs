//! Core data model for the RFQ engine.
//!
//! This crate defines the order structure, the packed maker/taker traits
//! words and their decoded forms, EIP-712 order hashing, and compact
//! (r, vs) signatures with address recovery.

pub mod common;
pub mod maker_traits;
pub mod order;
pub mod signature;
pub mod taker_traits;

pub use common::{OrderHash, Timestamp};
pub use maker_traits::MakerTraits;
pub use order::{Order, OrderDomain};
pub use signature::CompactSignature;
pub use taker_traits::{TakerTraits, TraitsError};
