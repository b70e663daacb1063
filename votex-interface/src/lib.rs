//! This crate defines the types exchanged between the VoteX API server and its
//! clients. Both sides of the HTTP boundary depend on it, so a field renamed
//! here is renamed on the wire for everyone.
//!
//! Amounts that are `uint256` on chain (vote counts, rounds) are carried as
//! [`U256`] and serialized as decimal strings.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod models;
pub mod tally;
mod u256_decimal;

pub use error::*;
pub use ethers_core::types::{Address, TransactionReceipt, TxHash, U256};
pub use models::*;

/// Path prefix under which every API route is mounted.
pub const API_PREFIX: &str = "/api";
