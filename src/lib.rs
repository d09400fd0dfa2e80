//! Core library for the trade-clipboard swap form.
//!
//! The library holds the state behind one swap widget: the currency pair,
//! the typed amount, slippage settings and the cached quote. Asset
//! listings, balances and routing sit behind traits so that the binary
//! (`main.rs`) can back them with whatever source it has at hand.

pub mod balance;
pub mod config;
pub mod errors;
pub mod models;
pub mod registry;
pub mod router;
pub mod slippage;
pub mod swap;
pub mod utils;
