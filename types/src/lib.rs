//! Fundamental types shared by the governance crates.
//!
//! Addresses, timestamps and token-unit constants. Everything here is plain
//! data: no I/O, no clocks.

pub mod address;
pub mod amount;
pub mod time;

pub use address::{Address, AddressError};
pub use amount::{parse_raw, tokens, TOKEN_UNIT};
pub use time::Timestamp;
