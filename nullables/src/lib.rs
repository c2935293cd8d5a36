//! Nullable infrastructure for deterministic testing.
//!
//! Everything the controller depends on from the outside world (the clock
//! and the distribution engine) has a controllable, in-memory stand-in here:
//! - [`NullClock`] only moves when told to
//! - [`NullDistributor`] keeps the pool registry and parameters in memory
//!   and enforces the same owner check and limits a deployed engine does
//!
//! Used by the governance tests and by `alb-govctl simulate`.

pub mod clock;
pub mod distributor;

pub use clock::NullClock;
pub use distributor::{DistributorParams, NullDistributor};
