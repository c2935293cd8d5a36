//! Timelocked governance for a reward-distribution engine.
//!
//! The [`DistributorController`] becomes the sole owner of a
//! [`ManagedEngine`] and gates every sensitive mutation behind:
//!
//! 1. an owner check (always first),
//! 2. for timelocked actions, a `prepare → wait delay → execute` protocol
//!    whose slot is consumed on use,
//! 3. hard bounds on allocation, deposit fee, emission rate and fee splits,
//!
//! and only then forwards the call. Engine rejections surface unchanged.
//!
//! Time is never read from a clock: callers pass `now` to every
//! time-dependent call.

pub mod action;
pub mod bounds;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod timelock;

pub use action::{ActionId, UnknownAction};
pub use bounds::Bounds;
pub use config::ControllerConfig;
pub use controller::DistributorController;
pub use engine::{EngineError, FeeRole, ManagedEngine, NewPool, PoolId, PoolInfo, PoolUpdate};
pub use error::{ErrorKind, GovernanceError};
pub use snapshot::ControllerSnapshot;
pub use timelock::{SlotState, Timelock, DEFAULT_DELAY_SECS};
