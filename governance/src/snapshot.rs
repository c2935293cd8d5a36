//! Binary snapshots of controller state.
//!
//! A snapshot carries the owner, the controller's engine-facing address, the
//! current delay, the bounds and every still-set timelock slot. Consumed
//! slots are absent, so restoring can never re-arm a used preparation. The
//! engine is not part of the snapshot; the caller supplies it on restore.

use crate::action::ActionId;
use crate::bounds::Bounds;
use crate::controller::DistributorController;
use crate::engine::ManagedEngine;
use crate::error::GovernanceError;
use crate::timelock::Timelock;
use alb_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// Serializable form of a [`DistributorController`] minus its engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub address: Address,
    pub owner: Address,
    pub delay_secs: u64,
    pub bounds: Bounds,
    pub pending: Vec<(ActionId, Timestamp)>,
}

impl<E: ManagedEngine> DistributorController<E> {
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            address: self.address(),
            owner: self.owner(),
            delay_secs: self.delay(),
            bounds: self.bounds().clone(),
            pending: self.timelock().entries(),
        }
    }

    /// Serialize controller state for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.snapshot()).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Rebuild a controller from [`save_state`](Self::save_state) bytes.
    pub fn restore(data: &[u8], engine: E) -> Result<Self, GovernanceError> {
        let snapshot: ControllerSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot, engine))
    }

    pub fn from_snapshot(snapshot: ControllerSnapshot, engine: E) -> Self {
        Self::from_parts(
            snapshot.address,
            snapshot.owner,
            engine,
            Timelock::from_entries(snapshot.delay_secs, &snapshot.pending),
            snapshot.bounds,
        )
    }
}
