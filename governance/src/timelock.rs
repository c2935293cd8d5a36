//! Per-action timelock: prepare, wait, execute once.
//!
//! Each [`ActionId`] owns one slot holding an absolute unlock time. A slot is
//! unset until `prepare`, pending until the unlock time, ready from then on,
//! and cleared again by the first successful `consume`.

use crate::action::ActionId;
use crate::error::GovernanceError;
use alb_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Ten days, in seconds.
pub const DEFAULT_DELAY_SECS: u64 = 10 * 24 * 3600;

/// Observable state of one timelock slot at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Unset,
    Pending { unlock_at: Timestamp },
    Ready { unlock_at: Timestamp },
}

/// Unlock timestamps indexed by action ordinal, plus the delay applied by
/// the next `prepare`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timelock {
    unlock_at: [Option<Timestamp>; ActionId::COUNT],
    delay_secs: u64,
}

impl Timelock {
    pub fn new(delay_secs: u64) -> Self {
        Self {
            unlock_at: [None; ActionId::COUNT],
            delay_secs,
        }
    }

    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    /// Change the delay used by later `prepare` calls. In-flight entries keep
    /// the unlock time they were given.
    pub fn set_delay(&mut self, delay_secs: u64) {
        self.delay_secs = delay_secs;
    }

    /// Start (or restart) the countdown for `action`. Last write wins.
    pub fn prepare(&mut self, action: ActionId, now: Timestamp) -> Timestamp {
        let unlock_at = now.saturating_add(self.delay_secs);
        self.unlock_at[action.index()] = Some(unlock_at);
        unlock_at
    }

    /// Clear a ready entry, or say why it cannot be used yet.
    ///
    /// On error the slot is left untouched.
    pub fn consume(&mut self, action: ActionId, now: Timestamp) -> Result<(), GovernanceError> {
        let slot = &mut self.unlock_at[action.index()];
        match *slot {
            None => Err(GovernanceError::NotPrepared(action)),
            Some(unlock_at) if !now.has_reached(unlock_at) => Err(GovernanceError::StillLocked {
                action,
                unlock_at,
                now,
            }),
            Some(_) => {
                *slot = None;
                Ok(())
            }
        }
    }

    pub fn pending_unlock(&self, action: ActionId) -> Option<Timestamp> {
        self.unlock_at[action.index()]
    }

    pub fn state(&self, action: ActionId, now: Timestamp) -> SlotState {
        match self.unlock_at[action.index()] {
            None => SlotState::Unset,
            Some(unlock_at) if now.has_reached(unlock_at) => SlotState::Ready { unlock_at },
            Some(unlock_at) => SlotState::Pending { unlock_at },
        }
    }

    /// All set slots in ordinal order.
    pub fn entries(&self) -> Vec<(ActionId, Timestamp)> {
        ActionId::ALL
            .iter()
            .filter_map(|&a| self.unlock_at[a.index()].map(|t| (a, t)))
            .collect()
    }

    /// Rebuild from stored entries. Later duplicates overwrite earlier ones.
    pub fn from_entries(delay_secs: u64, entries: &[(ActionId, Timestamp)]) -> Self {
        let mut timelock = Self::new(delay_secs);
        for &(action, unlock_at) in entries {
            timelock.unlock_at[action.index()] = Some(unlock_at);
        }
        timelock
    }
}

impl Default for Timelock {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: u64 = 100;

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn unset_slot_is_not_prepared() {
        let mut lock = Timelock::new(DELAY);
        let err = lock.consume(ActionId::ChangeDelay, t(1_000)).unwrap_err();
        assert!(matches!(err, GovernanceError::NotPrepared(ActionId::ChangeDelay)));
        assert_eq!(lock.state(ActionId::ChangeDelay, t(1_000)), SlotState::Unset);
    }

    #[test]
    fn pending_slot_is_still_locked_and_untouched() {
        let mut lock = Timelock::new(DELAY);
        let unlock_at = lock.prepare(ActionId::SetPool, t(10));
        assert_eq!(unlock_at, t(110));

        let err = lock.consume(ActionId::SetPool, t(109)).unwrap_err();
        match err {
            GovernanceError::StillLocked { action, unlock_at, now } => {
                assert_eq!(action, ActionId::SetPool);
                assert_eq!(unlock_at, t(110));
                assert_eq!(now, t(109));
            }
            other => panic!("expected StillLocked, got {other:?}"),
        }
        assert_eq!(lock.pending_unlock(ActionId::SetPool), Some(t(110)));
    }

    #[test]
    fn ready_at_exact_unlock_time_and_single_use() {
        let mut lock = Timelock::new(DELAY);
        lock.prepare(ActionId::UpdateEmissionRate, t(0));
        assert_eq!(
            lock.state(ActionId::UpdateEmissionRate, t(100)),
            SlotState::Ready { unlock_at: t(100) }
        );
        lock.consume(ActionId::UpdateEmissionRate, t(100)).unwrap();
        assert!(matches!(
            lock.consume(ActionId::UpdateEmissionRate, t(100)),
            Err(GovernanceError::NotPrepared(_))
        ));
    }

    #[test]
    fn reprepare_overwrites_unlock_time() {
        let mut lock = Timelock::new(DELAY);
        lock.prepare(ActionId::SetTeamPercent, t(0));
        lock.prepare(ActionId::SetTeamPercent, t(50));
        assert_eq!(lock.pending_unlock(ActionId::SetTeamPercent), Some(t(150)));
        assert!(lock.consume(ActionId::SetTeamPercent, t(100)).is_err());
        lock.consume(ActionId::SetTeamPercent, t(150)).unwrap();
    }

    #[test]
    fn slots_are_independent() {
        let mut lock = Timelock::new(DELAY);
        lock.prepare(ActionId::SetTeamPercent, t(0));
        assert!(matches!(
            lock.consume(ActionId::SetTreasuryPercent, t(500)),
            Err(GovernanceError::NotPrepared(ActionId::SetTreasuryPercent))
        ));
        lock.consume(ActionId::SetTeamPercent, t(500)).unwrap();
    }

    #[test]
    fn delay_change_does_not_move_in_flight_entries() {
        let mut lock = Timelock::new(DELAY);
        lock.prepare(ActionId::SetPool, t(0));
        lock.set_delay(10_000);
        assert_eq!(lock.pending_unlock(ActionId::SetPool), Some(t(100)));
        assert_eq!(lock.prepare(ActionId::ChangeDelay, t(0)), t(10_000));
    }

    #[test]
    fn unlock_time_saturates() {
        let mut lock = Timelock::new(u64::MAX);
        assert_eq!(lock.prepare(ActionId::SetPool, t(5)), t(u64::MAX));
    }

    #[test]
    fn entries_round_trip() {
        let mut lock = Timelock::new(DELAY);
        lock.prepare(ActionId::SetPool, t(1));
        lock.prepare(ActionId::UpdateEmissionRate, t(2));
        let entries = lock.entries();
        assert_eq!(
            entries,
            vec![(ActionId::UpdateEmissionRate, t(102)), (ActionId::SetPool, t(101))]
        );
        assert_eq!(Timelock::from_entries(DELAY, &entries), lock);
    }
}
