//! Manual picks and the run lock.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{in_pool, PICK_LIMIT};

/// Reason a manual pick was turned down.
///
/// The `Display` text is what the user sees in the warning toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PickRejection {
    /// A draw already ran; the session must be cleared first.
    #[error("must clear first")]
    AlreadyRun,
    /// Five numbers are picked already.
    #[error("max 5 selections")]
    SelectionFull,
    /// The candidate lies outside the number pool.
    #[error("out of range (1-45)")]
    OutOfRange,
    /// The candidate is already picked.
    #[error("already selected")]
    DuplicatePick,
}

/// Session phase derived from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing picked, nothing drawn.
    Idle,
    /// One to five numbers picked, no draw yet.
    Picking,
    /// A draw ran; picks are frozen until cleared.
    Run,
}

/// User intent forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Add a number to the manual picks.
    Pick,
    /// Complete the picks into a draw.
    Run,
    /// Reset the session.
    Clear,
}

impl Phase {
    /// Phase reached after an accepted `intent`, or `None` when the phase
    /// refuses it.
    ///
    /// Capacity and duplicate checks live in [`SelectionState::try_pick`];
    /// a pick that fails them leaves the phase untouched.
    pub fn next(self, intent: Intent) -> Option<Phase> {
        match (self, intent) {
            (_, Intent::Clear) => Some(Phase::Idle),
            (Phase::Run, Intent::Pick) => None,
            (Phase::Idle | Phase::Picking, Intent::Pick) => Some(Phase::Picking),
            (_, Intent::Run) => Some(Phase::Run),
        }
    }
}

/// Numbers picked by hand plus the run flag.
///
/// Only serialized, never read back: picks enter through [`SelectionState::try_pick`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    picks: Vec<u8>,
    has_run: bool,
}

impl SelectionState {
    /// Empty selection in the `Idle` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Picked numbers in insertion order, which is also slot order.
    pub fn picks(&self) -> &[u8] {
        &self.picks
    }

    /// Whether a draw ran since the last clear.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> Phase {
        if self.has_run {
            Phase::Run
        } else if self.picks.is_empty() {
            Phase::Idle
        } else {
            Phase::Picking
        }
    }

    /// Validate `candidate` and append it on success, returning the slot
    /// index it occupies.
    ///
    /// Checks run in a fixed order and the first failure wins. A rejection
    /// never modifies the state.
    pub fn try_pick(&mut self, candidate: u8) -> Result<usize, PickRejection> {
        if self.phase().next(Intent::Pick).is_none() {
            return Err(PickRejection::AlreadyRun);
        }
        if self.picks.len() >= PICK_LIMIT {
            return Err(PickRejection::SelectionFull);
        }
        if !in_pool(candidate) {
            return Err(PickRejection::OutOfRange);
        }
        if self.picks.contains(&candidate) {
            return Err(PickRejection::DuplicatePick);
        }
        self.picks.push(candidate);
        Ok(self.picks.len() - 1)
    }

    /// Reset to the initial `Idle` state.
    pub fn clear(&mut self) {
        self.picks.clear();
        self.has_run = false;
    }

    /// Record that a draw completed; freezes the picks until [`clear`](Self::clear).
    pub fn mark_run(&mut self) {
        self.has_run = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use Intent::*;
        use Phase::*;

        assert_eq!(Idle.next(Pick), Some(Picking));
        assert_eq!(Picking.next(Pick), Some(Picking));
        assert_eq!(Idle.next(Intent::Run), Some(Phase::Run));
        assert_eq!(Picking.next(Intent::Run), Some(Phase::Run));
        assert_eq!(Phase::Run.next(Pick), None);
        assert_eq!(Phase::Run.next(Clear), Some(Idle));
        assert_eq!(Picking.next(Clear), Some(Idle));
        assert_eq!(Idle.next(Clear), Some(Idle));
    }

    #[test]
    fn picks_fill_slots_in_order() {
        let mut state = SelectionState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.try_pick(30), Ok(0));
        assert_eq!(state.try_pick(4), Ok(1));
        assert_eq!(state.picks(), &[30, 4]);
        assert_eq!(state.phase(), Phase::Picking);
    }

    #[test]
    fn sixth_pick_is_rejected() {
        let mut state = SelectionState::new();
        for value in 1..=5 {
            assert!(state.try_pick(value).is_ok());
        }
        assert_eq!(state.try_pick(6), Err(PickRejection::SelectionFull));
        // Full wins over duplicate.
        assert_eq!(state.try_pick(1), Err(PickRejection::SelectionFull));
        assert_eq!(state.picks().len(), PICK_LIMIT);
    }

    #[test]
    fn duplicate_pick_is_rejected() {
        let mut state = SelectionState::new();
        state.try_pick(9).unwrap();
        assert_eq!(state.try_pick(9), Err(PickRejection::DuplicatePick));
        assert_eq!(state.picks(), &[9]);
    }

    #[test]
    fn run_locks_every_candidate() {
        let mut state = SelectionState::new();
        state.try_pick(12).unwrap();
        state.mark_run();
        assert_eq!(state.phase(), Phase::Run);
        for candidate in [0, 1, 12, 45, 200] {
            assert_eq!(state.try_pick(candidate), Err(PickRejection::AlreadyRun));
        }
        assert_eq!(state.picks(), &[12]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut state = SelectionState::new();
        assert_eq!(state.try_pick(0), Err(PickRejection::OutOfRange));
        assert_eq!(state.try_pick(46), Err(PickRejection::OutOfRange));
        assert!(state.picks().is_empty());
    }

    #[test]
    fn clear_resets_from_any_phase() {
        let mut state = SelectionState::new();
        state.clear();
        assert_eq!(state, SelectionState::new());

        state.try_pick(3).unwrap();
        state.clear();
        assert_eq!(state.phase(), Phase::Idle);

        state.try_pick(3).unwrap();
        state.mark_run();
        state.clear();
        assert!(state.picks().is_empty());
        assert!(!state.has_run());
        assert_eq!(state.try_pick(3), Ok(0));
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(PickRejection::AlreadyRun.to_string(), "must clear first");
        assert_eq!(PickRejection::SelectionFull.to_string(), "max 5 selections");
        assert_eq!(PickRejection::DuplicatePick.to_string(), "already selected");
        assert_eq!(PickRejection::OutOfRange.to_string(), "out of range (1-45)");
    }
}
