//! Thread-safe handle serializing access to one session.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{LottoSession, PickAccepted, SessionSnapshot};
use crate::{models::DrawResult, selection::PickRejection};

/// Cloneable, thread-safe handle to a single session.
///
/// Every call locks the session for its whole duration, so actions on one
/// session are serialized. Separate handles created with [`SessionHandle::new`]
/// never share state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<LottoSession>>,
}

impl SessionHandle {
    /// Wrap `session` in a new handle.
    pub fn new(session: LottoSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// See [`LottoSession::on_pick_requested`].
    pub fn pick(&self, candidate: u8) -> Result<PickAccepted, PickRejection> {
        self.inner.lock().on_pick_requested(candidate)
    }

    /// See [`LottoSession::on_run_requested`].
    pub fn run(&self) -> DrawResult {
        self.inner.lock().on_run_requested()
    }

    /// See [`LottoSession::on_clear_requested`].
    pub fn clear(&self) {
        self.inner.lock().on_clear_requested();
    }

    /// Snapshot taken under the lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<T>(&self, f: impl FnOnce(&mut LottoSession) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::models::PICK_LIMIT;

    #[test]
    fn concurrent_picks_respect_limit() {
        let handle = SessionHandle::new(LottoSession::with_seed(Some(8)));
        let workers: Vec<_> = (1..=45u8)
            .map(|number| {
                let handle = handle.clone();
                thread::spawn(move || handle.pick(number).is_ok())
            })
            .collect();
        let accepted = workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, PICK_LIMIT);

        let snapshot = handle.snapshot();
        let mut picks = snapshot.selection.picks().to_vec();
        picks.sort_unstable();
        picks.dedup();
        assert_eq!(picks.len(), PICK_LIMIT);
    }

    #[test]
    fn sessions_are_isolated() {
        let first = SessionHandle::new(LottoSession::with_seed(Some(1)));
        let second = SessionHandle::new(LottoSession::with_seed(Some(1)));
        first.pick(5).unwrap();
        first.run();
        assert_eq!(second.pick(5), Ok(PickAccepted { number: 5, slot: 0 }));
        assert!(second.with(|session| session.last_draw().is_none()));
        first.clear();
        assert!(first.with(|session| session.selection().picks().is_empty()));
    }
}
