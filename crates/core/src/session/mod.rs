//! Session orchestration: the calls the presentation layer makes.

mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    draw::DrawEngine,
    models::DrawResult,
    selection::{Phase, PickRejection, SelectionState},
};

pub use handle::SessionHandle;

/// Accepted manual pick and the slot it should be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickAccepted {
    /// The picked number.
    pub number: u8,
    /// Zero-based display slot, in insertion order.
    pub slot: usize,
}

/// Draw result stamped with the time it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedDraw {
    /// The sorted six numbers.
    pub result: DrawResult,
    /// Manual picks the draw was completed from.
    pub picks: Vec<u8>,
    /// When the draw ran.
    pub drawn_at: DateTime<Utc>,
}

/// Serializable view of a session, used for debug logging.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Selection state.
    pub selection: SelectionState,
    /// Latest draw since the last clear.
    pub last_draw: Option<CompletedDraw>,
    /// Seed of the draw engine, when reproducible.
    pub seed: Option<u64>,
}

/// One interactive session: selection state plus the engine completing it.
#[derive(Debug, Clone)]
pub struct LottoSession {
    selection: SelectionState,
    engine: DrawEngine,
    last_draw: Option<CompletedDraw>,
}

impl LottoSession {
    /// Fresh `Idle` session drawing from `engine`.
    pub fn new(engine: DrawEngine) -> Self {
        Self {
            selection: SelectionState::new(),
            engine,
            last_draw: None,
        }
    }

    /// Fresh session, seeded when `seed` is set.
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(DrawEngine::with_seed(seed))
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> Phase {
        self.selection.phase()
    }

    /// Latest draw since the last clear.
    pub fn last_draw(&self) -> Option<&CompletedDraw> {
        self.last_draw.as_ref()
    }

    /// Validate and record a manual pick.
    pub fn on_pick_requested(&mut self, candidate: u8) -> Result<PickAccepted, PickRejection> {
        match self.selection.try_pick(candidate) {
            Ok(slot) => {
                info!(number = candidate, slot, "Pick accepted");
                Ok(PickAccepted {
                    number: candidate,
                    slot,
                })
            }
            Err(reason) => {
                debug!(number = candidate, ?reason, "Pick rejected");
                Err(reason)
            }
        }
    }

    /// Complete the current picks into a draw and lock further picking.
    ///
    /// Running again before a clear draws a new completion of the same
    /// frozen picks.
    pub fn on_run_requested(&mut self) -> DrawResult {
        let picks = self.selection.picks().to_vec();
        let result = self.engine.generate(&picks);
        self.selection.mark_run();
        info!(%result, picks = picks.len(), "Draw completed");
        self.last_draw = Some(CompletedDraw {
            result,
            picks,
            drawn_at: Utc::now(),
        });
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => debug!(snapshot = %json, "Session state after draw"),
            Err(err) => error!(%err, "failed to serialize session snapshot"),
        }
        result
    }

    /// Reset picks, run flag and the shown draw.
    pub fn on_clear_requested(&mut self) {
        self.selection.clear();
        self.last_draw = None;
        info!("Session cleared");
    }

    /// Serializable copy of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            selection: self.selection.clone(),
            last_draw: self.last_draw.clone(),
            seed: self.engine.seed(),
        }
    }
}

impl Default for LottoSession {
    fn default() -> Self {
        Self::new(DrawEngine::default())
    }
}
