//! Counters kept by the router over one process lifetime

use tracing::info;

use crate::tracker::TransitionOutcome;
use crate::types::SessionType;

/// What the router has dispatched and written so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub notifications: u64,
    /// Voice updates whose channel did not change
    pub ignored_voice_updates: u64,
    pub complete_sessions: u64,
    pub corrupted_sessions: u64,
    pub voice_events: u64,
    pub guild_events: u64,
}

impl RouterStats {
    pub(crate) fn record_transition(&mut self, outcome: &TransitionOutcome) {
        if *outcome == TransitionOutcome::Unchanged {
            self.ignored_voice_updates += 1;
        }
        self.voice_events += outcome.event_rows() as u64;
        match outcome.closed_session() {
            Some(SessionType::Complete) => self.complete_sessions += 1,
            Some(SessionType::Corrupted) => self.corrupted_sessions += 1,
            None => {}
        }
    }

    pub fn sessions(&self) -> u64 {
        self.complete_sessions + self.corrupted_sessions
    }

    pub fn log_summary(&self) {
        info!(
            "Dispatched {} notifications ({} voice updates ignored)",
            self.notifications, self.ignored_voice_updates
        );
        info!(
            "Wrote {} voice events, {} sessions ({} complete, {} corrupted), {} guild events",
            self.voice_events,
            self.sessions(),
            self.complete_sessions,
            self.corrupted_sessions,
            self.guild_events
        );
    }
}
