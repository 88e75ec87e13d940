//! Result of feeding one voice-state change to the tracker

use crate::types::{ChannelId, SessionType};

/// What a single transition did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Same channel before and after (mute/deaf toggles); nothing written
    Unchanged,
    /// Member entered a voice channel
    Joined { channel_id: ChannelId },
    /// Member left voice entirely; one session closed
    Left {
        channel_id: ChannelId,
        session_type: SessionType,
    },
    /// Member moved between channels; one session closed, one opened
    Switched {
        from: ChannelId,
        to: ChannelId,
        session_type: SessionType,
    },
}

impl TransitionOutcome {
    /// Type of the session closed by this transition, if any
    pub fn closed_session(&self) -> Option<SessionType> {
        match self {
            TransitionOutcome::Left { session_type, .. }
            | TransitionOutcome::Switched { session_type, .. } => Some(*session_type),
            _ => None,
        }
    }

    /// Number of rows written to the event log
    pub fn event_rows(&self) -> usize {
        match self {
            TransitionOutcome::Unchanged => 0,
            TransitionOutcome::Joined { .. } | TransitionOutcome::Left { .. } => 1,
            TransitionOutcome::Switched { .. } => 2,
        }
    }
}
