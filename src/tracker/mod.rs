//! Voice Session Tracker
//!
//! Correlates raw voice-state transitions into session records.
//!
//! # State machine (per `(member_id, guild_id)`)
//!
//! ```text
//! NONE ──JOIN──► CONNECTED ──LEAVE──► NONE        complete session
//! NONE ──LEAVE─────────────────────► NONE        corrupted session
//! CONNECTED(A) ──LEAVE(A)+JOIN(B)──► CONNECTED(B) channel switch
//! ```
//!
//! The open-connection map lives only in memory. A leave whose join was
//! never seen by this process (restart mid-session, lost event) is closed
//! as a corrupted session with `start_time = -1` and `duration = 0`.

mod outcome;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::storage::{ActivityLog, StorageResult};
use crate::types::{
    ChannelRef, EventRecord, GuildId, MemberId, MemberRef, SessionRecord, SessionType,
    VoiceConnection, VoiceEventType,
};

pub use outcome::TransitionOutcome;

/// Key of a live connection
pub type ConnectionKey = (MemberId, GuildId);

/// In-memory join/leave correlator
///
/// Not synchronized: the router feeds it one transition at a time.
pub struct VoiceSessionTracker<L: ActivityLog> {
    log: Arc<L>,
    connections: HashMap<ConnectionKey, VoiceConnection>,
}

impl<L: ActivityLog> VoiceSessionTracker<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self {
            log,
            connections: HashMap::new(),
        }
    }

    /// Consume one voice-state change
    ///
    /// `before`/`after` are the member's channel before and after the
    /// change. Channels are compared by id. A switch is processed as the
    /// leave of `before` followed by the join of `after`, both at
    /// `timestamp`, so the closed session is written before the new
    /// connection replaces the map entry.
    pub fn on_transition(
        &mut self,
        member: &MemberRef,
        before: Option<&ChannelRef>,
        after: Option<&ChannelRef>,
        timestamp: f64,
    ) -> StorageResult<TransitionOutcome> {
        if before.map(|c| c.id) == after.map(|c| c.id) {
            return Ok(TransitionOutcome::Unchanged);
        }

        match (before, after) {
            (None, Some(after)) => {
                self.join(member, after, timestamp)?;
                Ok(TransitionOutcome::Joined {
                    channel_id: after.id,
                })
            }
            (Some(before), None) => {
                let session_type = self.leave(member, before, timestamp)?;
                Ok(TransitionOutcome::Left {
                    channel_id: before.id,
                    session_type,
                })
            }
            (Some(before), Some(after)) => {
                let session_type = self.leave(member, before, timestamp)?;
                self.join(member, after, timestamp)?;
                Ok(TransitionOutcome::Switched {
                    from: before.id,
                    to: after.id,
                    session_type,
                })
            }
            (None, None) => Ok(TransitionOutcome::Unchanged),
        }
    }

    /// Live connection for a member in a guild
    pub fn connection(&self, member_id: MemberId, guild_id: GuildId) -> Option<&VoiceConnection> {
        self.connections.get(&(member_id, guild_id))
    }

    /// All live connections, in no particular order
    pub fn open_connections(&self) -> impl Iterator<Item = &VoiceConnection> {
        self.connections.values()
    }

    /// Number of live connections
    pub fn open_count(&self) -> usize {
        self.connections.len()
    }

    fn join(&mut self, member: &MemberRef, channel: &ChannelRef, timestamp: f64) -> StorageResult<()> {
        self.log.append_event(&EventRecord::new(
            member,
            channel,
            timestamp,
            VoiceEventType::Join,
        ))?;

        let connection = VoiceConnection::open(member, channel, timestamp);
        if let Some(stale) = self.connections.insert((member.id, member.guild.id), connection) {
            // The leave for the stale entry was lost; it is dropped without a session row
            debug!(
                "Discarding stale connection of {} in channel {} (started {})",
                stale.member_id, stale.channel_id, stale.start_time
            );
        }

        Ok(())
    }

    fn leave(
        &mut self,
        member: &MemberRef,
        channel: &ChannelRef,
        timestamp: f64,
    ) -> StorageResult<SessionType> {
        self.log.append_event(&EventRecord::new(
            member,
            channel,
            timestamp,
            VoiceEventType::Leave,
        ))?;

        let session = self.close_session(member, channel, timestamp);
        self.log.append_session(&session)?;
        debug!("Session ended: {}", session.to_csv_line());

        Ok(session.session_type)
    }

    fn close_session(&mut self, member: &MemberRef, channel: &ChannelRef, timestamp: f64) -> SessionRecord {
        match self.connections.remove(&(member.id, member.guild.id)) {
            Some(connection) => SessionRecord::complete(&connection, timestamp),
            None => SessionRecord::corrupted(member, channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{member, voice, RecordingLog};
    use crate::types::UNKNOWN_START_TIME;

    fn create_tracker() -> (VoiceSessionTracker<RecordingLog>, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        (VoiceSessionTracker::new(Arc::clone(&log)), log)
    }

    #[test]
    fn test_join_then_leave_is_complete() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");
        let a = voice(10, "A");

        let joined = tracker.on_transition(&m, None, Some(&a), 100.0).unwrap();
        assert_eq!(joined, TransitionOutcome::Joined { channel_id: 10 });
        assert_eq!(tracker.open_count(), 1);

        let left = tracker.on_transition(&m, Some(&a), None, 160.5).unwrap();
        assert_eq!(left.closed_session(), Some(SessionType::Complete));
        assert_eq!(tracker.open_count(), 0);

        let sessions = log.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, 100.0);
        assert_eq!(sessions[0].duration, 60.5);
        assert_eq!(sessions[0].session_type, SessionType::Complete);

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, VoiceEventType::Join);
        assert_eq!(events[1].event_type, VoiceEventType::Leave);
    }

    #[test]
    fn test_leave_without_join_is_corrupted() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");

        let outcome = tracker
            .on_transition(&m, Some(&voice(10, "A")), None, 200.0)
            .unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Left {
                channel_id: 10,
                session_type: SessionType::Corrupted
            }
        );
        let sessions = log.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, UNKNOWN_START_TIME);
        assert_eq!(sessions[0].duration, 0.0);
        assert_eq!(sessions[0].channel_name, "A");
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn test_channel_switch() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");
        let a = voice(10, "A");
        let b = voice(20, "B");

        tracker.on_transition(&m, None, Some(&a), 100.0).unwrap();
        let outcome = tracker.on_transition(&m, Some(&a), Some(&b), 150.0).unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Switched {
                from: 10,
                to: 20,
                session_type: SessionType::Complete
            }
        );

        let events = log.events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            (events[1].event_type, events[1].channel_id, events[1].timestamp),
            (VoiceEventType::Leave, 10, 150.0)
        );
        assert_eq!(
            (events[2].event_type, events[2].channel_id, events[2].timestamp),
            (VoiceEventType::Join, 20, 150.0)
        );

        let sessions = log.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].channel_id, 10);
        assert_eq!(sessions[0].duration, 50.0);

        assert_eq!(tracker.open_count(), 1);
        let connection = tracker.connection(1, 1000).unwrap();
        assert_eq!(connection.channel_id, 20);
        assert_eq!(connection.start_time, 150.0);
    }

    #[test]
    fn test_switch_without_prior_join() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");

        let outcome = tracker
            .on_transition(&m, Some(&voice(10, "A")), Some(&voice(20, "B")), 300.0)
            .unwrap();

        assert_eq!(outcome.closed_session(), Some(SessionType::Corrupted));
        assert_eq!(log.events().len(), 2);
        assert_eq!(tracker.connection(1, 1000).unwrap().start_time, 300.0);
    }

    #[test]
    fn test_same_channel_is_noop() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");
        let a = voice(10, "A");

        tracker.on_transition(&m, None, Some(&a), 100.0).unwrap();
        let outcome = tracker.on_transition(&m, Some(&a), Some(&a), 120.0).unwrap();
        assert_eq!(outcome, TransitionOutcome::Unchanged);

        let outcome = tracker.on_transition(&m, None, None, 130.0).unwrap();
        assert_eq!(outcome, TransitionOutcome::Unchanged);

        assert_eq!(log.events().len(), 1);
        assert!(log.sessions().is_empty());
        assert_eq!(tracker.connection(1, 1000).unwrap().start_time, 100.0);
    }

    #[test]
    fn test_rejoin_overwrites_stale_connection() {
        let (mut tracker, log) = create_tracker();
        let m = member(1, "alice");

        tracker.on_transition(&m, None, Some(&voice(10, "A")), 100.0).unwrap();
        // The leave from A was never delivered
        tracker.on_transition(&m, None, Some(&voice(20, "B")), 500.0).unwrap();

        assert!(log.sessions().is_empty());
        assert_eq!(tracker.open_count(), 1);
        let connection = tracker.connection(1, 1000).unwrap();
        assert_eq!((connection.channel_id, connection.start_time), (20, 500.0));
    }

    #[test]
    fn test_session_uses_names_captured_at_join() {
        let (mut tracker, log) = create_tracker();

        tracker
            .on_transition(&member(1, "alice"), None, Some(&voice(10, "A")), 100.0)
            .unwrap();
        tracker
            .on_transition(&member(1, "alice2"), Some(&voice(10, "A-renamed")), None, 110.0)
            .unwrap();

        let sessions = log.sessions();
        assert_eq!(sessions[0].member_name, "alice");
        assert_eq!(sessions[0].channel_name, "A");
        // The leave event itself carries live names
        assert_eq!(log.events()[1].member_name, "alice2");
    }

    #[test]
    fn test_connections_are_keyed_per_guild() {
        let (mut tracker, _log) = create_tracker();
        let in_first = member(1, "alice");
        let mut in_second = member(1, "alice");
        in_second.guild.id = 2000;

        tracker.on_transition(&in_first, None, Some(&voice(10, "A")), 1.0).unwrap();
        tracker.on_transition(&in_second, None, Some(&voice(30, "C")), 2.0).unwrap();

        assert_eq!(tracker.open_count(), 2);
        assert_eq!(tracker.connection(1, 1000).unwrap().channel_id, 10);
        assert_eq!(tracker.connection(1, 2000).unwrap().channel_id, 30);
        assert_eq!(tracker.open_connections().count(), 2);
    }
}
