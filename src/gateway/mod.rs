//! Inbound notifications from the gateway collaborator
//!
//! The realtime connection itself lives outside this crate. It hands over
//! each callback as one JSON object per line, tagged by `event`:
//!
//! ```text
//! {"event":"ready","guilds":[{"id":1,"name":"G"}]}
//! {"event":"voice_state_updated","member":{...},"before":null,"after":{...}}
//! ```

mod notification;

pub use notification::Notification;
