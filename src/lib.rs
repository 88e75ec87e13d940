//! Server Recap activity logger
//!
//! Records voice-channel activity and structural changes of Discord-like
//! guilds into durable, append-only per-guild files.
//!
//! # Modules
//!
//! - `types`: identity snapshots and the records written to disk
//! - `tracker`: join/leave correlation into voice sessions
//! - `recorder`: schema-versioned guild metadata journal
//! - `storage`: per-guild file layout, fsynced appends, statistics
//! - `gateway`: inbound notification shapes
//! - `router`: dispatch of notifications and the JSON-lines feed loop
//! - `config`: run modes and the production confirmation
//! - `logging`: console and file tracing setup
//! - `utils`: timestamps, CSV rows, durable file creation
//!
//! # Example
//!
//! ```no_run
//! use std::io;
//! use std::sync::Arc;
//! use server_recap::{EventRouter, GuildLogStore, StorageConfig};
//!
//! let store = Arc::new(GuildLogStore::new(StorageConfig::new("data-dev")));
//! let mut router = EventRouter::new(store);
//! router.run_feed(io::stdin().lock()).unwrap();
//! ```

pub mod config;
pub mod gateway;
pub mod logging;
pub mod recorder;
pub mod router;
pub mod storage;
pub mod tracker;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used items at crate root
pub use config::{BotConfig, Mode};
pub use gateway::Notification;
pub use recorder::GuildEventRecorder;
pub use router::{run_shared_feed, EventRouter, FeedError, FeedReport, RouterStats};
pub use storage::{
    ActivityLog, FileLayoutManager, GuildLogStore, StatsCollector, StorageConfig, StorageError,
    StorageResult,
};
pub use tracker::{TransitionOutcome, VoiceSessionTracker};
pub use types::{
    ChannelKind, ChannelRef, EventRecord, GuildMetadataEvent, GuildRef, MemberRef, SessionRecord,
    SessionType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
