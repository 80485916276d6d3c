// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sp-protocol: on-disk record protocol for SkillPilot jobs.
//!
//! Atomic single-writer file I/O plus the schema-versioned record types
//! exchanged through a run directory: manifest, timeline, request, ack,
//! summary, and bundle index. Readers never observe a partially written
//! file; loads refuse records from an unknown schema version instead of
//! attempting migration.

pub mod ack;
pub mod atomic;
pub mod bundle;
pub mod manifest;
pub mod request;
pub mod session;
pub mod summary;
pub mod timeline;

pub use ack::{Ack, AckStatus};
pub use atomic::{atomic_write, atomic_write_json, load_json, ProtocolError};
pub use bundle::{BundleEntry, BundleIndex};
pub use manifest::{
    Candidate, DesignDescriptor, LocatorMode, Manifest, RunStatus, SelectionReason, SkillIdentity,
};
pub use request::{Action, Request};
pub use session::SessionState;
pub use summary::Summary;
pub use timeline::{EventKind, EventLevel, Timeline, TimelineEvent};

/// Schema version stamped on every record this crate writes.
pub const SCHEMA_VERSION: &str = "1.0";

/// Format an epoch-millisecond timestamp as RFC 3339 (UTC, second precision).
pub fn format_ts(epoch_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms as i64)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}
