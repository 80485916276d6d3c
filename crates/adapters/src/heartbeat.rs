// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat staleness probe.
//!
//! The queue processor rewrites `session/heartbeat` with the epoch
//! millisecond count on every loop iteration. The probe prefers the file
//! content (robust under clock-skewed network filesystems and fake clocks)
//! and falls back to the file's mtime when the content does not parse.

use sp_core::Clock;
use std::path::Path;
use std::time::Duration;

/// Age of the heartbeat, or `None` when no heartbeat exists yet.
pub fn heartbeat_age<C: Clock>(path: &Path, clock: &C) -> Option<Duration> {
    let now_ms = clock.epoch_ms();

    if let Ok(raw) = std::fs::read_to_string(path) {
        if let Ok(beat_ms) = raw.trim().parse::<u64>() {
            return Some(Duration::from_millis(now_ms.saturating_sub(beat_ms)));
        }
    }

    let meta = std::fs::metadata(path).ok()?;
    let mtime = meta.modified().ok()?;
    let mtime_ms = mtime
        .duration_since(std::time::UNIX_EPOCH)
        .ok()?
        .as_millis() as u64;
    Some(Duration::from_millis(now_ms.saturating_sub(mtime_ms)))
}

/// Staleness rule: an age exactly at the threshold is still alive; one tick
/// past it is lost. A missing heartbeat counts as stale.
pub fn is_stale(age: Option<Duration>, timeout: Duration) -> bool {
    match age {
        Some(age) => age > timeout,
        None => true,
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
