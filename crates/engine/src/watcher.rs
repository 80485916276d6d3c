// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background session health watcher.
//!
//! Polls the launcher's health view on an interval and broadcasts the
//! first non-alive observation over a watch channel. The ack waiter
//! selects on the channel so a dead session interrupts the wait instead
//! of letting it run to the ack timeout.

use sp_adapters::{Health, Launcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Handle to a spawned health watcher.
pub struct HealthWatcher {
    task: tokio::task::JoinHandle<()>,
    rx: watch::Receiver<Option<Health>>,
}

impl HealthWatcher {
    /// Spawn the watcher over a started session.
    pub fn spawn<L: Launcher>(
        launcher: Arc<L>,
        handle: Arc<L::Handle>,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(async move {
            loop {
                let health = launcher.poll_health(&handle).await;
                if health != Health::Alive {
                    warn!(?health, "session health degraded");
                    let _ = tx.send(Some(health));
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        });
        Self { task, rx }
    }

    /// Channel carrying the first detected failure (`None` while healthy).
    pub fn subscribe(&self) -> watch::Receiver<Option<Health>> {
        self.rx.clone()
    }

    /// Last observation without waiting.
    pub fn current(&self) -> Option<Health> {
        *self.rx.borrow()
    }

    /// Stop watching (the session itself is not touched).
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for HealthWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
