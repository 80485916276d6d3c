// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions

use crate::clock::Clock;

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `short()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                if self.0.len() <= n {
                    &self.0
                } else {
                    &self.0[..n]
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a job run.
    ///
    /// Generated ids are `<UTC timestamp>-<6 hex chars>` so that a listing of
    /// run directories sorts by creation time.
    #[derive(Default)]
    pub struct JobId;
}

define_id! {
    /// Identifier for a request submitted into the tool session.
    ///
    /// Composed ids embed a zero-padded sequence number so that queue files
    /// listed in filename order replay in submission order.
    pub struct RequestId;
}

impl RequestId {
    /// Compose a request id as `<job_id>_<seq>_<tag>`.
    ///
    /// The sequence is zero-padded to four digits; tags are short labels
    /// like `restore` or `skill`.
    pub fn compose(job_id: &JobId, seq: u32, tag: &str) -> Self {
        Self(format!("{}_{:04}_{}", job_id, seq, tag))
    }
}

/// Generates unique job identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> JobId;
}

/// Production id generator: UTC timestamp plus a random hex suffix.
#[derive(Clone)]
pub struct TimestampIdGen<C: Clock> {
    clock: C,
}

impl<C: Clock> TimestampIdGen<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGen for TimestampIdGen<C> {
    fn next(&self) -> JobId {
        let ms = self.clock.epoch_ms();
        let ts = chrono::DateTime::from_timestamp_millis(ms as i64)
            .unwrap_or_default()
            .format("%Y%m%dT%H%M%S");
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        JobId::new(format!("{}-{}", ts, &suffix[..6]))
    }
}

/// Sequential ID generator for testing
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(any(test, feature = "test-support"))]
impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1)),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("job")
    }
}

#[cfg(any(test, feature = "test-support"))]
impl IdGen for SequentialIdGen {
    fn next(&self) -> JobId {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        JobId::new(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
