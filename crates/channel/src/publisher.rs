//! Writer-side publishing policy
//!
//! The channel never retries on its own. [`EventPublisher`] wraps a sink and
//! applies the producer's chosen policy when the ring is full.

use crossbeam::utils::Backoff;
use hermes_core::Event;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::source::EventSink;

/// What to do when the sink rejects an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishPolicy {
    /// Give up immediately
    #[default]
    Drop,
    /// Retry up to `attempts` more times, backing off between tries
    Retry { attempts: u32 },
}

/// Accepted/dropped counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub accepted: u64,
    pub dropped: u64,
    pub retries: u64,
}

/// Sink wrapper applying a [`PublishPolicy`]
pub struct EventPublisher<K> {
    sink: K,
    name: String,
    policy: PublishPolicy,
    stats: PublishStats,
}

impl<K: EventSink> EventPublisher<K> {
    pub fn new(sink: K, name: impl Into<String>, policy: PublishPolicy) -> Self {
        Self {
            sink,
            name: name.into(),
            policy,
            stats: PublishStats::default(),
        }
    }

    /// Publish one event, returning [`ChannelError::Full`] once the policy
    /// is exhausted
    pub fn publish(&mut self, event: &Event) -> Result<(), ChannelError> {
        if self.sink.try_write(event) {
            self.stats.accepted += 1;
            return Ok(());
        }

        if let PublishPolicy::Retry { attempts } = self.policy {
            let backoff = Backoff::new();
            for _ in 0..attempts {
                backoff.snooze();
                self.stats.retries += 1;
                if self.sink.try_write(event) {
                    self.stats.accepted += 1;
                    return Ok(());
                }
            }
        }

        self.stats.dropped += 1;
        log::warn!(
            "[publisher] {} full, dropped {} event ({} dropped so far)",
            self.name,
            event.kind(),
            self.stats.dropped
        );
        Err(ChannelError::Full(self.name.clone()))
    }

    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    pub fn policy(&self) -> PublishPolicy {
        self.policy
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_inner(self) -> K {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts a fixed number of writes, then rejects until `free` is bumped
    struct Bounded {
        free: usize,
        written: Vec<Event>,
    }

    impl EventSink for Bounded {
        fn try_write(&mut self, event: &Event) -> bool {
            if self.free == 0 {
                return false;
            }
            self.free -= 1;
            self.written.push(*event);
            true
        }
    }

    #[test]
    fn test_drop_policy_counts_losses() {
        let sink = Bounded {
            free: 1,
            written: Vec::new(),
        };
        let mut publisher = EventPublisher::new(sink, "test", PublishPolicy::Drop);

        assert!(publisher.publish(&Event::default()).is_ok());
        assert!(matches!(
            publisher.publish(&Event::default()),
            Err(ChannelError::Full(name)) if name == "test"
        ));
        let stats = publisher.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.retries, 0);
        assert_eq!(publisher.into_inner().written.len(), 1);
    }

    #[test]
    fn test_retry_policy_exhausts_attempts() {
        let sink = Bounded {
            free: 0,
            written: Vec::new(),
        };
        let mut publisher = EventPublisher::new(sink, "test", PublishPolicy::Retry { attempts: 3 });

        assert!(publisher.publish(&Event::default()).is_err());
        assert_eq!(publisher.stats().retries, 3);
        assert_eq!(publisher.stats().dropped, 1);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: PublishPolicy =
            serde_json::from_str(r#"{ "kind": "retry", "attempts": 5 }"#).unwrap();
        assert_eq!(policy, PublishPolicy::Retry { attempts: 5 });
    }
}
