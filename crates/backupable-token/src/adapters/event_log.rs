//! # Event Log
//!
//! In-memory [`EventSink`]: keeps the ordered history (optionally bounded)
//! and fans each event out to live subscribers over a `tokio::sync::broadcast`
//! channel.

use crate::domain::value_objects::Address;
use crate::events::{LoggedEvent, TokenEvent};
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use std::collections::VecDeque;
use tokio::sync::broadcast;
use tracing::trace;

/// Default broadcast buffer per subscriber.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Ordered event history with live fan-out.
///
/// History is unbounded unless built with [`EventLog::with_retention`], in
/// which case only the newest events are kept. Sequence numbers keep
/// counting across evictions.
pub struct EventLog {
    history: RwLock<History>,
    sender: broadcast::Sender<LoggedEvent>,
}

struct History {
    events: VecDeque<LoggedEvent>,
    next_sequence: u64,
    retention: Option<usize>,
}

impl EventLog {
    /// Creates a log with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a log whose subscribers buffer up to `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, None)
    }

    /// Creates a log that keeps at most `retention` events in history,
    /// evicting the oldest first.
    #[must_use]
    pub fn with_retention(capacity: usize, retention: usize) -> Self {
        Self::build(capacity, Some(retention.max(1)))
    }

    fn build(capacity: usize, retention: Option<usize>) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            history: RwLock::new(History {
                events: VecDeque::new(),
                next_sequence: 0,
                retention,
            }),
            sender,
        }
    }

    /// Receives every event published after this call.
    ///
    /// A subscriber that falls more than the channel capacity behind gets
    /// `RecvError::Lagged`; [`EventLog::history`] still has every retained
    /// event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LoggedEvent> {
        self.sender.subscribe()
    }

    /// All retained events, in order.
    #[must_use]
    pub fn history(&self) -> Vec<LoggedEvent> {
        self.history.read().events.iter().cloned().collect()
    }

    /// Retained events naming `account` in any role.
    #[must_use]
    pub fn events_for(&self, account: Address) -> Vec<LoggedEvent> {
        self.history
            .read()
            .events
            .iter()
            .filter(|logged| logged.event.involves(account))
            .cloned()
            .collect()
    }

    /// Number of events currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.read().events.len()
    }

    /// Returns true if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.read().events.is_empty()
    }

    /// Number of events ever published, including evicted ones.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.history.read().next_sequence
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventLog {
    fn publish(&self, events: &[TokenEvent]) {
        let mut history = self.history.write();
        for event in events {
            let logged = LoggedEvent {
                sequence: history.next_sequence,
                event: event.clone(),
            };
            history.next_sequence += 1;
            trace!(sequence = logged.sequence, event = logged.event.name(), "Event logged");
            // No receivers is fine; history keeps the event.
            let _ = self.sender.send(logged.clone());
            history.events.push_back(logged);
            if let Some(limit) = history.retention {
                while history.events.len() > limit {
                    history.events.pop_front();
                }
            }
        }
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .field("published", &self.published())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
