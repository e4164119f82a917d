//! In-memory TelemetrySink implementation
//!
//! MemoryTelemetry stores events in a Vec for replay and uses a broadcast
//! channel for live subscribers.

use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;

use super::TelemetryEvent;
use super::sink::TelemetrySink;

/// In-memory implementation of TelemetrySink
pub struct MemoryTelemetry {
    events: RwLock<Vec<TelemetryEvent>>,
    tx: broadcast::Sender<TelemetryEvent>,
}

impl MemoryTelemetry {
    /// Create a sink with the given broadcast channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            events: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Subscribe to events logged from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.tx.subscribe()
    }

    /// All events logged so far
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn active_count(&self) -> usize {
        self.count(TelemetryEvent::is_active)
    }

    pub fn idle_count(&self) -> usize {
        self.count(TelemetryEvent::is_idle)
    }

    fn count(&self, pred: fn(&TelemetryEvent) -> bool) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl Default for MemoryTelemetry {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn log(&self, event: TelemetryEvent) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());

        // Broadcast to live subscribers (ignore if no receivers)
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_stores_events_in_order() {
        let sink = MemoryTelemetry::default();
        sink.log(TelemetryEvent::active("0"));
        sink.log(TelemetryEvent::idle("0", 1, 0, false, &[]));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_active());
        assert!(events[1].is_idle());
        assert_eq!(sink.active_count(), 1);
        assert_eq!(sink.idle_count(), 1);
    }

    #[test]
    fn log_without_subscribers_does_not_fail() {
        let sink = MemoryTelemetry::new(1);
        sink.log(TelemetryEvent::active("0"));
        sink.log(TelemetryEvent::active("0"));
        assert_eq!(sink.active_count(), 2);
    }

    #[tokio::test]
    async fn subscriber_receives_new_events() {
        let sink = MemoryTelemetry::default();
        let mut rx = sink.subscribe();

        sink.log(TelemetryEvent::active("front"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.camera_id(), "front");
    }
}
