use tokio::sync::mpsc::{self, error::TryRecvError};

use super::UpdateEvent;

/// Create the unbounded queue between the poll loop and the display tick.
pub fn update_channel() -> (UpdateSender, UpdateReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UpdateSender { tx }, UpdateReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::UnboundedSender<UpdateEvent>,
}

impl UpdateSender {
    /// Queue an event without blocking. Returns `false` once the receiver is gone.
    pub fn send(&self, event: UpdateEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct UpdateReceiver {
    rx: mpsc::UnboundedReceiver<UpdateEvent>,
}

impl UpdateReceiver {
    /// Remove and return everything queued right now, oldest first.
    pub fn try_drain_all(&mut self) -> Vec<UpdateEvent> {
        let mut drained = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_event(message: &str) -> UpdateEvent {
        UpdateEvent::Error {
            message: message.to_string(),
        }
    }

    #[test]
    fn empty_channel_drains_to_nothing() {
        let (tx, mut rx) = update_channel();
        assert!(rx.try_drain_all().is_empty());
        assert!(tx.send(error_event("after empty drain")));
        assert_eq!(rx.try_drain_all().len(), 1);
    }

    #[test]
    fn drains_in_enqueue_order() {
        let (tx, mut rx) = update_channel();
        for message in ["one", "two", "three"] {
            assert!(tx.send(error_event(message)));
        }

        let drained = rx.try_drain_all();
        assert_eq!(
            drained,
            vec![error_event("one"), error_event("two"), error_event("three")]
        );
        assert!(rx.try_drain_all().is_empty());
    }

    #[test]
    fn send_reports_dropped_receiver() {
        let (tx, rx) = update_channel();
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.send(error_event("nobody listening")));
    }

    #[test]
    fn queued_events_survive_sender_drop() {
        let (tx, mut rx) = update_channel();
        tx.send(error_event("last words"));
        drop(tx);
        assert_eq!(rx.try_drain_all(), vec![error_event("last words")]);
    }
}
