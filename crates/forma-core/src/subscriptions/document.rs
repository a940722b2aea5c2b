use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use futures::StreamExt;
use std::sync::{Arc, OnceLock};
use tokio::sync::{broadcast, mpsc};
use tokio::task::AbortHandle;
use tokio_stream::wrappers::BroadcastStream;

const BUS_CAPACITY: usize = 256;

fn bus() -> &'static broadcast::Sender<TerminalEvent> {
    static BUS: OnceLock<broadcast::Sender<TerminalEvent>> = OnceLock::new();
    BUS.get_or_init(|| broadcast::channel(BUS_CAPACITY).0)
}

/// Publish an event to every live document listener.
///
/// Only pointer and viewport events are forwarded; keyboard input is routed
/// by the application to whichever widget has focus.
pub fn publish(event: &TerminalEvent) {
    if event.is_document_level() {
        // No receivers is the common case when nothing floats; not an error.
        let _ = bus().send(event.clone());
    }
}

/// Marker type for document listener subscription ids.
pub struct DocumentEvents;

/// Listen for document-level (pointer and viewport) events.
///
/// `key` identifies the registration; a widget passes its instance id so that
/// each instance holds at most one document listener. A listener that falls
/// behind skips the events it missed rather than failing.
pub fn document_events<Msg: Send + 'static>(
    key: u64,
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let id = SubscriptionId::new::<DocumentEvents>(key);
    let map = Arc::new(map);

    // The receiver is created when the runtime starts the registration, not
    // each time a widget declares it. Starting happens inside reconcile, so
    // no event published after that point is missed.
    Subscription {
        id,
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let rx = bus().subscribe();
            let handle = tokio::spawn(async move {
                let stream = BroadcastStream::new(rx).filter_map(move |result| {
                    let map = map.clone();
                    async move {
                        match result {
                            Ok(event) => map(event),
                            Err(err) => {
                                tracing::trace!(target: "forma_core::document", %err, "document listener lagged");
                                None
                            }
                        }
                    }
                });
                futures::pin_mut!(stream);
                while let Some(msg) = stream.next().await {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind, KeyModifiers};

    #[test]
    fn only_document_level_events_are_published() {
        let mut rx = bus().subscribe();
        publish(&TerminalEvent::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        publish(&TerminalEvent::Resize(80, 24));
        publish(&TerminalEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 1,
            row: 2,
            modifiers: KeyModifiers::NONE,
        }));

        // Other tests may publish concurrently; only check that no key event arrives.
        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            seen.push(ev);
        }
        assert!(seen.iter().all(TerminalEvent::is_document_level));
        assert!(seen.contains(&TerminalEvent::Resize(80, 24)));
    }

    #[test]
    fn listeners_are_keyed_per_instance() {
        let a = document_events(1, Some::<TerminalEvent>);
        let b = document_events(2, Some::<TerminalEvent>);
        let a2 = document_events(1, Some::<TerminalEvent>);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a2.id());
    }

    #[tokio::test]
    async fn receiver_is_created_when_the_listener_starts() {
        let sub = document_events(7, |event| match event {
            TerminalEvent::Resize(4321, n) => Some(n),
            _ => None,
        });
        publish(&TerminalEvent::Resize(4321, 1));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = (sub.spawn)(tx);
        publish(&TerminalEvent::Resize(4321, 2));

        let got = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(got, Some(2));
        handle.abort();
    }
}
