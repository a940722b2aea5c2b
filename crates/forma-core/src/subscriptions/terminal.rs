use super::document;
use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSource};
use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Subscription source for terminal events (keyboard, mouse, resize, focus, paste).
///
/// There is exactly one reader of the terminal per process. It republishes
/// every event on the [document bus](super::document_events) before handing it
/// to the application, so widgets can listen for pointer and viewport
/// activity without the application routing it to them.
pub struct TerminalEvents;

impl SubscriptionSource for TerminalEvents {
    type Output = TerminalEvent;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>()
    }

    fn stream(self) -> BoxStream<'static, TerminalEvent> {
        let stream = EventStream::new().filter_map(|result| async move {
            match result {
                Ok(event) => {
                    let event = TerminalEvent::from(event);
                    document::publish(&event);
                    Some(event)
                }
                Err(err) => {
                    tracing::warn!(target: "forma_core::terminal", %err, "terminal read failed");
                    None
                }
            }
        });
        Box::pin(stream)
    }
}

/// Create a terminal events subscription that maps each event through a
/// user-provided function.
///
/// The `map` closure returns `Some(Msg)` to forward an event or `None` to
/// discard it. Discarded events are still published on the document bus.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::KeyPress(key)),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let id = SubscriptionId::of::<TerminalEvents>();
    let map = Arc::new(map);

    // The EventStream is created inside the task, not when the subscription
    // is declared: subscriptions() runs every cycle and crossterm's global
    // reader must only be touched by the live stream.
    Subscription {
        id,
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let handle = tokio::spawn(async move {
                let stream = TerminalEvents.stream().filter_map(move |event| {
                    let map = map.clone();
                    async move { map(event) }
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
