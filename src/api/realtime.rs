// Socket.IO subscription to the backend's push events.
//
// The backend broadcasts on the default namespace of the same host that
// serves the REST API. Callbacks run on the socket client's own task, so
// they only decode and forward; consumers read events off a channel with
// `next()`.

use anyhow::{Context, Result};
use futures::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::Payload;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::{PushEvent, PUSH_EVENT_NAMES};

/// Default Socket.IO namespace the backend emits on.
pub const NAMESPACE: &str = "/";

/// A live connection to the backend's push events.
pub struct PushSubscription {
    socket: Client,
    events: mpsc::UnboundedReceiver<PushEvent>,
}

impl PushSubscription {
    /// Connect to the Socket.IO server at `base_url` and subscribe to every
    /// push event the backend emits.
    pub async fn connect(base_url: &str) -> Result<Self> {
        let (sender, events) = mpsc::unbounded_channel();

        let mut builder = ClientBuilder::new(base_url).namespace(NAMESPACE);
        for name in PUSH_EVENT_NAMES {
            let sender = sender.clone();
            builder = builder.on(name, move |payload: Payload, _socket: Client| {
                forward(name, payload, &sender);
                async {}.boxed()
            });
        }
        builder = builder.on("error", |payload: Payload, _socket: Client| {
            warn!(?payload, "Socket.IO error");
            async {}.boxed()
        });

        let socket = builder
            .connect()
            .await
            .with_context(|| format!("Failed to connect to push events at {base_url}"))?;
        info!(url = base_url, "Subscribed to push events");

        Ok(Self { socket, events })
    }

    /// Wait for the next push event. `None` once the client has shut down.
    pub async fn next(&mut self) -> Option<PushEvent> {
        self.events.recv().await
    }

    pub async fn close(self) -> Result<()> {
        self.socket
            .disconnect()
            .await
            .context("Failed to disconnect from push events")
    }
}

fn forward(name: &str, payload: Payload, sender: &mpsc::UnboundedSender<PushEvent>) {
    match decode_payload(name, payload) {
        Ok(Some(event)) => {
            // A closed receiver means the subscriber is shutting down.
            let _ = sender.send(event);
        }
        Ok(None) => debug!(event = name, "Ignoring unknown push event"),
        Err(e) => warn!(event = name, error = %e, "Dropping malformed push event"),
    }
}

/// Turn a Socket.IO payload into a push event. The backend sends a single
/// JSON object as the event's only argument.
pub fn decode_payload(name: &str, payload: Payload) -> Result<Option<PushEvent>> {
    match payload {
        Payload::Text(values) => {
            let value = values.into_iter().next().unwrap_or(Value::Null);
            PushEvent::from_value(name, value)
        }
        Payload::Binary(bytes) => {
            anyhow::bail!("Unexpected binary payload ({} bytes) on {name}", bytes.len())
        }
        _ => anyhow::bail!("Unsupported payload type on {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_payload_uses_first_argument() {
        let event = decode_payload(
            "human_review",
            Payload::Text(vec![
                json!({"claim": "Tap water is poisoned", "score": -0.6}),
                json!("ignored"),
            ]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.name(), "human_review");
    }

    #[test]
    fn binary_payload_is_rejected() {
        let result = decode_payload("new_verification", Payload::Binary(vec![0u8].into()));
        assert!(result.is_err());
    }

    #[test]
    fn empty_argument_list_is_malformed() {
        assert!(decode_payload("new_verification", Payload::Text(vec![])).is_err());
    }

    #[test]
    fn unknown_events_are_skipped() {
        assert!(decode_payload("pong", Payload::Text(vec![json!({})]))
            .unwrap()
            .is_none());
    }
}
