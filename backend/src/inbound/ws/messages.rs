//! Wire-level message definitions for the WebSocket adapter.
//!
//! Stock snapshots go over the wire in their domain serialisation; the only
//! adapter-specific payload is the acknowledgement echoed for client text
//! frames.

use serde::Serialize;

/// Acknowledgement sent back for every client text frame.
///
/// The kiosk clients treat the socket as one-way and occasionally send
/// diagnostic text; the acknowledgement confirms receipt without
/// interpreting the content.
#[derive(Debug, Serialize)]
pub struct ReceivedResponse {
    pub message: String,
}

impl ReceivedResponse {
    /// Build the acknowledgement for a received text frame.
    pub fn acknowledging(text: &str) -> Self {
        Self {
            message: format!("received: {text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    #[rstest]
    fn acknowledgement_quotes_the_received_text() {
        let response = ReceivedResponse::acknowledging("hello kiosk");
        let value = serde_json::to_value(&response).expect("serialise acknowledgement");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("received: hello kiosk")
        );
    }

    #[rstest]
    fn acknowledgement_for_empty_text_keeps_the_prefix() {
        let response = ReceivedResponse::acknowledging("");
        assert_eq!(response.message, "received: ");
    }
}
