//! Sends the two fixed demo payloads to a newly connected session.

use tracing::warn;

use crate::session::Session;

/// First greeting payload: a single numeric field.
pub const GREETING_NUMBER: &str = r#"{"key": 3.14}"#;

/// Second greeting payload: a single string field.
pub const GREETING_TEXT: &str = r#"{"key": "Some useful message might be handy"}"#;

/// Send the greeting sequence to a session.
///
/// Both payloads go through the session's own writer queue, so the first is
/// handed to the transport before the second. A failed send is logged and
/// skips the rest of the sequence; it never propagates to other sessions.
pub fn greet(session: &Session) {
    for payload in [GREETING_NUMBER, GREETING_TEXT] {
        if let Err(error) = session.send(payload) {
            warn!(session_id = %session.id, %error, "failed to send greeting");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use tokio::sync::mpsc;

    fn make_session(capacity: usize) -> (Session, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Session::new(SessionId("abc123".into()), tx), rx)
    }

    #[test]
    fn payloads_match_reference_demo() {
        assert_eq!(GREETING_NUMBER, "{\"key\": 3.14}");
        assert_eq!(
            GREETING_TEXT,
            "{\"key\": \"Some useful message might be handy\"}"
        );
    }

    #[test]
    fn payloads_are_valid_json() {
        let number: serde_json::Value = serde_json::from_str(GREETING_NUMBER).unwrap();
        assert_eq!(number["key"], 3.14);

        let text: serde_json::Value = serde_json::from_str(GREETING_TEXT).unwrap();
        assert_eq!(text["key"], "Some useful message might be handy");
    }

    #[tokio::test]
    async fn greeting_sends_both_payloads_in_order() {
        let (session, mut rx) = make_session(32);
        greet(&session);

        assert_eq!(rx.recv().await.unwrap(), GREETING_NUMBER);
        assert_eq!(rx.recv().await.unwrap(), GREETING_TEXT);
    }

    #[tokio::test]
    async fn greeting_on_closed_session_sends_nothing() {
        let (session, mut rx) = make_session(32);
        session.close();
        greet(&session);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_skips_rest_of_sequence() {
        let (session, mut rx) = make_session(1);
        greet(&session);

        // Only the first payload fits; the second is skipped, not retried.
        assert_eq!(rx.recv().await.unwrap(), GREETING_NUMBER);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_writer_does_not_panic() {
        let (tx, rx) = mpsc::channel(32);
        let session = Session::new(SessionId("abc123".into()), tx);
        drop(rx);
        greet(&session);
    }
}
