//! Event classification: keep group text messages, skip everything else.

use tracing::{debug, info};

use crate::line::{InboundEvent, MessageContent, MessageEvent, Source};
use crate::relay::NormalizedMessage;

/// Select group text messages from a webhook batch, in delivery order.
///
/// Events of any other kind, source, or content type are skipped. So are
/// group texts with an empty group id or text.
pub fn classify(events: &[InboundEvent]) -> Vec<NormalizedMessage> {
    events.iter().filter_map(classify_event).collect()
}

fn classify_event(event: &InboundEvent) -> Option<NormalizedMessage> {
    let event = match event {
        InboundEvent::Message(e) => e,
        InboundEvent::Unknown => {
            debug!("event_skipped_kind");
            return None;
        }
    };

    let (group_id, user_id) = match &event.source {
        Source::Group { group_id, user_id } => (group_id, user_id),
        Source::Room { .. } | Source::User { .. } | Source::Unknown => {
            debug!(source = event.source.kind(), "event_skipped_source");
            return None;
        }
    };

    let text = match &event.message {
        MessageContent::Text { text, .. } => text,
        MessageContent::Unknown => {
            debug!(group_id = %group_id, "event_skipped_content");
            return None;
        }
    };

    log_redelivery(event, group_id);

    let msg = NormalizedMessage::new(
        group_id.as_str(),
        user_id.as_str(),
        text.as_str(),
        event.timestamp,
    );
    if msg.is_none() {
        info!(
            group_id_empty = group_id.is_empty(),
            text_empty = text.is_empty(),
            "group_message_dropped_empty"
        );
    }
    msg
}

fn log_redelivery(event: &MessageEvent, group_id: &str) {
    if event.is_redelivery() {
        info!(
            group_id = %group_id,
            webhook_event_id = event.webhook_event_id.as_deref().unwrap_or(""),
            "group_message_redelivered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Callback;

    fn parse(events: &str) -> Vec<InboundEvent> {
        let body = format!(r#"{{"destination": "Ubot", "events": [{events}]}}"#);
        serde_json::from_str::<Callback>(&body).unwrap().events
    }

    fn group_text(group: &str, user: &str, text: &str, ts: i64) -> String {
        format!(
            r#"{{"type": "message", "timestamp": {ts},
                "source": {{"type": "group", "groupId": "{group}", "userId": "{user}"}},
                "message": {{"type": "text", "id": "m", "text": "{text}"}}}}"#
        )
    }

    #[test]
    fn test_classify_keeps_group_text() {
        let events = parse(&group_text("C1", "Uabcdefghij", "hello", 42));
        let msgs = classify(&events);

        assert_eq!(
            msgs,
            vec![NormalizedMessage {
                group_id: "C1".to_string(),
                user_id: "Uabcdefghij".to_string(),
                display_name: "User-Uabcdefg".to_string(),
                text: "hello".to_string(),
                timestamp_millis: 42,
            }]
        );
    }

    #[test]
    fn test_classify_skips_other_shapes_and_preserves_order() {
        let events = parse(&[
            group_text("C1", "U1", "first", 1),
            r#"{"type": "follow", "timestamp": 2, "source": {"type": "user", "userId": "U2"}}"#.to_string(),
            r#"{"type": "message", "timestamp": 3,
                "source": {"type": "user", "userId": "U3"},
                "message": {"type": "text", "id": "m", "text": "direct"}}"#.to_string(),
            r#"{"type": "message", "timestamp": 4,
                "source": {"type": "room", "roomId": "R1", "userId": "U4"},
                "message": {"type": "text", "id": "m", "text": "room"}}"#.to_string(),
            r#"{"type": "message", "timestamp": 5,
                "source": {"type": "group", "groupId": "C1", "userId": "U5"},
                "message": {"type": "image", "id": "m"}}"#.to_string(),
            group_text("C2", "", "second", 6),
            group_text("C1", "U7", "third", 7),
        ]
        .join(","));

        let msgs = classify(&events);
        let texts: Vec<_> = msgs.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(msgs[1].display_name, "Unknown User");
        assert!(msgs.iter().all(|m| m.group_id.starts_with('C')));
    }

    #[test]
    fn test_classify_drops_empty_text() {
        let events = parse(&group_text("C1", "U1", "", 1));
        assert!(classify(&events).is_empty());
    }

    #[test]
    fn test_classify_empty_batch() {
        assert!(classify(&[]).is_empty());
    }
}
