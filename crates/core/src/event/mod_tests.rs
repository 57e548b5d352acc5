use super::*;
use crate::job::JobId;

fn envelope(body: EventBody) -> Event {
    Event {
        protocol_version: PROTOCOL_VERSION,
        id: EventId::generate(),
        ts: Utc::now(),
        session_id: SessionId::new("dev"),
        from: "worker-1".into(),
        to: None,
        correlation_id: None,
        turn_id: None,
        parent_id: None,
        body,
    }
}

#[test]
fn wire_shape_adjacently_tags_type_and_payload() {
    let ev = envelope(EventBody::JobCompleted(JobCompletedPayload {
        job_id: JobId::new(),
        result: None,
    }));
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["type"], "job_completed");
    assert!(json.get("payload").is_some());
    assert!(json.get("to").is_none(), "absent optional fields are omitted");
}

#[test]
fn round_trips_through_json() {
    let ev = envelope(EventBody::Message(MessagePayload {
        text: "hello".into(),
    }));
    let json = serde_json::to_string(&ev).unwrap();
    let parsed: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ev);
}

#[test]
fn unknown_type_fails_to_deserialize() {
    let json = serde_json::json!({
        "protocolVersion": 1,
        "id": EventId::generate().0,
        "ts": Utc::now(),
        "sessionId": "dev",
        "from": "x",
        "type": "not_a_real_type",
        "payload": {}
    });
    let result: Result<Event, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn kind_matches_body_variant() {
    let ev = envelope(EventBody::Approved(ApprovedPayload {
        approval_id: "a1".into(),
        note: None,
    }));
    assert_eq!(ev.kind(), EventKind::Approved);
}
