use super::*;

#[test]
fn builder_defaults_to_pending() {
    let r = Request::builder().build();
    assert_eq!(r.status, QueueItemStatus::Pending);
    assert_eq!(r.priority, Priority::Normal);
    assert!(r.agent_id.is_none());
}

#[test]
fn request_id_has_req_prefix() {
    let id = RequestId::new();
    assert!(id.as_str().starts_with("req-"));
}
