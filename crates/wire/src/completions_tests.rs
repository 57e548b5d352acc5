use super::*;

#[test]
fn enqueue_completion_body_round_trips_camel_case() {
    let body = EnqueueCompletionBody {
        job_id: JobId::new(),
        session_id: "dev".into(),
        commit_sha: "abc123".into(),
        branch: "main".into(),
        message: "done".into(),
        idempotency_key: None,
    };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["commitSha"], "abc123");
    assert!(json.get("idempotencyKey").is_some());
}

#[test]
fn claim_completion_response_omits_absent_completion() {
    let resp = ClaimCompletionResponse {
        ok: true,
        completion: None,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("completion").is_none());
}
