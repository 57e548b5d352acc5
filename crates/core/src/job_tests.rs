use super::*;

#[test]
fn builder_defaults_to_pending_unbound() {
    let job = Job::builder().build();
    assert_eq!(job.status, QueueItemStatus::Pending);
    assert!(job.worker_id.is_none());
    assert!(job.target_worker_id.is_none());
    assert_eq!(job.requeue_count, 0);
}

#[test]
fn job_id_has_job_prefix() {
    let id = JobId::new();
    assert!(id.as_str().starts_with("job-"));
}

#[test]
fn target_worker_id_is_a_soft_hint_not_a_binding() {
    let job = Job::builder().target_worker_id(WorkerId::new("w1")).build();
    assert_eq!(job.worker_id, None);
    assert_eq!(job.target_worker_id, Some(WorkerId::new("w1")));
}
