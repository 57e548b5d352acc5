// SPDX-License-Identifier: MIT

//! `/jobs/enqueue`, `/jobs/claim`, `/jobs/{id}/log|complete|fail`, `/jobs/{id}/logs`.

use axum::extract::{Path, Query, State};
use axum::Json;
use pushpals_core::{Job, JobId, LogLine, LogStream, SessionId};
use pushpals_wire::jobs::{
    ClaimJobBody, ClaimJobResponse, EnqueueJobBody, EnqueueJobResponse, JobCompleteBody, JobFailBody,
    JobLogBody, JobLogsQuery, JobLogsResponse,
};
use pushpals_wire::requests::OkResponse;

use super::AppState;
use crate::error::ApiError;

pub async fn enqueue(
    State(state): State<AppState>,
    Json(body): Json<EnqueueJobBody>,
) -> Result<Json<EnqueueJobResponse>, ApiError> {
    let now = state.now();
    let job = Job {
        id: JobId::new(),
        task_id: body.task_id,
        session_id: SessionId::new(body.session_id),
        kind: body.kind,
        params: body.params,
        idempotency_key: body.idempotency_key,
        priority: body.priority,
        status: pushpals_core::QueueItemStatus::Pending,
        worker_id: None,
        target_worker_id: body.target_worker_id,
        result: None,
        error: None,
        execution_budget_ms: body.execution_budget_ms,
        finalization_budget_ms: body.finalization_budget_ms,
        requeue_count: 0,
        enqueued_at_epoch_ms: now,
        claimed_at_epoch_ms: None,
        started_at_epoch_ms: None,
        first_log_at_epoch_ms: None,
        completed_at_epoch_ms: None,
        failed_at_epoch_ms: None,
        updated_at_epoch_ms: now,
    };
    let job_id = state.store.enqueue_job(job)?;
    Ok(Json(EnqueueJobResponse { ok: true, job_id }))
}

pub async fn claim(
    State(state): State<AppState>,
    Json(body): Json<ClaimJobBody>,
) -> Result<Json<ClaimJobResponse>, ApiError> {
    let job = state.store.claim_next_job(&body.worker_id, state.now())?;
    Ok(Json(ClaimJobResponse { ok: true, job }))
}

pub async fn log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<JobLogBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = JobId::from_string(id);
    let line = LogLine {
        job_id: id,
        stream: body.stream,
        seq: body.seq,
        line: body.line,
        recorded_at_epoch_ms: state.now(),
    };
    state.store.append_job_log(line)?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<JobCompleteBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = JobId::from_string(id);
    state.store.complete_job(id, body.result, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn fail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<JobFailBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = JobId::from_string(id);
    state
        .store
        .fail_job(id, body.message, body.detail, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

fn stream_rank(stream: &LogStream) -> u8 {
    match stream {
        LogStream::Stdout => 0,
        LogStream::Stderr => 1,
    }
}

/// Append order on the wire is whatever order workers happened to post in;
/// callers need each stream's lines back in `seq` order regardless (spec.md
/// §8 scenario 5).
pub async fn logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<JobLogsQuery>,
) -> Json<JobLogsResponse> {
    let id = JobId::from_string(id);
    let mut lines = state.store.job_logs(&id);
    lines.sort_by_key(|line| (stream_rank(&line.stream), line.seq));
    if let Some(limit) = query.limit {
        if lines.len() > limit {
            let start = lines.len() - limit;
            lines = lines.split_off(start);
        }
    }
    Json(JobLogsResponse { lines })
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
