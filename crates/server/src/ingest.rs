// SPDX-License-Identifier: MIT

//! Command Ingest: validates an inbound `CommandRequest` fully before it is
//! turned into a stored `Event`, mirroring the daemon's
//! `listener/queues/validation.rs` discipline — shape checks first, then
//! payload-by-type checks, each returning a typed rejection before any
//! store write happens (spec.md §4.5).

use pushpals_core::EventBody;
use pushpals_wire::sessions::CommandRequest;

use crate::error::ApiError;

/// Reject the command outright if any required field is missing or empty.
/// Nothing is written to the store until this returns `Ok`.
pub fn validate_command(command: &CommandRequest) -> Result<(), ApiError> {
    if command.from.trim().is_empty() {
        return Err(ApiError::Validation("command.from must not be empty".into()));
    }
    if let Some(to) = &command.to {
        if to.trim().is_empty() {
            return Err(ApiError::Validation(
                "command.to must not be empty when present".into(),
            ));
        }
    }
    validate_body(&command.body)
}

fn non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_body(body: &EventBody) -> Result<(), ApiError> {
    match body {
        EventBody::Message(p) => non_empty("message.text", &p.text),
        EventBody::AssistantMessage(p) => non_empty("assistantMessage.text", &p.text),
        EventBody::AgentStatus(p) => {
            non_empty("agentStatus.agentId", &p.agent_id)?;
            non_empty("agentStatus.status", &p.status)
        }
        EventBody::TaskCreated(p) => non_empty("taskCreated.taskId", &p.task_id),
        EventBody::TaskStarted(p) => non_empty("taskStarted.taskId", &p.task_id),
        EventBody::TaskProgress(p) => {
            non_empty("taskProgress.taskId", &p.task_id)?;
            non_empty("taskProgress.message", &p.message)
        }
        EventBody::TaskCompleted(p) => non_empty("taskCompleted.taskId", &p.task_id),
        EventBody::TaskFailed(p) => {
            non_empty("taskFailed.taskId", &p.task_id)?;
            non_empty("taskFailed.message", &p.message)
        }
        EventBody::JobEnqueued(p) => {
            non_empty("jobEnqueued.taskId", &p.task_id)?;
            non_empty("jobEnqueued.kind", &p.kind)
        }
        EventBody::JobClaimed(p) => non_empty("jobClaimed.workerId", &p.worker_id),
        EventBody::JobLog(p) => non_empty("jobLog.line", &p.line),
        EventBody::JobCompleted(_) => Ok(()),
        EventBody::JobFailed(p) => non_empty("jobFailed.message", &p.message),
        EventBody::ApprovalRequired(p) => {
            non_empty("approvalRequired.approvalId", &p.approval_id)?;
            non_empty("approvalRequired.question", &p.question)
        }
        EventBody::Approved(p) => non_empty("approved.approvalId", &p.approval_id),
        EventBody::Denied(p) => non_empty("denied.approvalId", &p.approval_id),
        EventBody::DiffReady(p) => non_empty("diffReady.diff", &p.diff),
        EventBody::Committed(p) => {
            non_empty("committed.commitSha", &p.commit_sha)?;
            non_empty("committed.branch", &p.branch)
        }
        EventBody::Log(p) => {
            non_empty("log.level", &p.level)?;
            non_empty("log.message", &p.message)
        }
        EventBody::Error(p) => {
            non_empty("error.class", &p.class)?;
            non_empty("error.message", &p.message)
        }
        EventBody::DelegateRequest(p) => {
            non_empty("delegateRequest.toAgent", &p.to_agent)?;
            non_empty("delegateRequest.task", &p.task)
        }
        EventBody::DelegateResponse(p) => non_empty("delegateResponse.toAgent", &p.to_agent),
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
