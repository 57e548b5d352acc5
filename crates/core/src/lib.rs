// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pushpals-core: domain types for the PushPals Session/Event Server —
//! sessions, the event envelope, the three queue rows (request, job,
//! completion), the worker registry row, per-job log lines, and the
//! shared error-class taxonomy.

pub mod macros;

pub mod clock;
pub mod completion;
pub mod error;
pub mod event;
pub mod id;
pub mod job;
pub mod logline;
pub mod priority;
pub mod queue_item;
pub mod request;
pub mod session;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use completion::{Completion, CompletionId};
pub use error::ErrorClass;
pub use event::{Event, EventBody, EventId, EventKind, PositionedEvent, PROTOCOL_VERSION};
pub use event::{
    AgentStatusPayload, ApprovalRequiredPayload, ApprovedPayload, AssistantMessagePayload,
    CommittedPayload, DelegateRequestPayload, DelegateResponsePayload, DeniedPayload,
    DiffReadyPayload, ErrorPayload, JobClaimedPayload, JobCompletedPayload, JobEnqueuedPayload,
    JobFailedPayload, JobLogPayload, LogPayload, MessagePayload, TaskCompletedPayload,
    TaskCreatedPayload, TaskFailedPayload, TaskProgressPayload, TaskStartedPayload,
};
pub use id::{short, IdBuf};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{Job, JobId};
pub use logline::{LogLine, LogStream};
pub use priority::Priority;
pub use queue_item::{CompletionStatus, QueueItemStatus};
#[cfg(any(test, feature = "test-support"))]
pub use request::RequestBuilder;
pub use request::{Request, RequestId};
pub use session::{Session, SessionId};
pub use worker::{WorkerId, WorkerPresence, WorkerRecord, WorkerStatus};
