// SPDX-License-Identifier: MIT

//! HTTP/WS/SSE wire contract for the Session/Event Server.
//!
//! Unlike an IPC framing layer, the Transport Layer speaks plain JSON over
//! HTTP, WebSocket, and SSE (spec.md §4.6); this crate owns the request and
//! response body shapes for every endpoint, the error envelope rendering for
//! the §7 taxonomy, and the distinct SSE/WS frame encodings the spec
//! mandates be kept separate (spec.md §9 "Open questions").

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod completions;
pub mod error;
pub mod jobs;
pub mod requests;
pub mod sessions;
pub mod sse;
pub mod system;
pub mod workers;

pub use error::{ErrorBody, ProtocolError};
pub use sse::format_sse_event;
