// SPDX-License-Identifier: MIT

//! The PushPals Session/Event Server: command ingest, three queue-manager
//! endpoints, a session-scoped event log with SSE/WS tails, three watchdogs,
//! and read-only supervision — assembled behind one `axum::Router` in
//! [`transport`].

pub mod config;
pub mod error;
pub mod ingest;
pub mod session_hub;
pub mod supervisor;
pub mod transport;
pub mod watchdogs;
