//! Kaiwa chat relay server.
//!
//! Layers, from the inside out: `domain` (state and rules), `usecase`
//! (per-intent orchestration and the coordinator), `infrastructure`
//! (in-memory repository, WebSocket pusher, wire DTOs) and `ui` (axum server).

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
