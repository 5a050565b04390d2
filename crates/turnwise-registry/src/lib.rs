//! Session registry for Turnwise.
//!
//! This crate owns everything between the rule engines below and the
//! request surface above:
//!
//! - **[`GameSession`]** — one running game: seats, turn pointer,
//!   winner, engine state, and per-participant liveness.
//! - **[`SessionRegistry`]** — the process-wide table of sessions, with
//!   atomic matchmaking.
//! - **[`Reaper`]** — the background sweep that times out silent
//!   participants and removes abandoned sessions.
//!
//! # Concurrency model
//!
//! Two lock levels. The registry map has its own mutex; every session
//! sits behind its own `Arc<Mutex<..>>` ([`SessionHandle`]). Gameplay on
//! one session never contends with gameplay on another, and only
//! structural changes (create, remove, matchmaking, sweeping) take the
//! map lock.
//!
//! Lock order is map → session. Code holding only a session lock never
//! reaches back for the map, so the order cannot invert.

mod config;
mod error;
mod reaper;
mod registry;
mod session;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use reaper::{Reaper, ReaperHandle};
pub use registry::{Placement, SessionHandle, SessionRegistry};
pub use session::{GameSession, PlayerSlot};
