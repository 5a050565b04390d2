//! # Turnwise
//!
//! WebSocket server for turn-based game sessions.
//!
//! Turnwise keeps a registry of live game sessions, seats participants
//! in them (by explicit join or by matchmaking), validates and applies
//! their moves through a pluggable rule engine, and reaps sessions
//! everyone has abandoned. The request surface is transport-agnostic;
//! this crate bundles a WebSocket front for it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turnwise::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let server = ServerBuilder::new().bind("127.0.0.1:8080").build().await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;
mod service;

pub use error::ServerError;
pub use server::{Server, ServerBuilder, ServerHandle};
pub use service::{Admission, GameService};

/// Everything needed to run or embed a server.
pub mod prelude {
    pub use crate::{Admission, GameService, Server, ServerBuilder, ServerError, ServerHandle};
    pub use turnwise_protocol::{
        Action, ErrorKind, Outcome, ParticipantId, PlayerIndex, Request, Response, SessionId,
        SessionSnapshot,
    };
    pub use turnwise_registry::{RegistryConfig, RegistryError, SessionRegistry};
    pub use turnwise_rules::GameKind;
}
