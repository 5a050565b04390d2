//! Wire protocol for Turnwise.
//!
//! This crate defines the "language" that clients and servers speak:
//!
//! - **Identity** ([`SessionId`], [`ParticipantId`], [`PlayerIndex`]) —
//!   who is playing, and where.
//! - **Requests and responses** ([`Request`], [`Response`]) — the
//!   operations a client can perform and the frames that answer them.
//! - **Errors** ([`ErrorKind`], [`ProtocolError`]) — the stable failure
//!   kinds clients branch on, and what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer is the outermost seam. It knows nothing about game
//! rules, sessions, or transports; it only defines the structures that
//! travel on the wire and how to turn them into bytes.
//!
//! ```text
//! Transport (bytes) → Protocol (Request/Response) → Registry (sessions)
//! ```

mod error;
mod types;
mod wire;

pub use error::ProtocolError;
pub use types::{
    Action, Outcome, ParticipantId, PlayerIndex, SessionId, SessionSnapshot,
};
pub use wire::{ErrorKind, Request, Response};
