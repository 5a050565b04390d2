//! The request/response surface.
//!
//! Every client interaction is one [`Request`] frame answered by exactly
//! one [`Response`] frame. Both enums are internally tagged
//! (`#[serde(tag = "type")]`), so a create request looks like:
//!
//! ```json
//! { "type": "CreateSession", "game_type": "online" }
//! ```
//!
//! and the answering frame like:
//!
//! ```json
//! { "type": "Admitted", "session_id": "a3f1...", "participant_id": "9c0e...",
//!   "assigned_indices": [0], "full": false }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{Action, ParticipantId, PlayerIndex, SessionId, SessionSnapshot};

// ---------------------------------------------------------------------------
// Request — client → server
// ---------------------------------------------------------------------------

/// A client request. One request yields exactly one [`Response`].
///
/// `game_type` travels as a plain string and is validated server-side, so
/// an unknown type is a well-formed request that fails with
/// [`ErrorKind::UnknownGameType`] rather than a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Liveness probe. Always answered with [`Response::Pong`].
    Ping,

    /// Create a session and claim its creator seats.
    CreateSession { game_type: String },

    /// Claim a free seat in a specific session.
    JoinSession { session_id: SessionId },

    /// Matchmake: join some open session, or create one if none exists.
    FindSession,

    /// Submit a move for whichever seat the turn pointer is on.
    SubmitMove {
        session_id: SessionId,
        participant_id: ParticipantId,
        action: Action,
    },

    /// Poll the current game state. Also refreshes the caller's liveness.
    GetState {
        session_id: SessionId,
        participant_id: ParticipantId,
    },

    /// Remove a session outright, for every participant.
    EndSession { session_id: SessionId },

    /// Withdraw from a session without destroying it for the others.
    LeaveSession {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
}

// ---------------------------------------------------------------------------
// Response — server → client
// ---------------------------------------------------------------------------

/// A server response frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Answer to [`Request::Ping`].
    Pong { message: String },

    /// The caller now holds a seat. Sent for create, join, and find.
    Admitted {
        session_id: SessionId,
        participant_id: ParticipantId,
        assigned_indices: Vec<PlayerIndex>,
        full: bool,
    },

    /// Current game state. Sent for moves and polls.
    SessionState {
        session_id: SessionId,
        full: bool,
        snapshot: SessionSnapshot,
    },

    /// The operation succeeded and has no state to report.
    Acknowledged { message: String },

    /// The operation failed. `kind` is stable and machine-checkable;
    /// `message` is for humans and may change between releases.
    Error { kind: ErrorKind, message: String },
}

// ---------------------------------------------------------------------------
// ErrorKind — stable failure kinds
// ---------------------------------------------------------------------------

/// The distinct, machine-checkable failure kinds of the request surface.
///
/// Clients branch on these, so each kind keeps its meaning and its
/// snake_case wire name across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No such session, or no such participant within the session.
    NotFound,
    /// The requested game type names no known rule engine.
    UnknownGameType,
    /// Every seat in the session is already claimed.
    GameFull,
    /// Moves are not accepted until every seat is claimed.
    GameNotFull,
    /// The acting participant does not own the seat whose turn it is.
    NotYourTurn,
    /// The session already has a terminal outcome.
    GameOver,
    /// The move is not in the current legal set.
    IllegalAction,
    /// The frame could not be decoded as a request.
    BadRequest,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl Request {
    /// Decodes a request from raw frame bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    /// Encodes this request to frame bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}

impl Response {
    /// Decodes a response from raw frame bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    /// Encodes this response to frame bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}

// =========================================================================
// Tests
// =========================================================================
