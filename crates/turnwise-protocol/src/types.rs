//! Core identity and state types for Turnwise's wire format.
//!
//! Everything here travels on the wire, so each type pins down an exact
//! JSON shape. Clients key on these shapes; changing one is a protocol
//! break.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a game session.
///
/// 32 lowercase hex characters (128 bits of entropy), generated by the
/// server on session creation. Holding a valid `SessionId` is the only
/// way to address a session: there is no listing endpoint, so an id
/// works like a capability.
///
/// `#[serde(transparent)]` makes this serialize as the bare string, so a
/// session id appears in JSON as `"a3f1..."`, not `{"0": "a3f1..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(random_token())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unique identifier for one participant's seat claim.
///
/// Minted by the server when a participant is admitted to a session
/// (create, join, or matchmaking). It is the credential the client must
/// present to move or poll. Same format and entropy as [`SessionId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(random_token())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A seat number within a session.
///
/// Player indices are small integers assigned from a session's capacity
/// set. The turn pointer is always a `PlayerIndex`; a participant may own
/// several of them (a single client driving both seats of a local game).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerIndex(pub u8);

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a random 32-character lowercase hex string (128 bits).
///
/// Session and participant ids are effectively bearer tokens, so they
/// must be unguessable. 128 bits makes both guessing and accidental
/// collision computationally negligible.
fn random_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Game outcome
// ---------------------------------------------------------------------------

/// The terminal result of a game.
///
/// `None` in a [`SessionSnapshot`] means the game is still in progress;
/// once a snapshot carries `Some(Outcome)`, the session is terminal and
/// every further move is rejected.
///
/// JSON shapes: `{"win": 0}` for a win by seat 0, `"draw"` for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The seat at this index won.
    Win(PlayerIndex),
    /// No seat won and no moves remain.
    Draw,
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A move, in the rule engine's own encoding.
///
/// Opaque to everything except the engine that issued it: the session
/// layer only ever compares an incoming action against the engine's
/// current legal set. For tic-tac-toe these are the cell numbers `"0"`
/// through `"8"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub String);

impl Action {
    /// The action as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time view of one session's game, as sent to clients.
///
/// `state` is produced by the rule engine's serializer and is opaque to
/// the protocol layer — only the matching client knows how to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The seat whose turn it is. Meaningful only while `winner` is `None`.
    pub turn: PlayerIndex,
    /// The terminal outcome, if the game has ended.
    pub winner: Option<Outcome>,
    /// Engine-serialized game state.
    pub state: serde_json::Value,
}

// =========================================================================
// Tests
// =========================================================================
