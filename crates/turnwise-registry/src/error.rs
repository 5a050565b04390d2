//! Error types for the registry layer.

use turnwise_protocol::{ErrorKind, ParticipantId, PlayerIndex, SessionId};
use turnwise_rules::RulesError;

/// Errors that can occur while operating on sessions and the registry.
///
/// Each variant corresponds to exactly one wire-level [`ErrorKind`], via
/// [`kind`](RegistryError::kind). The split exists because the wire kind
/// is a stable client contract while these variants carry the richer
/// context the server wants in logs.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No session with this id.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The session has no slot for this participant.
    #[error("participant {0} not found in session")]
    ParticipantNotFound(ParticipantId),

    /// Every seat in the session's capacity is already claimed.
    #[error("session {0} is already full")]
    GameFull(SessionId),

    /// Moves are not accepted until every seat is claimed.
    #[error("session {0} is not full yet")]
    GameNotFull(SessionId),

    /// The acting participant does not own the seat whose turn it is.
    #[error("it is not your turn (turn is on seat {turn})")]
    NotYourTurn { turn: PlayerIndex },

    /// The session already has a terminal outcome.
    #[error("session {0} is over")]
    GameOver(SessionId),

    /// The rule engine rejected the request: an unknown game type, or an
    /// action outside the legal set.
    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl RegistryError {
    /// The stable wire-level kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionNotFound(_) | Self::ParticipantNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::GameFull(_) => ErrorKind::GameFull,
            Self::GameNotFull(_) => ErrorKind::GameNotFull,
            Self::NotYourTurn { .. } => ErrorKind::NotYourTurn,
            Self::GameOver(_) => ErrorKind::GameOver,
            Self::Rules(RulesError::UnknownKind(_)) => ErrorKind::UnknownGameType,
            Self::Rules(RulesError::IllegalAction(_)) => ErrorKind::IllegalAction,
        }
    }
}
