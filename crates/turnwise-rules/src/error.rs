//! Error types for the rules layer.

use turnwise_protocol::Action;

/// Errors that can occur while resolving a game type or applying a move.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The requested game type names no known rule engine.
    #[error("unknown game type: {0}")]
    UnknownKind(String),

    /// The action is not in the current legal set.
    #[error("action {0} is not a legal action")]
    IllegalAction(Action),
}
