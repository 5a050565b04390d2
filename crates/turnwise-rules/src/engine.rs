//! The rule engine contract and the dispatch over registered games.
//!
//! The session layer drives games through two types defined here:
//! [`GameKind`] picks which game and seat layout a new session gets, and
//! [`GameState`] is the state it then holds. Adding a game means adding
//! a `GameKind` arm, a `GameState` variant, and a [`Rules`] impl; the
//! session layer does not change.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use turnwise_protocol::{Action, Outcome, PlayerIndex};

use crate::error::RulesError;
use crate::tictactoe::{self, Board, TicTacToe};

// ---------------------------------------------------------------------------
// Rules — the per-game contract
// ---------------------------------------------------------------------------

/// The contract a concrete game implements.
///
/// All methods are pure: `apply` returns a new state instead of mutating,
/// so a rejected move can never leave a half-updated game behind.
///
/// The determinism requirement is load-bearing. The session layer
/// validates an incoming action by membership in `legal_actions`, then
/// applies it; if either call could disagree with itself between those
/// two steps, validated moves could still fail.
pub trait Rules {
    /// The game's full state. Opaque above this crate.
    type State: Clone + fmt::Debug + Send;

    /// Creates the starting state for a session with the given seats.
    fn initial_state(capacity: &BTreeSet<PlayerIndex>) -> Self::State;

    /// Every action `player` may take right now.
    ///
    /// Empty when it is not their turn or the game is terminal. The
    /// returned order is deterministic for a given state.
    fn legal_actions(state: &Self::State, player: PlayerIndex) -> Vec<Action>;

    /// Applies one action, returning the next state and the terminal
    /// outcome if this action ended the game.
    fn apply(
        state: &Self::State,
        action: &Action,
    ) -> Result<(Self::State, Option<Outcome>), RulesError>;

    /// Renders the state as client-facing JSON.
    fn serialize(state: &Self::State) -> serde_json::Value;
}

// ---------------------------------------------------------------------------
// GameKind — session modes
// ---------------------------------------------------------------------------

/// The game types a client can request when creating a session.
///
/// Both kinds currently play tic-tac-toe; they differ in how the
/// creator is seated. A `local` session hands every seat to the creator
/// (one client drives both sides of the board), while an `online`
/// session seats the creator at index 0 and leaves the rest open for
/// joiners or matchmaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// All seats belong to the creator.
    Local,
    /// Creator takes the first seat; the rest stay open.
    Online,
}

impl GameKind {
    /// The fixed seat set sessions of this kind are created with.
    pub fn capacity(self) -> BTreeSet<PlayerIndex> {
        match self {
            GameKind::Local | GameKind::Online => {
                (0..tictactoe::PLAYERS).map(PlayerIndex).collect()
            }
        }
    }

    /// The seats the creating participant is given.
    pub fn creator_indices(self) -> BTreeSet<PlayerIndex> {
        match self {
            GameKind::Local => self.capacity(),
            GameKind::Online => [PlayerIndex(0)].into(),
        }
    }

    /// The starting game state for a fresh session of this kind.
    pub fn initial_state(self) -> GameState {
        match self {
            GameKind::Local | GameKind::Online => {
                GameState::TicTacToe(TicTacToe::initial_state(&self.capacity()))
            }
        }
    }
}

impl FromStr for GameKind {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(GameKind::Local),
            "online" => Ok(GameKind::Online),
            other => Err(RulesError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Local => f.write_str("local"),
            GameKind::Online => f.write_str("online"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameState — dispatch over registered games
// ---------------------------------------------------------------------------

/// The state of some registered game.
///
/// A closed union rather than a trait object: the set of games a server
/// build supports is known at compile time, and matching here keeps the
/// engine calls free of downcasts.
#[derive(Debug, Clone)]
pub enum GameState {
    TicTacToe(Board),
}

impl GameState {
    /// Every action `player` may take right now.
    pub fn legal_actions(&self, player: PlayerIndex) -> Vec<Action> {
        match self {
            GameState::TicTacToe(board) => {
                TicTacToe::legal_actions(board, player)
            }
        }
    }

    /// Applies one action, returning the next state and the outcome if
    /// this action ended the game.
    pub fn apply(
        &self,
        action: &Action,
    ) -> Result<(GameState, Option<Outcome>), RulesError> {
        match self {
            GameState::TicTacToe(board) => TicTacToe::apply(board, action)
                .map(|(next, outcome)| (GameState::TicTacToe(next), outcome)),
        }
    }

    /// Renders the state as client-facing JSON.
    pub fn serialize(&self) -> serde_json::Value {
        match self {
            GameState::TicTacToe(board) => TicTacToe::serialize(board),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
