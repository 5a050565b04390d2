//! Game rules for Turnwise.
//!
//! This crate is the pure-logic layer: it knows how to play games, and
//! nothing else. No clocks, no locks, no sockets.
//!
//! - **[`Rules`]** — the contract a concrete game implements: produce an
//!   initial state, enumerate legal actions, apply an action, serialize
//!   for clients.
//! - **[`GameKind`]** — the session modes a client can ask for, and the
//!   seat layout each one implies.
//! - **[`GameState`]** — a closed union over the states of every
//!   registered game, so the session layer can hold "some game" without
//!   caring which.
//! - **[`tictactoe`]** — the built-in game.
//!
//! Everything here is deterministic: the same state and action always
//! produce the same next state, which is what lets the session layer
//! validate moves by membership in the legal set.

mod engine;
mod error;
pub mod tictactoe;

pub use engine::{GameKind, GameState, Rules};
pub use error::RulesError;
