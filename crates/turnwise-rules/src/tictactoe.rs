//! Tic-tac-toe, the built-in rule engine.
//!
//! Cells are numbered 0 through 8, left to right, top to bottom:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! Seat 0 plays X and moves first; seat 1 plays O. Actions are the cell
//! numbers as strings (`"0"` .. `"8"`). Whose turn it is falls out of
//! the mark counts, so the board alone is the whole state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::json;
use turnwise_protocol::{Action, Outcome, PlayerIndex};

use crate::engine::Rules;
use crate::error::RulesError;

/// Number of seats in a tic-tac-toe match.
pub const PLAYERS: u8 = 2;

/// The eight winning lines: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

// ---------------------------------------------------------------------------
// Marks and the board
// ---------------------------------------------------------------------------

/// A placed mark. Serializes lowercase, so a cell on the wire is
/// `null`, `"x"`, or `"o"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The seat that plays this mark.
    pub fn player(self) -> PlayerIndex {
        match self {
            Mark::X => PlayerIndex(0),
            Mark::O => PlayerIndex(1),
        }
    }
}

/// The 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    /// The mark that moves next. X opens, and marks strictly alternate,
    /// so parity of the placed count decides.
    fn to_move(&self) -> Mark {
        let placed = self.cells.iter().filter(|c| c.is_some()).count();
        if placed % 2 == 0 { Mark::X } else { Mark::O }
    }

    /// The terminal outcome, if any: a completed line wins for that
    /// mark's seat; a full board with no line is a draw.
    fn outcome(&self) -> Option<Outcome> {
        for line in LINES {
            if let Some(mark) = self.cells[line[0]] {
                if self.cells[line[1]] == Some(mark)
                    && self.cells[line[2]] == Some(mark)
                {
                    return Some(Outcome::Win(mark.player()));
                }
            }
        }
        if self.cells.iter().all(|c| c.is_some()) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Rules implementation
// ---------------------------------------------------------------------------

/// The tic-tac-toe engine.
pub struct TicTacToe;

impl Rules for TicTacToe {
    type State = Board;

    fn initial_state(_capacity: &BTreeSet<PlayerIndex>) -> Board {
        Board { cells: [None; 9] }
    }

    fn legal_actions(state: &Board, player: PlayerIndex) -> Vec<Action> {
        if state.outcome().is_some() || state.to_move().player() != player {
            return Vec::new();
        }
        state
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Action(i.to_string()))
            .collect()
    }

    fn apply(
        state: &Board,
        action: &Action,
    ) -> Result<(Board, Option<Outcome>), RulesError> {
        let cell: usize = action
            .as_str()
            .parse()
            .map_err(|_| RulesError::IllegalAction(action.clone()))?;

        if cell >= 9 || state.cells[cell].is_some() || state.outcome().is_some()
        {
            return Err(RulesError::IllegalAction(action.clone()));
        }

        let mut next = state.clone();
        next.cells[cell] = Some(state.to_move());
        let outcome = next.outcome();
        Ok((next, outcome))
    }

    fn serialize(state: &Board) -> serde_json::Value {
        json!({
            "board": state.cells,
            "to_move": state.to_move(),
        })
    }
}

// =========================================================================
// Tests
// =========================================================================
