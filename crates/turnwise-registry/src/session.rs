//! Session types: one running game and the seats inside it.
//!
//! A [`GameSession`] is the single authority for its game. Every rule
//! the request surface enforces about an individual game lives here:
//! who may move, when moves are accepted, what happens when the game
//! ends, and which participants still count as present.
//!
//! A participant's lifecycle within a session:
//!
//! ```text
//! admitted ──(move / poll)──→ refreshed ──(silence > threshold)──→ timed out
//!     │                                                                │
//!     └───────────────(explicit leave)──→ disconnected ←───────────────┘
//! ```
//!
//! Disconnection is one-way. A departed participant's seats stay claimed
//! so the game cannot be rejoined out from under the other side; the
//! session itself is removed once every slot is disconnected.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::time::{Duration, Instant};

use turnwise_protocol::{
    Action, Outcome, ParticipantId, PlayerIndex, SessionId, SessionSnapshot,
};
use turnwise_rules::{GameKind, GameState, RulesError};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// PlayerSlot
// ---------------------------------------------------------------------------

/// One participant's claim on a session: which seats they own, when they
/// were last heard from, and whether they are gone.
#[derive(Debug, Clone)]
pub struct PlayerSlot {
    /// The seats this participant plays. Usually one; a local game's
    /// creator holds all of them.
    assigned_indices: BTreeSet<PlayerIndex>,

    /// Last successful move or poll. The reaper compares this against
    /// the staleness threshold.
    last_seen: Instant,

    /// Whether this participant has left or timed out. Never reset.
    disconnected: bool,
}

impl PlayerSlot {
    fn new(assigned_indices: BTreeSet<PlayerIndex>) -> Self {
        Self {
            assigned_indices,
            last_seen: Instant::now(),
            disconnected: false,
        }
    }

    /// The seats this participant owns.
    pub fn assigned_indices(&self) -> &BTreeSet<PlayerIndex> {
        &self.assigned_indices
    }

    /// Whether this participant has left or timed out.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Time since this participant was last heard from.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// One running game: engine state plus the seat bookkeeping around it.
///
/// The session does not know it is shared. Callers wrap it in the
/// registry's per-session mutex; within these methods everything is
/// plain single-threaded Rust, and every mutation either fully happens
/// or (on any error) does not happen at all.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    kind: GameKind,
    /// The fixed seat set this session was created with.
    capacity: BTreeSet<PlayerIndex>,
    /// Participants by id. Seats claimed by these slots never overlap.
    slots: HashMap<ParticipantId, PlayerSlot>,
    /// The seat that moves next. Frozen once `winner` is set.
    turn: PlayerIndex,
    /// Terminal outcome. `Some` is permanent.
    winner: Option<Outcome>,
    state: GameState,
}

impl GameSession {
    /// Creates a session of the given kind with the creator already
    /// seated at `creator_indices`.
    pub fn new(
        id: SessionId,
        kind: GameKind,
        creator: ParticipantId,
        creator_indices: BTreeSet<PlayerIndex>,
    ) -> Self {
        let capacity = kind.capacity();
        let turn = capacity.first().copied().unwrap_or(PlayerIndex(0));
        let state = kind.initial_state();

        let mut slots = HashMap::new();
        slots.insert(creator, PlayerSlot::new(creator_indices));

        Self {
            id,
            kind,
            capacity,
            slots,
            turn,
            winner: None,
            state,
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// The seat whose turn it is.
    pub fn turn(&self) -> PlayerIndex {
        self.turn
    }

    /// The terminal outcome, if the game has ended.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// The slot for one participant, if they are in this session.
    pub fn slot(&self, participant: &ParticipantId) -> Option<&PlayerSlot> {
        self.slots.get(participant)
    }

    /// Number of participants, connected or not.
    pub fn participant_count(&self) -> usize {
        self.slots.len()
    }

    /// True when every seat in the capacity is claimed.
    pub fn is_full(&self) -> bool {
        self.claimed_indices() == self.capacity
    }

    /// True when every participant has left or timed out.
    pub fn all_disconnected(&self) -> bool {
        self.slots.values().all(|slot| slot.disconnected)
    }

    fn claimed_indices(&self) -> BTreeSet<PlayerIndex> {
        self.slots
            .values()
            .flat_map(|slot| slot.assigned_indices.iter().copied())
            .collect()
    }

    // -- Seating ----------------------------------------------------------

    /// Admits a participant, granting `requested` seats or the lowest
    /// free one. Returns the seats actually granted.
    ///
    /// # Errors
    /// [`RegistryError::GameFull`] if no seat is free, or if any
    /// requested seat is outside the free set.
    pub fn add_participant(
        &mut self,
        participant: ParticipantId,
        requested: Option<BTreeSet<PlayerIndex>>,
    ) -> Result<BTreeSet<PlayerIndex>, RegistryError> {
        let claimed = self.claimed_indices();
        let free: BTreeSet<PlayerIndex> =
            self.capacity.difference(&claimed).copied().collect();

        if free.is_empty() {
            return Err(RegistryError::GameFull(self.id.clone()));
        }

        let granted = match requested {
            Some(indices) => {
                if indices.is_empty() || !indices.is_subset(&free) {
                    return Err(RegistryError::GameFull(self.id.clone()));
                }
                indices
            }
            None => match free.first() {
                Some(&lowest) => BTreeSet::from([lowest]),
                None => return Err(RegistryError::GameFull(self.id.clone())),
            },
        };

        self.slots
            .insert(participant, PlayerSlot::new(granted.clone()));
        Ok(granted)
    }

    // -- Gameplay ---------------------------------------------------------

    /// Validates and applies one move for the seat the turn is on.
    ///
    /// Checks run in a fixed order: the participant must be in the
    /// session, the session must be full, the game must not be over,
    /// the participant must own the turn seat, and the action must be
    /// in the engine's legal set. A failed check mutates nothing.
    ///
    /// On success the engine state advances, the winner is recorded if
    /// the move ended the game, the turn moves to the next seat (unless
    /// terminal), and the mover's liveness is refreshed.
    pub fn submit_move(
        &mut self,
        participant: &ParticipantId,
        action: &Action,
    ) -> Result<(), RegistryError> {
        let slot = self.slots.get(participant).ok_or_else(|| {
            RegistryError::ParticipantNotFound(participant.clone())
        })?;

        if !self.is_full() {
            return Err(RegistryError::GameNotFull(self.id.clone()));
        }
        if self.winner.is_some() {
            return Err(RegistryError::GameOver(self.id.clone()));
        }
        if !slot.assigned_indices.contains(&self.turn) {
            return Err(RegistryError::NotYourTurn { turn: self.turn });
        }
        if !self.state.legal_actions(self.turn).contains(action) {
            return Err(RulesError::IllegalAction(action.clone()).into());
        }

        let (next_state, outcome) = self.state.apply(action)?;
        self.state = next_state;
        self.winner = outcome;
        if self.winner.is_none() {
            self.turn = self.next_index(self.turn);
        }
        if let Some(slot) = self.slots.get_mut(participant) {
            slot.last_seen = Instant::now();
        }
        Ok(())
    }

    /// The seat after `current`, in ascending cyclic order over the
    /// capacity.
    fn next_index(&self, current: PlayerIndex) -> PlayerIndex {
        self.capacity
            .range((Bound::Excluded(current), Bound::Unbounded))
            .next()
            .or_else(|| self.capacity.first())
            .copied()
            .unwrap_or(current)
    }

    // -- Liveness ---------------------------------------------------------

    /// Refreshes a participant's liveness without touching the game.
    ///
    /// # Errors
    /// [`RegistryError::ParticipantNotFound`] if they are not in this
    /// session.
    pub fn touch(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<(), RegistryError> {
        let slot = self.slots.get_mut(participant).ok_or_else(|| {
            RegistryError::ParticipantNotFound(participant.clone())
        })?;
        slot.last_seen = Instant::now();
        Ok(())
    }

    /// Marks a participant as gone. Idempotent; never reversed.
    ///
    /// # Errors
    /// [`RegistryError::ParticipantNotFound`] if they are not in this
    /// session.
    pub fn mark_disconnected(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<(), RegistryError> {
        let slot = self.slots.get_mut(participant).ok_or_else(|| {
            RegistryError::ParticipantNotFound(participant.clone())
        })?;
        slot.disconnected = true;
        Ok(())
    }

    /// One liveness pass: marks every slot silent for longer than
    /// `threshold` as disconnected. Returns true when every slot is now
    /// disconnected, i.e. the session is abandoned.
    pub fn sweep(&mut self, threshold: Duration) -> bool {
        for (participant, slot) in &mut self.slots {
            if !slot.disconnected && slot.last_seen.elapsed() > threshold {
                slot.disconnected = true;
                tracing::info!(
                    session = %self.id,
                    participant = %participant,
                    "participant timed out"
                );
            }
        }
        self.all_disconnected()
    }

    // -- Snapshot ---------------------------------------------------------

    /// The client-facing view of the game right now.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn: self.turn,
            winner: self.winner,
            state: self.state.serialize(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
