//! The process-wide session table.
//!
//! Structure mirrors the concurrency model: a mutex-guarded map of
//! sessions, each behind its own `Arc<Mutex<..>>`. Lookups clone the
//! `Arc` and release the map immediately, so gameplay never holds the
//! table. Matchmaking is the one operation that must keep the map locked
//! across its whole scan-and-decide span; that exclusivity is what rules
//! out two callers grabbing the same last seat or missing each other's
//! open session.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use turnwise_protocol::{ParticipantId, PlayerIndex, SessionId};
use turnwise_rules::GameKind;

use crate::error::RegistryError;
use crate::session::GameSession;

/// Shared handle to one session. Lock it to play; drop the guard before
/// touching the registry again.
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// How a matchmaking call seated a participant.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The session the participant landed in.
    pub session_id: SessionId,
    /// The seats they were granted.
    pub assigned: BTreeSet<PlayerIndex>,
    /// Whether the session is full after this admission.
    pub full: bool,
    /// True when no open session existed and a fresh one was created.
    pub created: bool,
}

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// The table of every live session in the process.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates and stores a session with `creator` seated at `indices`.
    ///
    /// Id generation and insertion happen under the map lock, so a
    /// freshly issued id can never collide with a concurrent insert.
    pub async fn create_session(
        &self,
        creator: ParticipantId,
        kind: GameKind,
        indices: BTreeSet<PlayerIndex>,
    ) -> (SessionId, SessionHandle) {
        let mut sessions = self.sessions.lock().await;
        let (id, handle) =
            Self::insert_session(&mut sessions, creator, kind, indices);
        tracing::info!(session = %id, %kind, "session created");
        (id, handle)
    }

    /// Looks up a session by id.
    ///
    /// # Errors
    /// [`RegistryError::SessionNotFound`] if no session has this id.
    pub async fn get(
        &self,
        id: &SessionId,
    ) -> Result<SessionHandle, RegistryError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::SessionNotFound(id.clone()))
    }

    /// Removes a session. Returns whether it was present; removing an
    /// already-removed session is a quiet no-op, so the reaper and an
    /// explicit end cannot trip over each other.
    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.lock().await.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "session removed");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// True when no sessions exist.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    // -- Matchmaking ------------------------------------------------------

    /// Seats `participant` in the first open session of `kind`, creating
    /// a fresh session with them as creator when none is open.
    ///
    /// The scan and the admission (or creation) run under one map lock
    /// acquisition. Concurrent calls serialize: whichever runs second
    /// sees the first one's outcome, never a torn in-between.
    pub async fn find_or_create(
        &self,
        participant: ParticipantId,
        kind: GameKind,
    ) -> Placement {
        let mut sessions = self.sessions.lock().await;

        for (id, handle) in sessions.iter() {
            let mut session = handle.lock().await;
            if session.kind() != kind || session.is_full() {
                continue;
            }
            if let Ok(assigned) =
                session.add_participant(participant.clone(), None)
            {
                let full = session.is_full();
                tracing::info!(
                    session = %id,
                    participant = %participant,
                    full,
                    "matched into open session"
                );
                return Placement {
                    session_id: id.clone(),
                    assigned,
                    full,
                    created: false,
                };
            }
        }

        // No open session of this kind: create one.
        let indices = kind.creator_indices();
        let (id, handle) = Self::insert_session(
            &mut sessions,
            participant.clone(),
            kind,
            indices.clone(),
        );
        let full = handle.lock().await.is_full();
        tracing::info!(
            session = %id,
            participant = %participant,
            "no open session, created one"
        );
        Placement {
            session_id: id,
            assigned: indices,
            full,
            created: true,
        }
    }

    fn insert_session(
        sessions: &mut HashMap<SessionId, SessionHandle>,
        creator: ParticipantId,
        kind: GameKind,
        indices: BTreeSet<PlayerIndex>,
    ) -> (SessionId, SessionHandle) {
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        let session = Arc::new(Mutex::new(GameSession::new(
            id.clone(),
            kind,
            creator,
            indices,
        )));
        sessions.insert(id.clone(), Arc::clone(&session));
        (id, session)
    }

    // -- Reaping ----------------------------------------------------------

    /// One reaper cycle over every session: mark slots silent for longer
    /// than `threshold` as disconnected, then drop sessions whose slots
    /// are all disconnected. Removals are deferred until after the scan.
    ///
    /// Returns the ids of the sessions that were removed.
    pub async fn sweep_once(&self, threshold: Duration) -> Vec<SessionId> {
        let mut sessions = self.sessions.lock().await;

        let mut abandoned = Vec::new();
        for (id, handle) in sessions.iter() {
            let mut session = handle.lock().await;
            if session.sweep(threshold) {
                abandoned.push(id.clone());
            }
        }

        for id in &abandoned {
            sessions.remove(id);
            tracing::info!(session = %id, "session abandoned, removed");
        }
        abandoned
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
