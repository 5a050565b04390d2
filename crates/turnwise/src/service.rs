//! Transport-independent request handling.
//!
//! [`GameService`] is the seam between the wire and the registry: it
//! owns no sockets and speaks only [`Request`] in, [`Response`] out.
//! Anything that can frame bytes can sit in front of it, the bundled
//! WebSocket handler being one such front.

use std::sync::Arc;

use turnwise_protocol::{
    Action, ParticipantId, PlayerIndex, Request, Response, SessionId, SessionSnapshot,
};
use turnwise_registry::{RegistryError, SessionRegistry};
use turnwise_rules::GameKind;

/// The result of placing a participant into a session, however they
/// got there (created it, joined it by id, or was matched into it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub assigned_indices: Vec<PlayerIndex>,
    pub full: bool,
}

/// Stateless facade over the session registry.
///
/// Each method mints ids where needed, takes the locks it needs, and
/// returns either a domain value or a [`RegistryError`]. The wire
/// mapping lives in [`GameService::handle`].
pub struct GameService {
    registry: Arc<SessionRegistry>,
}

impl GameService {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this service fronts. Exposed so callers embedding
    /// the service can drive sweeps or inspect sessions directly.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Creates a fresh session of the named game type and seats the
    /// caller in it. For `local` games the creator takes every seat.
    pub async fn create_session(&self, game_type: &str) -> Result<Admission, RegistryError> {
        let kind: GameKind = game_type.parse()?;
        let participant_id = ParticipantId::generate();
        let indices = kind.creator_indices();

        let (session_id, handle) = self
            .registry
            .create_session(participant_id.clone(), kind, indices.clone())
            .await;
        let full = handle.lock().await.is_full();

        tracing::debug!(session = %session_id, participant = %participant_id, %kind, "created session");
        Ok(Admission {
            session_id,
            participant_id,
            assigned_indices: indices.into_iter().collect(),
            full,
        })
    }

    /// Seats a new participant in an existing session, granting the
    /// lowest free player index.
    pub async fn join_session(&self, session_id: &SessionId) -> Result<Admission, RegistryError> {
        let handle = self.registry.get(session_id).await?;
        let participant_id = ParticipantId::generate();

        let mut session = handle.lock().await;
        let granted = session.add_participant(participant_id.clone(), None)?;
        let full = session.is_full();
        drop(session);

        tracing::debug!(session = %session_id, participant = %participant_id, "joined session");
        Ok(Admission {
            session_id: session_id.clone(),
            participant_id,
            assigned_indices: granted.into_iter().collect(),
            full,
        })
    }

    /// Puts the caller into some open `online` session, creating one
    /// if none has a free seat.
    pub async fn find_session(&self) -> Result<Admission, RegistryError> {
        let participant_id = ParticipantId::generate();
        let placement = self
            .registry
            .find_or_create(participant_id.clone(), GameKind::Online)
            .await;

        tracing::debug!(
            session = %placement.session_id,
            participant = %participant_id,
            created = placement.created,
            "matchmade"
        );
        Ok(Admission {
            session_id: placement.session_id,
            participant_id,
            assigned_indices: placement.assigned.into_iter().collect(),
            full: placement.full,
        })
    }

    /// Applies one move and reports the resulting position.
    pub async fn submit_move(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
        action: &Action,
    ) -> Result<(bool, SessionSnapshot), RegistryError> {
        let handle = self.registry.get(session_id).await?;
        let mut session = handle.lock().await;
        session.submit_move(participant_id, action)?;

        tracing::debug!(session = %session_id, participant = %participant_id, %action, "move applied");
        Ok((session.is_full(), session.snapshot()))
    }

    /// Reads the current position. Counts as a sign of life for the
    /// polling participant.
    pub async fn get_state(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
    ) -> Result<(bool, SessionSnapshot), RegistryError> {
        let handle = self.registry.get(session_id).await?;
        let mut session = handle.lock().await;
        session.touch(participant_id)?;
        Ok((session.is_full(), session.snapshot()))
    }

    /// Tears the session down for everyone in it.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<(), RegistryError> {
        if self.registry.remove(session_id).await {
            Ok(())
        } else {
            Err(RegistryError::SessionNotFound(session_id.clone()))
        }
    }

    /// Marks the caller as gone for good. The session itself stays up
    /// until everyone has left and the reaper collects it.
    pub async fn leave_session(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
    ) -> Result<(), RegistryError> {
        let handle = self.registry.get(session_id).await?;
        let mut session = handle.lock().await;
        session.mark_disconnected(participant_id)?;

        tracing::info!(session = %session_id, participant = %participant_id, "participant left");
        Ok(())
    }

    /// Maps one decoded request to its response. Never fails: every
    /// domain error becomes a [`Response::Error`] with the matching
    /// kind, so the connection can carry on.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong {
                message: "server is running".to_string(),
            },
            Request::CreateSession { game_type } => {
                match self.create_session(&game_type).await {
                    Ok(admission) => admitted(admission),
                    Err(err) => error_response(err),
                }
            }
            Request::JoinSession { session_id } => match self.join_session(&session_id).await {
                Ok(admission) => admitted(admission),
                Err(err) => error_response(err),
            },
            Request::FindSession => match self.find_session().await {
                Ok(admission) => admitted(admission),
                Err(err) => error_response(err),
            },
            Request::SubmitMove {
                session_id,
                participant_id,
                action,
            } => match self.submit_move(&session_id, &participant_id, &action).await {
                Ok((full, snapshot)) => Response::SessionState {
                    session_id,
                    full,
                    snapshot,
                },
                Err(err) => error_response(err),
            },
            Request::GetState {
                session_id,
                participant_id,
            } => match self.get_state(&session_id, &participant_id).await {
                Ok((full, snapshot)) => Response::SessionState {
                    session_id,
                    full,
                    snapshot,
                },
                Err(err) => error_response(err),
            },
            Request::EndSession { session_id } => match self.end_session(&session_id).await {
                Ok(()) => Response::Acknowledged {
                    message: "game successfully ended".to_string(),
                },
                Err(err) => error_response(err),
            },
            Request::LeaveSession {
                session_id,
                participant_id,
            } => match self.leave_session(&session_id, &participant_id).await {
                Ok(()) => Response::Acknowledged {
                    message: "successfully left the game".to_string(),
                },
                Err(err) => error_response(err),
            },
        }
    }
}

fn admitted(admission: Admission) -> Response {
    Response::Admitted {
        session_id: admission.session_id,
        participant_id: admission.participant_id,
        assigned_indices: admission.assigned_indices,
        full: admission.full,
    }
}

fn error_response(err: RegistryError) -> Response {
    tracing::debug!(kind = ?err.kind(), error = %err, "request failed");
    Response::Error {
        kind: err.kind(),
        message: err.to_string(),
    }
}
