//! End-to-end tests over real WebSocket connections.
//!
//! Each test starts a server on an OS-assigned port, connects one or
//! more clients, and talks the actual frame protocol.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use turnwise::prelude::*;

// -- Helpers ---------------------------------------------------------------

type ClientWs = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Starts a server on an ephemeral port and returns its ws:// URL.
/// The accept loop runs detached for the rest of the test.
async fn start_server() -> String {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        server.run().await.unwrap();
    });
    // Give the accept loop a moment to come up.
    sleep(Duration::from_millis(10)).await;
    format!("ws://{addr}")
}

async fn connect(url: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    ws
}

async fn send(ws: &mut ClientWs, request: Request) {
    let bytes = request.to_vec().unwrap();
    ws.send(Message::Binary(bytes.into())).await.unwrap();
}

async fn recv(ws: &mut ClientWs) -> Response {
    match ws.next().await.unwrap().unwrap() {
        Message::Binary(data) => Response::from_slice(&data).unwrap(),
        other => panic!("expected a binary frame, got {other:?}"),
    }
}

async fn request(ws: &mut ClientWs, req: Request) -> Response {
    send(ws, req).await;
    recv(ws).await
}

/// Unwraps an admission response into (session, participant, seats).
fn admitted(response: Response) -> (SessionId, ParticipantId, Vec<PlayerIndex>) {
    match response {
        Response::Admitted {
            session_id,
            participant_id,
            assigned_indices,
            ..
        } => (session_id, participant_id, assigned_indices),
        other => panic!("expected admission, got {other:?}"),
    }
}

fn error_kind(response: Response) -> ErrorKind {
    match response {
        Response::Error { kind, .. } => kind,
        other => panic!("expected error response, got {other:?}"),
    }
}

// ===========================================================================
// Liveness
// ===========================================================================

#[tokio::test]
async fn test_ping_round_trip() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    let response = request(&mut ws, Request::Ping).await;
    assert_eq!(
        response,
        Response::Pong {
            message: "server is running".to_string()
        }
    );
}

// ===========================================================================
// A full two-client game
// ===========================================================================

#[tokio::test]
async fn test_create_join_and_play_across_connections() {
    let url = start_server().await;
    let mut alice = connect(&url).await;
    let mut bob = connect(&url).await;

    let (session, alice_id, alice_seats) = admitted(
        request(
            &mut alice,
            Request::CreateSession {
                game_type: "online".to_string(),
            },
        )
        .await,
    );
    assert_eq!(alice_seats, vec![PlayerIndex(0)]);

    let (_, bob_id, bob_seats) = admitted(
        request(
            &mut bob,
            Request::JoinSession {
                session_id: session.clone(),
            },
        )
        .await,
    );
    assert_eq!(bob_seats, vec![PlayerIndex(1)]);

    // Alice opens; the move shows up in the shared state.
    let response = request(
        &mut alice,
        Request::SubmitMove {
            session_id: session.clone(),
            participant_id: alice_id.clone(),
            action: "0".into(),
        },
    )
    .await;
    match response {
        Response::SessionState { snapshot, full, .. } => {
            assert!(full);
            assert_eq!(snapshot.turn, PlayerIndex(1));
            assert_eq!(snapshot.state["board"][0], "x");
        }
        other => panic!("expected session state, got {other:?}"),
    }

    // Bob cannot take an occupied cell.
    let response = request(
        &mut bob,
        Request::SubmitMove {
            session_id: session.clone(),
            participant_id: bob_id.clone(),
            action: "0".into(),
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::IllegalAction);

    // A free cell works, then it is Alice's turn again.
    let response = request(
        &mut bob,
        Request::SubmitMove {
            session_id: session.clone(),
            participant_id: bob_id.clone(),
            action: "4".into(),
        },
    )
    .await;
    match response {
        Response::SessionState { snapshot, .. } => {
            assert_eq!(snapshot.turn, PlayerIndex(0));
            assert_eq!(snapshot.state["board"][4], "o");
        }
        other => panic!("expected session state, got {other:?}"),
    }

    // Bob moving again is out of turn.
    let response = request(
        &mut bob,
        Request::SubmitMove {
            session_id: session,
            participant_id: bob_id,
            action: "5".into(),
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::NotYourTurn);
}

#[tokio::test]
async fn test_local_game_plays_to_a_win() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    let (session, me, _) = admitted(
        request(
            &mut ws,
            Request::CreateSession {
                game_type: "local".to_string(),
            },
        )
        .await,
    );

    // X takes the top row while O scatters below it.
    let mut last = None;
    for cell in ["0", "3", "1", "4", "2"] {
        let response = request(
            &mut ws,
            Request::SubmitMove {
                session_id: session.clone(),
                participant_id: me.clone(),
                action: cell.into(),
            },
        )
        .await;
        match response {
            Response::SessionState { snapshot, .. } => last = Some(snapshot),
            other => panic!("expected session state, got {other:?}"),
        }
    }
    assert_eq!(last.unwrap().winner, Some(Outcome::Win(PlayerIndex(0))));

    let response = request(
        &mut ws,
        Request::SubmitMove {
            session_id: session,
            participant_id: me,
            action: "5".into(),
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::GameOver);
}

// ===========================================================================
// Matchmaking
// ===========================================================================

#[tokio::test]
async fn test_find_session_pairs_clients_across_connections() {
    let url = start_server().await;
    let mut first = connect(&url).await;
    let mut second = connect(&url).await;

    let (session_a, _, seats_a) = admitted(request(&mut first, Request::FindSession).await);
    let (session_b, _, seats_b) = admitted(request(&mut second, Request::FindSession).await);

    assert_eq!(session_a, session_b);
    assert_eq!(seats_a, vec![PlayerIndex(0)]);
    assert_eq!(seats_b, vec![PlayerIndex(1)]);
}

// ===========================================================================
// Failure frames
// ===========================================================================

#[tokio::test]
async fn test_unknown_game_type_reports_kind() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    let response = request(
        &mut ws,
        Request::CreateSession {
            game_type: "chess".to_string(),
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::UnknownGameType);
}

#[tokio::test]
async fn test_undecodable_frame_gets_bad_request_and_connection_survives() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    ws.send(Message::Text("definitely not json".into()))
        .await
        .unwrap();
    let response = recv(&mut ws).await;
    assert_eq!(error_kind(response), ErrorKind::BadRequest);

    // The same connection keeps working afterwards.
    let response = request(&mut ws, Request::Ping).await;
    assert!(matches!(response, Response::Pong { .. }));
}

#[tokio::test]
async fn test_get_state_unknown_session_not_found() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    let response = request(
        &mut ws,
        Request::GetState {
            session_id: SessionId("missing".to_string()),
            participant_id: ParticipantId("nobody".to_string()),
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::NotFound);
}

// ===========================================================================
// Ending and leaving
// ===========================================================================

#[tokio::test]
async fn test_end_session_acknowledges_then_not_found() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    let (session, me, _) = admitted(
        request(
            &mut ws,
            Request::CreateSession {
                game_type: "local".to_string(),
            },
        )
        .await,
    );

    let response = request(
        &mut ws,
        Request::EndSession {
            session_id: session.clone(),
        },
    )
    .await;
    assert_eq!(
        response,
        Response::Acknowledged {
            message: "game successfully ended".to_string()
        }
    );

    let response = request(
        &mut ws,
        Request::GetState {
            session_id: session.clone(),
            participant_id: me,
        },
    )
    .await;
    assert_eq!(error_kind(response), ErrorKind::NotFound);

    let response = request(&mut ws, Request::EndSession { session_id: session }).await;
    assert_eq!(error_kind(response), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_leave_session_acknowledges_and_state_stays_readable() {
    // Push the reaper far away: with the only participant gone the
    // session counts as abandoned, and this test must read it first.
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .registry_config(RegistryConfig {
            stale_after_secs: 3600,
            sweep_interval_secs: 3600,
        })
        .build()
        .await
        .unwrap();
    let url = format!("ws://{}", server.local_addr().unwrap());
    tokio::spawn(async move {
        server.run().await.unwrap();
    });
    sleep(Duration::from_millis(10)).await;
    let mut ws = connect(&url).await;

    let (session, me, _) = admitted(
        request(
            &mut ws,
            Request::CreateSession {
                game_type: "online".to_string(),
            },
        )
        .await,
    );

    let response = request(
        &mut ws,
        Request::LeaveSession {
            session_id: session.clone(),
            participant_id: me.clone(),
        },
    )
    .await;
    assert_eq!(
        response,
        Response::Acknowledged {
            message: "successfully left the game".to_string()
        }
    );

    // Leaving marks the participant gone but does not tear the session
    // down while the reaper still considers it live.
    let response = request(
        &mut ws,
        Request::GetState {
            session_id: session,
            participant_id: me,
        },
    )
    .await;
    assert!(matches!(response, Response::SessionState { .. }));
}

// ===========================================================================
// Shutdown
// ===========================================================================

#[tokio::test]
async fn test_shutdown_stops_a_running_server() {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.handle();
    let task = tokio::spawn(server.run());
    sleep(Duration::from_millis(10)).await;

    // Prove it is serving first.
    let mut ws = connect(&format!("ws://{addr}")).await;
    let response = request(&mut ws, Request::Ping).await;
    assert!(matches!(response, Response::Pong { .. }));

    handle.shutdown();
    let result = timeout(Duration::from_secs(1), task)
        .await
        .expect("run() should return promptly after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
