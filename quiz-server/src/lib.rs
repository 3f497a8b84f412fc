use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

use quiz_types::{
    AdminActionRequest, AdminUnlockRequest, AnswerRequest, JoinRequest, PollRequest, QuizError,
    SessionCreatedResponse,
};

pub mod admin;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod sessions;

use admin::AdminService;
use coordinator::SessionCoordinator;
use error::ApiError;
use sessions::SessionManager;

#[derive(Deserialize)]
struct SessionQuery {
    session_id: String,
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn create_routes(
    session_manager: Arc<SessionManager>,
    coordinator: Arc<SessionCoordinator>,
    admin_service: Arc<AdminService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let coordinator_filter = warp::any().map({
        let coordinator = coordinator.clone();
        move || coordinator.clone()
    });

    let admin_filter = warp::any().map({
        let admin_service = admin_service.clone();
        move || admin_service.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Session bootstrap: both player and host views obtain a token here
    let session = warp::path("session")
        .and(warp::post())
        .and(session_manager_filter.clone())
        .map(|manager: Arc<SessionManager>| {
            let session_id = manager.create_session();
            warp::reply::with_status(
                warp::reply::json(&SessionCreatedResponse {
                    session_id: session_id.to_string(),
                    poll_interval_ms: quiz_core::POLL_INTERVAL_MS,
                }),
                StatusCode::OK,
            )
        });

    let join = warp::path("join")
        .and(warp::post())
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(handle_join);

    // The 1-second poll every connected view runs against the shared store
    let poll = warp::path("poll")
        .and(warp::post())
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(handle_poll);

    let answer = warp::path("answer")
        .and(warp::post())
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(handle_answer);

    let admin_unlock = warp::path!("admin" / "unlock")
        .and(warp::post())
        .and(warp::body::json())
        .and(admin_filter.clone())
        .and_then(handle_admin_unlock);

    let admin_start = warp::path!("admin" / "start")
        .and(warp::post())
        .and(warp::body::json())
        .and(admin_filter.clone())
        .and_then(handle_admin_start);

    let admin_stop = warp::path!("admin" / "stop")
        .and(warp::post())
        .and(warp::body::json())
        .and(admin_filter.clone())
        .and_then(handle_admin_stop);

    let admin_advance = warp::path!("admin" / "advance")
        .and(warp::post())
        .and(warp::body::json())
        .and(admin_filter.clone())
        .and_then(handle_admin_advance);

    let admin_reset = warp::path!("admin" / "reset")
        .and(warp::post())
        .and(warp::body::json())
        .and(admin_filter.clone())
        .and_then(handle_admin_reset);

    let admin_stats = warp::path!("admin" / "stats")
        .and(warp::get())
        .and(warp::query::<SessionQuery>())
        .and(admin_filter.clone())
        .and_then(handle_admin_stats);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(session)
        .or(join)
        .or(poll)
        .or(answer)
        .or(admin_unlock)
        .or(admin_start)
        .or(admin_stop)
        .or(admin_advance)
        .or(admin_reset)
        .or(admin_stats)
        .with(cors)
        .with(warp::log("scramble_live"))
}

fn parse_session_id(raw: &str) -> Result<Uuid, JsonReply> {
    Uuid::parse_str(raw).map_err(|_| {
        warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": "Invalid session ID format"
            })),
            StatusCode::BAD_REQUEST,
        )
    })
}

fn error_reply(err: ApiError) -> JsonReply {
    match err {
        ApiError::Rejected(rejection) => {
            let status = match rejection {
                QuizError::SessionNotFound | QuizError::IncorrectPin => StatusCode::UNAUTHORIZED,
                QuizError::AdminRequired => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_REQUEST,
            };
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": rejection.message()
                })),
                status,
            )
        }
        ApiError::Internal(err) => {
            tracing::error!("storage failure: {:#}", err);
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Internal server error"
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

async fn handle_join(
    request: JoinRequest,
    coordinator: Arc<SessionCoordinator>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match coordinator.join(session_id, &request.name).await {
        Ok(response) => Ok(warp::reply::with_status(
            warp::reply::json(&response),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_poll(
    request: PollRequest,
    coordinator: Arc<SessionCoordinator>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match coordinator.poll(session_id).await {
        Ok(snapshot) => Ok(warp::reply::with_status(
            warp::reply::json(&snapshot),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_answer(
    request: AnswerRequest,
    coordinator: Arc<SessionCoordinator>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match coordinator.answer(session_id, &request.answer).await {
        Ok(outcome) => Ok(warp::reply::with_status(
            warp::reply::json(&outcome),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_unlock(
    request: AdminUnlockRequest,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.unlock(session_id, &request.pin) {
        Ok(()) => Ok(ok_reply()),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_start(
    request: AdminActionRequest,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.start_round(session_id).await {
        Ok(()) => Ok(ok_reply()),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_stop(
    request: AdminActionRequest,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.stop_round(session_id).await {
        Ok(()) => Ok(ok_reply()),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_advance(
    request: AdminActionRequest,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.advance_word(session_id).await {
        Ok(()) => Ok(ok_reply()),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_reset(
    request: AdminActionRequest,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&request.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.reset_game(session_id).await {
        Ok(()) => Ok(ok_reply()),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_admin_stats(
    query: SessionQuery,
    admin_service: Arc<AdminService>,
) -> Result<JsonReply, warp::Rejection> {
    let session_id = match parse_session_id(&query.session_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match admin_service.stats(session_id).await {
        Ok(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(err)),
    }
}

fn ok_reply() -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "ok": true })),
        StatusCode::OK,
    )
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use quiz_persistence::connection::connect_to_memory_database;
    use quiz_persistence::repositories::{
        PlayerRepository, RoundStateRepository, ScoreRepository,
    };
    use quiz_types::{AnswerOutcome, SessionPhase, SessionSnapshot};

    const TEST_PIN: &str = "test-pin";

    async fn create_test_app(
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let session_manager = Arc::new(SessionManager::new());
        let players = PlayerRepository::new(db.clone());
        let scores = ScoreRepository::new(db.clone());
        let round_state = RoundStateRepository::new(db);

        let coordinator = Arc::new(SessionCoordinator::new(
            session_manager.clone(),
            players.clone(),
            scores.clone(),
            round_state.clone(),
        ));
        let admin_service = Arc::new(AdminService::new(
            session_manager.clone(),
            players,
            scores,
            round_state,
            TEST_PIN.to_string(),
        ));

        create_routes(session_manager, coordinator, admin_service)
    }

    async fn new_session(
        app: &(impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static),
    ) -> String {
        let response = warp::test::request()
            .method("POST")
            .path("/session")
            .reply(app)
            .await;
        assert_eq!(response.status(), 200);

        let created: SessionCreatedResponse = serde_json::from_slice(response.body()).unwrap();
        created.session_id
    }

    async fn unlock_admin(
        app: &(impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static),
        session_id: &str,
    ) {
        let response = warp::test::request()
            .method("POST")
            .path("/admin/unlock")
            .json(&AdminUnlockRequest {
                session_id: session_id.to_string(),
                pin: TEST_PIN.to_string(),
            })
            .reply(app)
            .await;
        assert_eq!(response.status(), 200);
    }

    async fn poll(
        app: &(impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static),
        session_id: &str,
    ) -> SessionSnapshot {
        let response = warp::test::request()
            .method("POST")
            .path("/poll")
            .json(&PollRequest {
                session_id: session_id.to_string(),
            })
            .reply(app)
            .await;
        assert_eq!(response.status(), 200);
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_poll_unknown_session() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/poll")
            .json(&PollRequest {
                session_id: Uuid::new_v4().to_string(),
            })
            .reply(&app)
            .await;

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_poll_invalid_session_id_format() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/poll")
            .json(&PollRequest {
                session_id: "not-a-uuid".to_string(),
            })
            .reply(&app)
            .await;

        assert_eq!(response.status(), 400);

        let error: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(error["error"], "Invalid session ID format");
    }

    #[tokio::test]
    async fn test_join_rejects_empty_name() {
        let app = create_test_app().await;
        let session_id = new_session(&app).await;

        let response = warp::test::request()
            .method("POST")
            .path("/join")
            .json(&JoinRequest {
                session_id,
                name: "   ".to_string(),
            })
            .reply(&app)
            .await;

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_unjoined_session_polls_as_unjoined() {
        let app = create_test_app().await;
        let session_id = new_session(&app).await;

        let snapshot = poll(&app, &session_id).await;
        assert_eq!(snapshot.phase, SessionPhase::Unjoined);
        assert_eq!(snapshot.total_words, quiz_core::TOTAL_WORDS);
    }

    #[tokio::test]
    async fn test_player_round_trip() {
        let app = create_test_app().await;

        let player = new_session(&app).await;
        let host = new_session(&app).await;
        unlock_admin(&app, &host).await;

        let response = warp::test::request()
            .method("POST")
            .path("/join")
            .json(&JoinRequest {
                session_id: player.clone(),
                name: "Ada".to_string(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        // Waiting before the host starts the round
        let snapshot = poll(&app, &player).await;
        assert_eq!(snapshot.phase, SessionPhase::Waiting);
        assert_eq!(snapshot.word_number, Some(1));
        assert_eq!(snapshot.scramble.as_deref(), Some("GNEGAEMNET"));
        assert_eq!(snapshot.live_players, 1);

        let response = warp::test::request()
            .method("POST")
            .path("/admin/start")
            .json(&AdminActionRequest {
                session_id: host.clone(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let snapshot = poll(&app, &player).await;
        assert_eq!(snapshot.phase, SessionPhase::Guessing);
        assert!(snapshot.remaining_seconds > 0);
        assert_eq!(snapshot.revealed_answer, None);

        let response = warp::test::request()
            .method("POST")
            .path("/answer")
            .json(&AnswerRequest {
                session_id: player.clone(),
                answer: " engagement ".to_string(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let outcome: AnswerOutcome = serde_json::from_slice(response.body()).unwrap();
        assert!(outcome.correct);
        assert!(outcome.time_taken.unwrap() <= 30.0);

        let snapshot = poll(&app, &player).await;
        assert_eq!(snapshot.phase, SessionPhase::Answered);
        assert_eq!(snapshot.revealed_answer.as_deref(), Some("ENGAGEMENT"));
        assert_eq!(snapshot.word_leaderboard.len(), 1);
        assert_eq!(snapshot.word_leaderboard[0].name, "Ada");
        assert_eq!(snapshot.overall_leaderboard[0].correct_count, 1);

        // Second submission for the same word is rejected
        let response = warp::test::request()
            .method("POST")
            .path("/answer")
            .json(&AnswerRequest {
                session_id: player.clone(),
                answer: "engagement".to_string(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_admin_unlock_wrong_pin() {
        let app = create_test_app().await;
        let session_id = new_session(&app).await;

        let response = warp::test::request()
            .method("POST")
            .path("/admin/unlock")
            .json(&AdminUnlockRequest {
                session_id,
                pin: "wrong".to_string(),
            })
            .reply(&app)
            .await;

        assert_eq!(response.status(), 401);

        let error: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(error["error"], "Incorrect PIN.");
    }

    #[tokio::test]
    async fn test_admin_routes_require_unlock() {
        let app = create_test_app().await;
        let session_id = new_session(&app).await;

        let response = warp::test::request()
            .method("POST")
            .path("/admin/start")
            .json(&AdminActionRequest {
                session_id: session_id.clone(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 403);

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/admin/stats?session_id={}", session_id))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 403);
    }

    #[tokio::test]
    async fn test_advance_is_observed_by_concurrent_sessions() {
        let app = create_test_app().await;

        let ada = new_session(&app).await;
        let bo = new_session(&app).await;
        let host = new_session(&app).await;
        unlock_admin(&app, &host).await;

        for (sid, name) in [(&ada, "Ada"), (&bo, "Bo")] {
            let response = warp::test::request()
                .method("POST")
                .path("/join")
                .json(&JoinRequest {
                    session_id: sid.to_string(),
                    name: name.to_string(),
                })
                .reply(&app)
                .await;
            assert_eq!(response.status(), 200);
        }

        warp::test::request()
            .method("POST")
            .path("/admin/start")
            .json(&AdminActionRequest {
                session_id: host.clone(),
            })
            .reply(&app)
            .await;

        warp::test::request()
            .method("POST")
            .path("/answer")
            .json(&AnswerRequest {
                session_id: ada.clone(),
                answer: "engagement".to_string(),
            })
            .reply(&app)
            .await;

        warp::test::request()
            .method("POST")
            .path("/admin/advance")
            .json(&AdminActionRequest {
                session_id: host.clone(),
            })
            .reply(&app)
            .await;

        // Both sessions observe the new word and their answered flags reset
        for sid in [&ada, &bo] {
            let snapshot = poll(&app, sid).await;
            assert_eq!(snapshot.phase, SessionPhase::Waiting);
            assert_eq!(snapshot.word_number, Some(2));
            assert_eq!(snapshot.last_outcome, None);
        }
    }

    #[tokio::test]
    async fn test_reset_returns_players_to_unjoined() {
        let app = create_test_app().await;

        let player = new_session(&app).await;
        let host = new_session(&app).await;
        unlock_admin(&app, &host).await;

        warp::test::request()
            .method("POST")
            .path("/join")
            .json(&JoinRequest {
                session_id: player.clone(),
                name: "Ada".to_string(),
            })
            .reply(&app)
            .await;

        let response = warp::test::request()
            .method("POST")
            .path("/admin/reset")
            .json(&AdminActionRequest {
                session_id: host.clone(),
            })
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        // The deleted player is detected on the next poll
        let snapshot = poll(&app, &player).await;
        assert_eq!(snapshot.phase, SessionPhase::Unjoined);
        assert_eq!(snapshot.live_players, 0);
        assert!(snapshot.overall_leaderboard.is_empty());
    }

    #[tokio::test]
    async fn test_admin_stats_view() {
        let app = create_test_app().await;

        let player = new_session(&app).await;
        let host = new_session(&app).await;
        unlock_admin(&app, &host).await;

        warp::test::request()
            .method("POST")
            .path("/join")
            .json(&JoinRequest {
                session_id: player.clone(),
                name: "Ada".to_string(),
            })
            .reply(&app)
            .await;
        poll(&app, &player).await;

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/admin/stats?session_id={}", host))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let stats: quiz_types::AdminStatsResponse =
            serde_json::from_slice(response.body()).unwrap();
        assert_eq!(stats.live_players, 1);
        assert_eq!(stats.live_names, vec!["Ada"]);
        assert_eq!(stats.word_number, Some(1));
        assert!(!stats.is_active);
    }

    #[tokio::test]
    async fn test_invalid_routes() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/invalid")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 404);
    }
}
