//! End-to-end tests against a real engine router on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use url::Url;

use lastplanner_domain::{GameState, GameStatePatch, PlayerName, SessionId, UserId};
use lastplanner_engine::App;
use lastplanner_shared::SaveGameRequest;

use crate::application::LocalGameStore;
use crate::application::services::GameSyncService;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::http_client::HttpGameService;
use crate::infrastructure::platform::InMemoryStorageProvider;
use crate::ports::outbound::{GameServicePort, SyncError};

async fn spawn_engine() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let router = lastplanner_engine::api::router(Arc::new(App::in_memory(10)));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn client(base: &Url, user: Option<&str>) -> HttpGameService {
    HttpGameService::new(base.clone(), Duration::from_secs(5))
        .with_user_id(user.map(|u| UserId::new(u).expect("user id")))
}

fn session(id: &str) -> SessionId {
    SessionId::new(id).expect("session id")
}

fn new_game(session_id: &str) -> GameState {
    GameState::new_game(
        session(session_id),
        PlayerName::new("Ana").expect("name"),
        Utc::now(),
    )
}

#[tokio::test]
async fn save_then_load_over_http() {
    let base = spawn_engine().await;
    let remote = client(&base, None);

    let saved = remote
        .save(&SaveGameRequest::from_state(&new_game("device-1")))
        .await
        .expect("save");
    assert!(saved.id.is_some_and(|id| !id.is_placeholder()));

    let loaded = remote.load(&session("device-1")).await.expect("load");
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn missing_records_map_to_not_found() {
    let base = spawn_engine().await;
    let remote = client(&base, None);

    assert_eq!(remote.load(&session("nobody")).await, Err(SyncError::NotFound));
    let patch = GameStatePatch {
        day: Some(2),
        ..GameStatePatch::default()
    };
    assert_eq!(
        remote.update(&session("nobody"), &patch).await,
        Err(SyncError::NotFound)
    );
    assert_eq!(remote.reset(&session("nobody")).await, Ok(()));
}

#[tokio::test]
async fn rejected_save_is_a_server_error() {
    let base = spawn_engine().await;
    let mut state = new_game("device-1");
    state.player_name = String::new();

    let result = client(&base, None)
        .save(&SaveGameRequest::from_state(&state))
        .await;
    assert!(matches!(result, Err(SyncError::Server { status: 400, .. })));
}

#[tokio::test]
async fn profile_requires_an_account() {
    let base = spawn_engine().await;

    assert_eq!(
        client(&base, None).profile().await,
        Err(SyncError::NotAuthenticated)
    );
    let profile = client(&base, Some("acct-7")).profile().await.expect("profile");
    assert_eq!(profile.user_id.as_str(), "acct-7");
}

#[tokio::test]
async fn account_save_follows_the_player_to_a_new_device() {
    let base = spawn_engine().await;
    let signed_in = client(&base, Some("acct-7"));

    let mut state = new_game("laptop");
    state.chapter = 3;
    signed_in
        .save(&SaveGameRequest::from_state(&state))
        .await
        .expect("save");

    let loaded = signed_in.load(&session("phone")).await.expect("load");
    assert_eq!(loaded.session_id, session("laptop"));
    assert_eq!(loaded.chapter, 3);
    assert_eq!(loaded.user_id.map(String::from).as_deref(), Some("acct-7"));
}

#[tokio::test]
async fn sync_service_round_trip_with_live_engine() {
    let base = spawn_engine().await;
    let sync = GameSyncService::new(
        Arc::new(client(&base, None)),
        LocalGameStore::new(Arc::new(InMemoryStorageProvider::new())),
        Arc::new(SystemClock),
    );
    let id = session("device-1");

    let created = sync
        .new_game(&id, PlayerName::new("Ana").expect("name"))
        .await;
    assert!(created.id.is_some_and(|id| !id.is_placeholder()));

    let patch = GameStatePatch {
        week: Some(2),
        ..GameStatePatch::default()
    };
    let updated = sync.update(&id, &patch).await;
    assert_eq!(updated.week, 2);
    assert_eq!(updated.id, created.id);

    assert_eq!(sync.load(&id).await.map(|s| s.week), Some(2));

    sync.reset(&id).await;
    assert!(sync.load(&id).await.is_none());
}

#[tokio::test]
async fn local_copy_survives_when_the_engine_is_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).expect("url");
    let sync = GameSyncService::new(
        Arc::new(client(&base, None)),
        LocalGameStore::new(Arc::new(InMemoryStorageProvider::new())),
        Arc::new(SystemClock),
    );
    let id = session("device-1");

    let mut state = new_game("device-1");
    state.chapter = 2;
    state.day = 3;
    sync.save(state).await;

    let loaded = sync.load(&id).await.expect("local state");
    assert_eq!((loaded.chapter, loaded.day), (2, 3));

    sync.reset(&id).await;
    assert!(sync.load(&id).await.is_none());
}
