//! Board and dashboard flows over real HTTP.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use stakeboard::dashboard::build_router;
use stakeboard::engine::{Board, Notice};
use stakeboard::remote::http::HttpBettingService;
use stakeboard::storage::PreferenceStore;
use stakeboard::types::{BetFilter, BetId, LocalPreferences};

use crate::fake_remote::FakeRemote;

fn prefs_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("stakeboard_it_prefs_{}.json", uuid::Uuid::new_v4()))
}

fn board_for(base_url: &str, prefs: &std::path::Path) -> Arc<Board> {
    let svc = Arc::new(HttpBettingService::new(base_url, None).unwrap());
    Arc::new(Board::new(svc, PreferenceStore::new(prefs), BetFilter::default()))
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_initial_load_sizes_rows() {
    let remote = FakeRemote::start().await;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;

    let model = board.view().await.model.unwrap();
    assert_eq!(model.rows.len(), 2);
    // 0.5 * 0.07 / 1.10 * 100 = 3.18
    assert_eq!(model.rows[0].suggested_stake, 3.18);
    // 0.5 * 0.05 / 0.80 * 100 = 3.125 -> 3.13 (within [1, 25])
    assert!((model.rows[1].suggested_stake - 3.13).abs() < 0.011);

    let choices = board.view().await.choices;
    assert_eq!(choices.sports, vec!["Fútbol".to_string()]);
    assert_eq!(choices.bookmakers, vec!["Bet365".to_string(), "William Hill".to_string()]);
}

#[tokio::test]
async fn test_filter_form_narrows_feed() {
    let remote = FakeRemote::start().await;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;

    let resp = build_router(Arc::clone(&board))
        .oneshot(form_post("/filters", "sport=&bookmaker=William+Hill"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let view = board.view().await;
    let model = view.model.unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].bet.id, BetId::Text("wh-7".into()));
    assert_eq!(view.filter.bookmaker.as_deref(), Some("William Hill"));
    assert!(remote
        .state
        .last_bets_query
        .lock()
        .unwrap()
        .as_deref()
        .is_some_and(|q| q.contains("bookmaker=William")));

    // Timer and manual refreshes keep the chosen filter.
    board.refresh().await.unwrap();
    assert_eq!(board.view().await.model.unwrap().rows.len(), 1);
}

#[tokio::test]
async fn test_text_id_registers_through_route() {
    let remote = FakeRemote::start().await;
    *remote.state.hide_registered.lock().unwrap() = true;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;

    let resp = build_router(Arc::clone(&board))
        .oneshot(form_post("/register/text/wh-7", "stake=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        remote.state.registrations.lock().unwrap()[0]["bet_id"],
        serde_json::json!("wh-7")
    );
    let model = board.view().await.model.unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].bet.id, BetId::Num(101));
}

#[tokio::test]
async fn test_unreachable_service_gives_connectivity_notice() {
    let board = board_for("http://127.0.0.1:9", &prefs_path());
    board.start().await;

    let view = board.view().await;
    assert!(view.model.is_none());
    assert!(matches!(view.notice, Some(Notice::Error(msg)) if msg.contains("127.0.0.1:9")));
}

#[tokio::test]
async fn test_registered_bet_disappears_when_feed_drops_it() {
    let remote = FakeRemote::start().await;
    *remote.state.hide_registered.lock().unwrap() = true;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;

    let app = build_router(Arc::clone(&board));
    let resp = app
        .oneshot(form_post("/register/num/101", "stake=2.50"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let model = board.view().await.model.unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].bet.id.to_string(), "wh-7");
}

#[tokio::test]
async fn test_registered_bet_stays_when_feed_keeps_it() {
    let remote = FakeRemote::start().await;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;

    board.register(&BetId::Text("wh-7".into()), 1.0).await.unwrap();
    assert_eq!(board.view().await.model.unwrap().rows.len(), 2);
    assert_eq!(remote.state.registrations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_registration_failure_is_row_scoped() {
    let remote = FakeRemote::start().await;
    let board = board_for(&remote.base_url, &prefs_path());
    board.start().await;
    let before = board.view().await.model.unwrap();

    remote.state.fail_next(409, "already registered");
    let app = build_router(Arc::clone(&board));
    let resp = app
        .oneshot(form_post("/register/num/101", "stake=3"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let view = board.view().await;
    assert!(view.in_flight.is_empty());
    assert_eq!(view.model.unwrap().rows, before.rows);

    // Manual retry goes through.
    board.register(&BetId::Num(101), 3.0).await.unwrap();
}

#[tokio::test]
async fn test_settings_save_round_trip() {
    let remote = FakeRemote::start().await;
    let path = prefs_path();
    let board = board_for(&remote.base_url, &path);
    board.start().await;

    let app = build_router(Arc::clone(&board));
    let resp = app
        .oneshot(form_post(
            "/settings",
            "kelly_pct=10&stake_min=0&stake_max=2&page_limit=1&auto_refresh=on&auto_refresh_secs=60",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // Remote got exactly the four remote-owned fields.
    let saved = remote.state.saved_settings.lock().unwrap()[0].clone();
    let keys: Vec<&str> = saved.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 4);
    assert!(!keys.iter().any(|k| k.contains("auto_refresh")));

    // The redraw already reflects the new settings and page limit.
    let model = board.view().await.model.unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.settings.page_limit, 1);
    assert_eq!(model.rows[0].suggested_stake, 0.64);

    // Local half persisted and the timer armed.
    let stored = PreferenceStore::new(&path).load();
    assert_eq!(
        stored,
        LocalPreferences {
            auto_refresh_enabled: true,
            auto_refresh_secs: 60,
        }
    );
    assert_eq!(board.timer_tasks().await, 1);

    board.shutdown().await;
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn test_stored_prefs_arm_timer_on_start() {
    let remote = FakeRemote::start().await;
    let path = prefs_path();
    PreferenceStore::new(&path)
        .save(&LocalPreferences {
            auto_refresh_enabled: true,
            auto_refresh_secs: 30,
        })
        .unwrap();

    let board = board_for(&remote.base_url, &path);
    board.start().await;
    assert_eq!(board.timer_tasks().await, 1);

    let resp = build_router(Arc::clone(&board))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<meta http-equiv=\"refresh\" content=\"30\">"));

    board.shutdown().await;
    std::fs::remove_file(path).unwrap();
}
