//! HTTP client against the fake remote.

use serde_json::json;

use stakeboard::error::RemoteError;
use stakeboard::remote::http::HttpBettingService;
use stakeboard::remote::BettingService;
use stakeboard::types::{BetFilter, BetId, Registration, RemoteSettings};

use crate::fake_remote::FakeRemote;

fn client(remote: &FakeRemote) -> HttpBettingService {
    HttpBettingService::new(&remote.base_url, None).unwrap()
}

#[tokio::test]
async fn test_fetch_settings() {
    let remote = FakeRemote::start().await;
    let settings = client(&remote).fetch_settings().await.unwrap();
    assert_eq!(
        settings,
        RemoteSettings {
            kelly_fraction: 0.5,
            stake_min: 1.0,
            stake_max: 25.0,
            page_limit: 20,
        }
    );
}

#[tokio::test]
async fn test_fetch_bets_keeps_order_and_id_shapes() {
    let remote = FakeRemote::start().await;
    let bets = client(&remote).fetch_bets(&BetFilter::default()).await.unwrap();

    assert_eq!(bets.len(), 2);
    assert_eq!(bets[0].id, BetId::Num(101));
    assert_eq!(bets[0].sport.as_deref(), Some("Fútbol"));
    assert_eq!(bets[1].id, BetId::Text("wh-7".into()));
    assert!(bets[1].start_time.is_none());
    assert!(remote.state.last_bets_query.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_filter_sent_as_query() {
    let remote = FakeRemote::start().await;
    let filter = BetFilter {
        sport: Some("Tenis".into()),
        edge_min: Some(4.0),
        ..BetFilter::default()
    };
    client(&remote).fetch_bets(&filter).await.unwrap();

    assert_eq!(
        remote.state.last_bets_query.lock().unwrap().as_deref(),
        Some("sport=Tenis&edge_min=4")
    );
}

#[tokio::test]
async fn test_list_sports() {
    let remote = FakeRemote::start().await;
    let sports = client(&remote).list_sports().await.unwrap();
    assert_eq!(sports, vec!["Fútbol".to_string()]);
}

#[tokio::test]
async fn test_list_bookmakers() {
    let remote = FakeRemote::start().await;
    let bookmakers = client(&remote).list_bookmakers().await.unwrap();
    assert_eq!(bookmakers, vec!["Bet365".to_string(), "William Hill".to_string()]);
}

#[tokio::test]
async fn test_list_failure_carries_raw_body() {
    let remote = FakeRemote::start().await;
    remote.state.fail_next(500, "catalogue offline");

    let err = client(&remote).list_bookmakers().await.unwrap_err();
    assert_eq!(err.to_string(), "catalogue offline");
}

#[tokio::test]
async fn test_error_status_carries_raw_body() {
    let remote = FakeRemote::start().await;
    remote.state.fail_next(503, "feed is rebuilding");

    let err = client(&remote).fetch_bets(&BetFilter::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "feed is rebuilding");
}

#[tokio::test]
async fn test_save_settings_sends_only_remote_fields() {
    let remote = FakeRemote::start().await;
    let settings = RemoteSettings {
        kelly_fraction: 0.2,
        stake_min: 0.0,
        stake_max: 10.0,
        page_limit: 5,
    };
    client(&remote).save_settings(&settings).await.unwrap();

    let saved = remote.state.saved_settings.lock().unwrap();
    assert_eq!(
        saved[0],
        json!({"kelly_fraction": 0.2, "stake_min": 0.0, "stake_max": 10.0, "page_limit": 5})
    );
}

#[tokio::test]
async fn test_register_echoes_bet_id() {
    let remote = FakeRemote::start().await;
    let svc = client(&remote);
    svc.register(&Registration {
        bet_id: BetId::Num(101),
        stake: 3.18,
    })
    .await
    .unwrap();
    svc.register(&Registration {
        bet_id: BetId::Text("wh-7".into()),
        stake: 0.0,
    })
    .await
    .unwrap();

    let regs = remote.state.registrations.lock().unwrap();
    assert_eq!(regs[0], json!({"bet_id": 101, "stake": 3.18}));
    assert_eq!(regs[1], json!({"bet_id": "wh-7", "stake": 0.0}));
}

#[tokio::test]
async fn test_register_failure() {
    let remote = FakeRemote::start().await;
    remote.state.fail_next(400, "stake exceeds limit");

    let err = client(&remote)
        .register(&Registration {
            bet_id: BetId::Num(101),
            stake: 999.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 400, .. }));
    assert_eq!(err.to_string(), "stake exceeds limit");
}

#[tokio::test]
async fn test_health() {
    let remote = FakeRemote::start().await;
    let health = client(&remote).health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.time.is_some());
}
