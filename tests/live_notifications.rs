mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::InMemoryStore;
use linkpulse::domain::click_event::ClickEvent;
use linkpulse::domain::notification::Notification;
use linkpulse::realtime::{ConnectionHandle, Delivery, NotificationHub, SubscriptionEvent};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::task::JoinSet;

fn ws_server(state: linkpulse::AppState) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(common::test_app(state))
        .unwrap()
}

#[tokio::test]
async fn test_shorten_redirect_then_analytics() {
    let store = InMemoryStore::new();
    let server =
        TestServer::new(common::test_app(common::create_test_state(store.clone()))).unwrap();

    let created = server
        .post("/api/shorten")
        .add_header("Authorization", common::bearer(1))
        .json(&json!({ "url": "https://example.com/landing" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let code = created.json::<Value>()["code"].as_str().unwrap().to_string();

    server
        .get(&format!("/r/{code}"))
        .await
        .assert_status(StatusCode::FOUND);
    assert!(common::eventually(Duration::from_secs(2), || store.click_count() == 1).await);

    let analytics = server
        .get(&format!("/api/analytics/{code}"))
        .add_header("Authorization", common::bearer(1))
        .await
        .json::<Value>();

    assert_eq!(analytics, json!({ "link_id": code, "total_clicks": 1 }));
}

#[tokio::test]
async fn test_websocket_receives_click_count() {
    let store = InMemoryStore::new();
    store.insert_link("abc12345", "https://example.com", 1);
    let hub = NotificationHub::spawn(64);
    let server = ws_server(common::create_test_state_with_hub(store, hub.clone()));

    let mut socket = server
        .get_websocket(&format!("/live?token={}", common::token_for(1)))
        .await
        .into_websocket()
        .await;
    assert!(common::wait_for_subscribers(&hub, 1).await);

    server
        .get("/r/abc12345")
        .await
        .assert_status(StatusCode::FOUND);

    let frame = socket.receive_json::<Value>().await;
    assert_eq!(frame, json!({ "link_id": "abc12345", "click_count": 1 }));

    server
        .get("/r/abc12345")
        .await
        .assert_status(StatusCode::FOUND);

    let frame = socket.receive_json::<Value>().await;
    assert_eq!(frame, json!({ "link_id": "abc12345", "click_count": 2 }));
}

#[tokio::test]
async fn test_websocket_disconnect_unregisters() {
    let hub = NotificationHub::spawn(64);
    let server = ws_server(common::create_test_state_with_hub(
        InMemoryStore::new(),
        hub.clone(),
    ));

    let socket = server
        .get_websocket(&format!("/live?token={}", common::token_for(3)))
        .await
        .into_websocket()
        .await;
    assert!(common::wait_for_subscribers(&hub, 1).await);

    socket.close().await;

    assert!(common::wait_for_subscribers(&hub, 0).await);
}

#[tokio::test]
async fn test_live_requires_token() {
    let server = TestServer::new(common::test_app(common::create_test_state(
        InMemoryStore::new(),
    )))
    .unwrap();

    let missing = server.get("/live").await;
    assert_eq!(missing.status_code(), 400);

    let empty = server.get("/live?token=").await;
    assert_eq!(empty.status_code(), 400);

    let forged = server.get("/live?token=bm90LWEtdG9rZW4.00ff").await;
    assert_eq!(forged.status_code(), 401);
}

#[tokio::test]
async fn test_other_owners_clicks_are_not_delivered() {
    let store = InMemoryStore::new();
    store.insert_link("aaaa0001", "https://one.example.com", 1);
    store.insert_link("bbbb0002", "https://two.example.com", 2);
    let hub = NotificationHub::spawn(64);
    let state = common::create_test_state_with_hub(store, hub.clone());

    let (handle, mut subscription) = ConnectionHandle::new(8);
    hub.register(1, handle).await;

    let other = state
        .click_recorder
        .record(ClickEvent::new("bbbb0002".to_string(), None, None))
        .await
        .unwrap();
    assert_eq!(other, Delivery::NoSubscriber);

    let own = state
        .click_recorder
        .record(ClickEvent::new("aaaa0001".to_string(), None, None))
        .await
        .unwrap();
    assert_eq!(own, Delivery::Delivered);

    assert_eq!(
        subscription.next().await,
        SubscriptionEvent::Notify(Notification::new("aaaa0001", 1))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clicks_are_all_counted() {
    const CLICKS: i64 = 25;

    let store = InMemoryStore::new();
    store.insert_link("abc12345", "https://example.com", 1);
    let hub = NotificationHub::spawn(64);
    let state = common::create_test_state_with_hub(store.clone(), hub.clone());

    let (handle, mut subscription) = ConnectionHandle::new(CLICKS as usize);
    hub.register(1, handle).await;

    let mut tasks = JoinSet::new();
    for i in 0..CLICKS {
        let recorder = state.click_recorder.clone();
        tasks.spawn(async move {
            recorder
                .record(ClickEvent::new(
                    "abc12345".to_string(),
                    Some(format!("10.0.0.{i}")),
                    None,
                ))
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap(), Delivery::Delivered);
    }

    let mut highest = 0;
    for _ in 0..CLICKS {
        match subscription.next().await {
            SubscriptionEvent::Notify(n) => {
                assert!((1..=CLICKS).contains(&n.click_count));
                highest = highest.max(n.click_count);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(highest, CLICKS);
    assert_eq!(store.click_count() as i64, CLICKS);
    assert_eq!(
        state
            .analytics_service
            .total_clicks(1, "abc12345")
            .await
            .unwrap(),
        CLICKS
    );
}

#[tokio::test]
async fn test_stale_unregister_keeps_newer_connection() {
    let hub = NotificationHub::spawn(16);
    let (first, _first_sub) = ConnectionHandle::new(4);
    let (second, mut second_sub) = ConnectionHandle::new(4);
    let first_id = first.id();

    hub.register(1, first).await;
    hub.register(1, second).await;

    assert!(!hub.unregister(1, first_id).await);
    assert_eq!(hub.subscriber_count().await, Some(1));

    assert_eq!(hub.broadcast(1, "abc12345", 9).await, Delivery::Delivered);
    assert_eq!(
        second_sub.next().await,
        SubscriptionEvent::Notify(Notification::new("abc12345", 9))
    );
}

#[tokio::test]
async fn test_redirect_works_with_stopped_hub() {
    let store = InMemoryStore::new();
    store.insert_link("abc12345", "https://example.com", 1);
    let (hub, hub_loop) = NotificationHub::new(16);
    drop(hub_loop);
    let server = TestServer::new(common::test_app(common::create_test_state_with_hub(
        store.clone(),
        hub,
    )))
    .unwrap();

    let response = server.get("/r/abc12345").await;

    assert_eq!(response.status_code(), 302);
    assert!(common::eventually(Duration::from_secs(2), || store.click_count() == 1).await);
}
