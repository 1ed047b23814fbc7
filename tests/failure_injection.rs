//! Failure injection tests for the bridge.

use std::time::Duration;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_silent_backend_times_the_exchange_out() {
    let backend = common::start_mock_backend(|_frame| vec![]).await;
    let mut config = common::config_for(backend);
    config.timeouts.reply_secs = 1;
    config.timeouts.request_secs = 10;
    let (addr, table, _shutdown) = common::start_bridge(config).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/send", addr))
        .json(&json!({ "user_id": "alice", "message": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 504);
    // The timed-out slot must not linger in the table.
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_send_after_session_death_is_a_bad_gateway() {
    let backend = common::start_vanishing_backend().await;
    let (addr, table, _shutdown) = common::start_bridge(common::config_for(backend)).await;

    // Give the read loop a moment to observe the dropped connection.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/send", addr))
        .json(&json!({ "user_id": "alice", "message": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_session_death_mid_exchange_unblocks_the_caller() {
    // The backend reads the frame and hangs up instead of replying. Even
    // with an unbounded reply wait, the dying session must fail the pending
    // exchange rather than leave the caller blocked.
    let backend = common::start_hangup_backend().await;
    let mut config = common::config_for(backend);
    config.timeouts.reply_secs = 0;
    config.timeouts.request_secs = 30;
    let (addr, table, _shutdown) = common::start_bridge(config).await;

    let res = tokio::time::timeout(
        Duration::from_secs(10),
        reqwest::Client::new()
            .post(format!("http://{}/send", addr))
            .json(&json!({ "user_id": "alice", "message": "hi" }))
            .send(),
    )
    .await
    .expect("caller stayed blocked after the session died")
    .unwrap();

    assert_eq!(res.status(), 502);
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_connect_failure_surfaces_before_serving() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = common::config_for(addr);
    let err = chat_bridge::HttpServer::connect(config).await.unwrap_err();
    assert!(matches!(err, chat_bridge::BridgeError::Connection(_)));
}

#[tokio::test]
async fn test_timed_out_exchange_does_not_poison_the_next() {
    let backend = common::start_mock_backend(|_frame| vec![]).await;
    let mut config = common::config_for(backend);
    config.timeouts.reply_secs = 1;
    let (addr, table, _shutdown) = common::start_bridge(config).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/send", addr))
        .json(&json!({ "user_id": "alice", "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 504);

    // A fresh exchange for the same user still works end to end.
    let backend2 = common::start_mock_backend(|frame| {
        let user = frame["user_id"].as_str().unwrap().to_string();
        vec![common::chat_frame(&user, "second try")]
    })
    .await;
    let (addr2, table2, _shutdown2) = common::start_bridge(common::config_for(backend2)).await;
    let res = reqwest::Client::new()
        .post(format!("http://{}/send", addr2))
        .json(&json!({ "user_id": "alice", "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["response"], "second try");

    assert!(table.is_empty());
    assert!(table2.is_empty());
}
