//! Integration tests for the Telegram client against a stub Bot API

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use coin_poll_bot::bot::{CommandResponder, Dispatcher};
use coin_poll_bot::poll::{PollOption, PollSpec, VoteStore};
use coin_poll_bot::quote::{CoinMarketCapClient, CoinMarketCapConfig};
use coin_poll_bot::telegram::{DeliveryError, Messenger, TelegramClient, TelegramConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

type Requests = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn send_message(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    let chat_id = body["chat_id"].clone();
    let text = body["text"].clone();
    requests.lock().await.push(body);
    Json(json!({
        "ok": true,
        "result": {"message_id": 1, "chat": {"id": chat_id, "type": "group"}, "text": text}
    }))
}

async fn send_poll(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    let chat_id = body["chat_id"].clone();
    requests.lock().await.push(body);
    Json(json!({
        "ok": true,
        "result": {
            "message_id": 2,
            "chat": {"id": chat_id, "type": "group"},
            "poll": {"id": "poll-77", "question": "Price Prediction"}
        }
    }))
}

async fn get_updates(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["allowed_updates"], json!(["message", "poll_answer"]));
    Json(json!({
        "ok": true,
        "result": [
            {"update_id": 5, "message": {"message_id": 9, "chat": {"id": -3, "type": "group"}, "text": "/mcap"}},
            {"update_id": 6, "poll_answer": {"poll_id": "poll-77", "user": {"id": 4, "is_bot": false, "first_name": "B"}, "option_ids": [2]}}
        ]
    }))
}

async fn stub() -> (TelegramClient, Requests) {
    let requests: Requests = Arc::default();
    let router = Router::new()
        .route("/bottest-token/sendMessage", post(send_message))
        .route("/bottest-token/sendPoll", post(send_poll))
        .route("/bottest-token/getUpdates", post(get_updates))
        .with_state(Arc::clone(&requests));
    let base = serve(router).await;

    let mut config = TelegramConfig::new("test-token");
    config.api_url = base;
    (TelegramClient::with_config(config).unwrap(), requests)
}

#[tokio::test]
async fn test_send_text() {
    let (client, requests) = stub().await;
    client.send_text(-100, "hello").await.unwrap();

    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["chat_id"], -100);
    assert_eq!(requests[0]["text"], "hello");
}

#[tokio::test]
async fn test_send_poll_returns_platform_id() {
    let (client, requests) = stub().await;
    let poll_id = client
        .send_poll(-100, &PollSpec::price_prediction())
        .await
        .unwrap();
    assert_eq!(poll_id, "poll-77");

    let requests = requests.lock().await;
    assert_eq!(requests[0]["question"], "Price Prediction");
    assert_eq!(requests[0]["is_anonymous"], false);
    assert_eq!(requests[0]["options"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_get_updates() {
    let (client, _) = stub().await;
    let updates = client.get_updates(Some(5)).await.unwrap();

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/mcap"));
    assert_eq!(updates[1].poll_answer.as_ref().unwrap().option_ids, vec![2]);
}

#[tokio::test]
async fn test_api_error_maps_to_delivery_error() {
    let router = Router::new().route(
        "/botbad-token/sendMessage",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
            )
        }),
    );
    let base = serve(router).await;
    let mut config = TelegramConfig::new("bad-token");
    config.api_url = base;
    let client = TelegramClient::with_config(config).unwrap();

    let err = client.send_text(1, "hi").await.unwrap_err();
    match err {
        DeliveryError::Api { code, description } => {
            assert_eq!(code, 401);
            assert_eq!(description, "Unauthorized");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_response_is_invalid() {
    let router = Router::new().route(
        "/bottest-token/sendMessage",
        post(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
    );
    let base = serve(router).await;
    let mut config = TelegramConfig::new("test-token");
    config.api_url = base;
    let client = TelegramClient::with_config(config).unwrap();

    let err = client.send_text(1, "hi").await.unwrap_err();
    assert!(matches!(err, DeliveryError::InvalidResponse(_)));
    assert!(!err.to_string().contains("test-token"));
}

/// getUpdates stub state: offsets received per call, plus sent messages
#[derive(Clone, Default)]
struct LoopState {
    offsets: Arc<Mutex<Vec<Option<i64>>>>,
    sent: Requests,
}

/// Fails the first call, returns two updates on the second, then idles
async fn flaky_updates(
    State(state): State<LoopState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let call = {
        let mut offsets = state.offsets.lock().await;
        offsets.push(body.get("offset").and_then(Value::as_i64));
        offsets.len() - 1
    };

    match call {
        0 => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "error_code": 500, "description": "Internal Server Error"})),
        ),
        1 => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "result": [
                    {"update_id": 7, "message": {"message_id": 1, "chat": {"id": -3, "type": "group"}, "text": "/start"}},
                    {"update_id": 8, "poll_answer": {"poll_id": "poll-9", "user": {"id": 4, "is_bot": false, "first_name": "B"}, "option_ids": [1]}}
                ]
            })),
        ),
        _ => {
            tokio::time::sleep(Duration::from_millis(50)).await;
            (StatusCode::OK, Json(json!({"ok": true, "result": []})))
        }
    }
}

async fn loop_send_message(State(state): State<LoopState>, Json(body): Json<Value>) -> Json<Value> {
    let chat_id = body["chat_id"].clone();
    state.sent.lock().await.push(body);
    Json(json!({
        "ok": true,
        "result": {"message_id": 2, "chat": {"id": chat_id, "type": "group"}}
    }))
}

#[tokio::test]
async fn test_polling_loop_recovers_and_advances_offset() {
    let state = LoopState::default();
    let router = Router::new()
        .route("/bottest-token/getUpdates", post(flaky_updates))
        .route("/bottest-token/sendMessage", post(loop_send_message))
        .with_state(state.clone());
    let mut config = TelegramConfig::new("test-token");
    config.api_url = serve(router).await;
    let telegram = Arc::new(TelegramClient::with_config(config).unwrap());

    // /start never touches the quote API
    let quotes = Arc::new(CoinMarketCapClient::with_config(CoinMarketCapConfig::new("unused")).unwrap());
    let votes = VoteStore::new();
    let responder = CommandResponder::new(quotes, Arc::clone(&telegram), "BTC");
    let dispatcher = Dispatcher::new(responder, votes.clone())
        .with_error_backoff(Duration::from_millis(20));

    // The loop only ends when cancelled
    let result = tokio::time::timeout(Duration::from_secs(2), dispatcher.run(&telegram)).await;
    assert!(result.is_err());

    let offsets = state.offsets.lock().await;
    assert!(offsets.len() >= 3);
    assert_eq!(offsets[0], None);
    // The failed call does not move the offset
    assert_eq!(offsets[1], None);
    assert_eq!(offsets[2], Some(9));
    assert!(offsets[2..].iter().all(|o| *o == Some(9)));

    let sent = state.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["chat_id"], -3);
    assert_eq!(sent[0]["text"], "Hi! Use /price to get the current price of BTC.");

    let answer = votes.answer("poll-9", 4).await.unwrap();
    assert!(answer.contains(&PollOption::Up50));
}
