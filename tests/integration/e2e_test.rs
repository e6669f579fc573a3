//! End-to-end tests: stub Telegram and quote APIs, real clients

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use coin_poll_bot::announce::ResultsAnnouncer;
use coin_poll_bot::bot::{CommandResponder, Dispatcher};
use coin_poll_bot::config::Config;
use coin_poll_bot::poll::VoteStore;
use coin_poll_bot::quote::{CoinMarketCapClient, CoinMarketCapConfig};
use coin_poll_bot::telegram::{TelegramClient, TelegramConfig, Update};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

type Sent = Arc<Mutex<Vec<Value>>>;

const BROADCAST_CHAT: i64 = -999;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.quote.symbol, "BTC");
    assert_eq!(config.announce.interval_secs, 604_800);
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn record(State(sent): State<Sent>, Json(body): Json<Value>) -> Json<Value> {
    let chat_id = body["chat_id"].clone();
    let is_poll = body.get("question").is_some();
    sent.lock().await.push(body);

    let mut result = json!({"message_id": 1, "chat": {"id": chat_id, "type": "group"}});
    if is_poll {
        result["poll"] = json!({"id": "P1", "question": "Price Prediction"});
    }
    Json(json!({"ok": true, "result": result}))
}

struct Harness {
    dispatcher: Dispatcher<CoinMarketCapClient, TelegramClient>,
    announcer: ResultsAnnouncer<TelegramClient>,
    votes: VoteStore,
    sent: Sent,
}

async fn harness() -> Harness {
    let sent: Sent = Arc::default();
    let telegram_router = Router::new()
        .route("/bottoken/sendMessage", post(record))
        .route("/bottoken/sendPoll", post(record))
        .with_state(Arc::clone(&sent));
    let quote_router = Router::new().route(
        "/v1/cryptocurrency/quotes/latest",
        get(|| async {
            Json(json!({"data": {"DOGE": {"quote": {"USD": {"price": 0.1234, "market_cap": 17500000000.0}}}}}))
        }),
    );

    let mut telegram_config = TelegramConfig::new("token");
    telegram_config.api_url = serve(telegram_router).await;
    let telegram = Arc::new(TelegramClient::with_config(telegram_config).unwrap());

    let mut quote_config = CoinMarketCapConfig::new("key");
    quote_config.base_url = serve(quote_router).await;
    let quotes = Arc::new(CoinMarketCapClient::with_config(quote_config).unwrap());

    let votes = VoteStore::new();
    let responder = CommandResponder::new(quotes, Arc::clone(&telegram), "DOGE");
    Harness {
        dispatcher: Dispatcher::new(responder, votes.clone()),
        announcer: ResultsAnnouncer::new(votes.clone(), telegram, BROADCAST_CHAT),
        votes,
        sent,
    }
}

fn update(value: Value) -> Update {
    serde_json::from_value(value).unwrap()
}

fn command(id: i64, text: &str) -> Update {
    update(json!({
        "update_id": id,
        "message": {"message_id": id, "chat": {"id": -1, "type": "group"}, "text": text}
    }))
}

fn answer(id: i64, user: u64, options: &[u32]) -> Update {
    update(json!({
        "update_id": id,
        "poll_answer": {"poll_id": "P1", "user": {"id": user, "is_bot": false, "first_name": "U"}, "option_ids": options}
    }))
}

#[tokio::test]
async fn test_commands_reply_through_transport() {
    let h = harness().await;

    h.dispatcher.handle_update(command(1, "/start")).await;
    h.dispatcher.handle_update(command(2, "/price")).await;
    h.dispatcher.handle_update(command(3, "/mcap")).await;
    h.dispatcher.handle_update(command(4, "/poll")).await;

    let sent = h.sent.lock().await;
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0]["text"], "Hi! Use /price to get the current price of DOGE.");
    assert_eq!(
        sent[1]["text"],
        "The current price of DOGE is $0.1234000000\n Use /poll to start a poll!"
    );
    assert_eq!(
        sent[2]["text"],
        "The current market cap of DOGE is $17,500,000,000.00 and the price is $0.123400000000."
    );
    assert_eq!(sent[3]["question"], "Price Prediction");
    assert!(sent.iter().all(|body| body["chat_id"] == -1));
}

#[tokio::test]
async fn test_votes_announced_to_broadcast_chat() {
    let h = harness().await;

    h.dispatcher.handle_update(answer(1, 10, &[0])).await;
    h.dispatcher.handle_update(answer(2, 10, &[3])).await;
    h.dispatcher.handle_update(answer(3, 11, &[3])).await;
    h.dispatcher.handle_update(answer(4, 12, &[4])).await;

    let report = h.announcer.announce_once().await;
    assert_eq!(report.delivered, vec!["P1".to_string()]);
    assert!(h.votes.is_empty().await);

    let sent = h.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["chat_id"], BROADCAST_CHAT);
    assert_eq!(
        sent[0]["text"],
        "Poll Results:\n0: 0 votes\n1: 0 votes\n2: 0 votes\n3: 2 votes\n4: 1 votes"
    );
}

#[tokio::test]
async fn test_announce_empty_store_is_noop() {
    let h = harness().await;

    let report = h.announcer.announce_once().await;
    assert!(report.is_empty());
    assert!(h.sent.lock().await.is_empty());
    assert!(h.votes.is_empty().await);
}
