use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
};
use recordsheet_api::{
    ApiError, ApiRequest, Client, Method, Request, RequestData, SharedCsrfToken, StaticCsrfToken,
    endpoints::journal::{Journal, NewJournal, NewPost},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::borrow::Cow;
use std::sync::{Arc, Mutex};

/// What the fake server saw for each request.
#[derive(Debug, Clone)]
struct Seen {
    csrf: Option<String>,
    content_type: Option<String>,
    query: Option<String>,
    body: Option<Value>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_accounts(
    State(log): State<Log>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    log.lock().unwrap().push(Seen {
        csrf: header(&headers, "x-csrf-token"),
        content_type: header(&headers, "content-type"),
        query,
        body: None,
    });
    Json(json!({
        "accounts": [
            {"id": 1, "name": "CASH", "desc": "Wallet"},
            {"id": 2, "name": "CASHIERS CHECK", "desc": ""}
        ]
    }))
}

async fn create_account(
    State(log): State<Log>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    log.lock().unwrap().push(Seen {
        csrf: header(&headers, "x-csrf-token"),
        content_type: header(&headers, "content-type"),
        query: None,
        body: Some(body.clone()),
    });
    if body["name"] == "DUPLICATE" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"errorMsg": "Bad Request"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"id": 10, "name": body["name"], "desc": body["desc"], "closed": false})),
    )
}

async fn create_journal(
    State(log): State<Log>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    log.lock().unwrap().push(Seen {
        csrf: header(&headers, "x-csrf-token"),
        content_type: header(&headers, "content-type"),
        query: None,
        body: Some(body.clone()),
    });
    (
        StatusCode::OK,
        Json(json!({"id": 77, "memo": body["memo"], "void": false, "batch_id": 1})),
    )
}

async fn template(Path(name): Path<String>) -> String {
    format!("<div data-template=\"{}\"></div>", name)
}

async fn spawn_server() -> (String, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/ledger/json/accounts", get(list_accounts).put(create_account))
        .route("/ledger/json/journal", put(create_journal))
        .route("/ledger/static/html/{name}", get(template))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

fn sample_journal() -> NewJournal {
    NewJournal {
        datetime: chrono::Utc::now(),
        memo: "Lunch".to_string(),
        posts: vec![
            NewPost {
                id: None,
                account_id: "CASH".to_string(),
                amount: "-12.5".parse().unwrap(),
                memo: String::new(),
            },
            NewPost {
                id: None,
                account_id: "EXPENSES:FOOD".to_string(),
                amount: "12.5".parse().unwrap(),
                memo: String::new(),
            },
        ],
    }
}

#[tokio::test]
async fn lists_accounts_sorted_by_name_without_csrf() {
    let (url, log) = spawn_server().await;
    let client = Client::new(&url, "/ledger").with_csrf_token(StaticCsrfToken::new("tok"));

    let response = client.send(Request::accounts().list()).await.unwrap();

    let names: Vec<_> = response.accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["CASH", "CASHIERS CHECK"]);
    assert_eq!(response.accounts[0].description, "Wallet");

    let seen = log.lock().unwrap();
    assert_eq!(seen[0].query.as_deref(), Some("sort=name.asc"));
    assert_eq!(seen[0].csrf, None);
}

#[tokio::test]
async fn put_requests_carry_csrf_and_json_headers() {
    let (url, log) = spawn_server().await;
    let client = Client::new(&url, "ledger").with_csrf_token(StaticCsrfToken::new("tok-1"));

    let created = client
        .send(Request::accounts().create("SAVINGS", "Rainy day"))
        .await
        .unwrap();

    assert_eq!(created.name, "SAVINGS");
    assert_eq!(created.description, "Rainy day");

    let seen = log.lock().unwrap();
    assert_eq!(seen[0].csrf.as_deref(), Some("tok-1"));
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        seen[0].body,
        Some(json!({"name": "SAVINGS", "desc": "Rainy day"}))
    );
}

#[tokio::test]
async fn csrf_token_is_reread_for_every_request() {
    let (url, log) = spawn_server().await;
    let token = SharedCsrfToken::new("before");
    let client = Client::new(&url, "/ledger").with_csrf_token(token.clone());

    client.send(Request::journal().create(sample_journal())).await.unwrap();
    token.rotate("after");
    client.send(Request::journal().create(sample_journal())).await.unwrap();

    let seen = log.lock().unwrap();
    let tokens: Vec<_> = seen.iter().map(|s| s.csrf.clone().unwrap()).collect();
    assert_eq!(tokens, vec!["before", "after"]);
}

#[tokio::test]
async fn journal_body_matches_wire_format() {
    let (url, log) = spawn_server().await;
    let client = Client::new(&url, "/ledger").with_csrf_token(StaticCsrfToken::new("tok"));

    let journal = client
        .send(Request::journal().create(sample_journal()))
        .await
        .unwrap();
    assert_eq!(journal.id, Some(77));

    let seen = log.lock().unwrap();
    let body = seen[0].body.clone().unwrap();
    assert_eq!(body["memo"], "Lunch");
    assert_eq!(
        body["posts"],
        json!([
            {"account_id": "CASH", "amount": "-12.50", "memo": ""},
            {"account_id": "EXPENSES:FOOD", "amount": "12.50", "memo": ""}
        ])
    );
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (url, _log) = spawn_server().await;
    let client = Client::new(&url, "/ledger").with_csrf_token(StaticCsrfToken::new("tok"));

    let err = client
        .send(Request::accounts().create("DUPLICATE", ""))
        .await
        .unwrap_err();

    match err {
        ApiError::Server { status, ref message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Bad Request");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Bad Request");
}

#[tokio::test]
async fn missing_csrf_token_stops_put_before_sending() {
    let (url, log) = spawn_server().await;
    let client = Client::new(&url, "/ledger");

    let err = client
        .send(Request::journal().create(sample_journal()))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::MissingCsrfToken));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(&format!("http://{}", addr), "");
    let err = client.send(Request::accounts().list()).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message(), "Unable to reach the server");
}

#[tokio::test]
async fn fetches_raw_template_markup() {
    let (url, _log) = spawn_server().await;
    let client = Client::new(&url, "/ledger");

    let markup = client
        .fetch_template(Request::templates().get("create-tr.html"))
        .await
        .unwrap();

    assert_eq!(markup, "<div data-template=\"create-tr.html\"></div>");
}

/// A journal body still carrying client-side bookkeeping under `_` keys.
#[derive(Serialize)]
struct DraftBody {
    memo: String,
    #[serde(rename = "_errorMsg")]
    error_msg: String,
    posts: Vec<DraftPost>,
}

#[derive(Serialize)]
struct DraftPost {
    account_id: String,
    amount: String,
    #[serde(rename = "_key")]
    key: u32,
    #[serde(rename = "_posted")]
    posted: bool,
}

struct PutDraft(DraftBody);

impl ApiRequest for PutDraft {
    type Data = DraftBody;
    type Response = Journal;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        "/json/journal".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.0)
    }
}

#[tokio::test]
async fn underscore_keys_never_reach_the_server() {
    let (url, log) = spawn_server().await;
    let client = Client::new(&url, "/ledger").with_csrf_token(StaticCsrfToken::new("tok"));

    let draft = DraftBody {
        memo: "Lunch".to_string(),
        error_msg: "Bad memo".to_string(),
        posts: vec![DraftPost {
            account_id: "CASH".to_string(),
            amount: "-12.50".to_string(),
            key: 3,
            posted: false,
        }],
    };
    let journal = client.send(PutDraft(draft)).await.unwrap();
    assert_eq!(journal.id, Some(77));

    let seen = log.lock().unwrap();
    assert_eq!(
        seen[0].body,
        Some(json!({
            "memo": "Lunch",
            "posts": [{"account_id": "CASH", "amount": "-12.50"}]
        }))
    );
}
