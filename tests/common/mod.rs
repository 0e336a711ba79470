//! In-process fake of the user REST API.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use userdesk::api::User;
use userdesk::{ApiClient, ClientConfig, PageContext, SessionContext};

/// How the fake answers a successful `PUT /users/{id}`
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutStyle {
    NoContent,
    JsonSuccess,
    JsonMessage,
    /// A proxy page in front of the service
    HtmlPage,
}

pub struct FakeState {
    pub users: Mutex<Vec<(User, String)>>,
    pub requests: AtomicUsize,
    pub authorizations: Mutex<Vec<Option<String>>>,
    pub put_style: Mutex<PutStyle>,
    pub register_returns_token: Mutex<bool>,
    pub validate_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeState {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.authorizations.lock().unwrap().last().cloned().flatten()
    }

    pub fn set_put_style(&self, style: PutStyle) {
        *self.put_style.lock().unwrap() = style;
    }

    pub fn set_register_returns_token(&self, value: bool) {
        *self.register_returns_token.lock().unwrap() = value;
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone())
    }

    /// Add a user with password and token
    pub fn add_user(&self, id: i64, username: &str, password: &str, token: &str) {
        let user = User {
            id,
            name: format!("{} name", username),
            username: username.to_string(),
            status: "OFFLINE".to_string(),
            date: "2025-03-01".to_string(),
            birthday: None,
            token: Some(token.to_string()),
        };
        self.users.lock().unwrap().push((user, password.to_string()));
    }

    fn record(&self, headers: &HeaderMap) -> Option<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorizations.lock().unwrap().push(auth.clone());
        auth
    }

    fn token_known(&self, token: &str) -> bool {
        self.users
            .lock()
            .unwrap()
            .iter()
            .any(|(u, _)| u.token.as_deref() == Some(token))
    }
}

type Shared = Arc<FakeState>;

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<LoginBody>) -> Response {
    state.record(&headers);
    let users = state.users.lock().unwrap();
    match users
        .iter()
        .find(|(u, pw)| u.username == body.username && *pw == body.password)
    {
        Some((user, _)) => Json(json!({ "id": user.id, "token": user.token })).into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    name: String,
    password: String,
    birthday: Option<String>,
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<RegisterBody>,
) -> Response {
    state.record(&headers);
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|(u, _)| u.username == body.username) {
        return message(StatusCode::CONFLICT, "Username already exists");
    }

    let id = users.len() as i64 + 1;
    let token = format!("tok-{}", id);
    users.push((
        User {
            id,
            name: body.name,
            username: body.username,
            status: "ONLINE".to_string(),
            date: "2025-03-02".to_string(),
            birthday: body.birthday,
            token: Some(token.clone()),
        },
        body.password,
    ));

    if *state.register_returns_token.lock().unwrap() {
        (StatusCode::CREATED, Json(json!({ "id": id, "token": token }))).into_response()
    } else {
        (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
    }
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let auth = state.record(&headers);
    if !auth.map(|t| state.token_known(&t)).unwrap_or(false) {
        return message(StatusCode::UNAUTHORIZED, "Not authorized");
    }
    let users: Vec<User> = state
        .users
        .lock()
        .unwrap()
        .iter()
        .map(|(u, _)| User {
            token: None,
            ..u.clone()
        })
        .collect();
    Json(users).into_response()
}

async fn get_user(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let auth = state.record(&headers);
    if !auth.map(|t| state.token_known(&t)).unwrap_or(false) {
        return message(StatusCode::UNAUTHORIZED, "Not authorized");
    }
    match state.user(id) {
        Some(user) => Json(user).into_response(),
        None => message(StatusCode::NOT_FOUND, "User not found"),
    }
}

#[derive(Deserialize)]
struct UpdateBody {
    username: Option<String>,
    birthday: Option<String>,
}

async fn update_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBody>,
) -> Response {
    let auth = state.record(&headers);
    let style = *state.put_style.lock().unwrap();
    let mut users = state.users.lock().unwrap();

    let Some((user, _)) = users.iter_mut().find(|(u, _)| u.id == id) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    if auth.as_deref() != user.token.as_deref() {
        return message(StatusCode::FORBIDDEN, "You may only edit your own profile");
    }

    if style == PutStyle::JsonMessage {
        return Json(json!({ "status": "error", "message": "Username already taken" }))
            .into_response();
    }
    if style == PutStyle::HtmlPage {
        return (
            [(axum::http::header::CONTENT_TYPE, "text/html")],
            "<html>proxy error</html>",
        )
            .into_response();
    }

    if let Some(username) = body.username {
        user.username = username;
    }
    user.birthday = body.birthday;

    match style {
        PutStyle::NoContent => StatusCode::NO_CONTENT.into_response(),
        _ => Json(json!({ "status": "success" })).into_response(),
    }
}

async fn validate(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let auth = state.record(&headers);
    state.validate_calls.fetch_add(1, Ordering::SeqCst);
    let users = state.users.lock().unwrap();
    match users
        .iter()
        .find(|(u, _)| auth.is_some() && u.token == auth)
    {
        Some((user, _)) => Json(json!({ "id": user.id })).into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record(&headers);
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT.into_response()
}

/// Start the fake server. Returns its shared state and base URL.
pub async fn spawn_server() -> (Shared, String) {
    let state = Arc::new(FakeState {
        users: Mutex::new(Vec::new()),
        requests: AtomicUsize::new(0),
        authorizations: Mutex::new(Vec::new()),
        put_style: Mutex::new(PutStyle::NoContent),
        register_returns_token: Mutex::new(true),
        validate_calls: AtomicUsize::new(0),
        logout_calls: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/login/auth", post(login))
        .route("/users", post(register).get(list_users))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/auth/validate", get(validate))
        .route("/logout", post(logout))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, format!("http://{}", addr))
}

/// Page context against the fake, with an in-memory session
pub fn context(base_url: &str) -> PageContext {
    let api = ApiClient::new(ClientConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
    })
    .unwrap();
    PageContext::new(api, SessionContext::in_memory())
}
