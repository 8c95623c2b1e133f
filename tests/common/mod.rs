#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use codeabode_client::ClientState;
use codeabode_client::config::ClientConfig;
use serde_json::{Value, json};

pub const PASSWORD: &str = "hunter2";
const TOKEN: &str = "t0k3n";
const CLEAR_COOKIES: [(&str, &str); 2] = [
    ("set-cookie", "token=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict"),
    ("set-cookie", "name=; Path=/; Max-Age=0; SameSite=Strict"),
];

/// In-process stand-in for the Codeabode backend.
#[derive(Default)]
pub struct Backend {
    pub revoked: AtomicBool,
    pub drop_comments: AtomicBool,
    pub student_fetches: AtomicUsize,
    pub project_fetches: AtomicUsize,
    pub list_fetches: AtomicUsize,
    pub views: AtomicUsize,
    pub submissions: Mutex<Vec<Value>>,
    pub asked: Mutex<Vec<Value>>,
    pub questions: Mutex<Vec<Value>>,
    next_comment_id: AtomicI64,
}

pub struct MockBackend {
    pub base_url: String,
    pub backend: Arc<Backend>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let backend = Arc::new(Backend {
            questions: Mutex::new(vec![json!({
                "id": 1,
                "student_name": "Ada",
                "error": "NameError: name 'scroe' is not defined",
                "interpretation": "I spelled score wrong?",
                "question": "Why does my score not update?",
                "work": "score = 0\nscroe += 1",
                "created_at": "2025-03-01T10:00:00Z",
                "comments": []
            })]),
            next_comment_id: AtomicI64::new(100),
            ..Backend::default()
        });

        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/reset-password", post(reset_password))
            .route("/api/list_students", post(list_students))
            .route("/api/get_student/{id}", post(get_student))
            .route("/api/submit/{kind}", post(submit_work))
            .route("/api/get_questions", get(get_questions))
            .route("/api/ask", post(ask))
            .route("/api/comment", post(comment))
            .route("/api/projects", get(list_projects))
            .route("/api/submit_project", post(submit_project))
            .route("/api/projects/{id}/view", post(record_view))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            backend,
        }
    }

    pub fn client(&self) -> ClientState {
        ClientState::connect(ClientConfig::new(&self.base_url)).expect("Failed to build client state")
    }

    pub async fn signed_in_client(&self, username: &str) -> ClientState {
        let state = self.client();
        state
            .session
            .login(username, PASSWORD)
            .await
            .expect("Failed to sign in");
        state
    }
}

type Shared = State<Arc<Backend>>;

fn authed(backend: &Backend, headers: &HeaderMap) -> bool {
    if backend.revoked.load(Ordering::SeqCst) {
        return false;
    }
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.split("; ").any(|pair| pair == format!("token={}", TOKEN)))
        .unwrap_or(false)
}

fn unauthorized(body: &str) -> Response {
    (StatusCode::UNAUTHORIZED, AppendHeaders(CLEAR_COOKIES), body.to_string()).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "Incorrect password").into_response();
    }
    let username = body["username"].as_str().unwrap_or_default();
    let name_cookie = format!(
        "name={}; Path=/; Max-Age=1296000; SameSite=Strict",
        urlencoding::encode(username)
    );
    let token_cookie = format!("token={}; Path=/; Max-Age=1296000; HttpOnly; SameSite=Strict", TOKEN);
    (
        StatusCode::OK,
        AppendHeaders([(SET_COOKIE, name_cookie), (SET_COOKIE, token_cookie)]),
        "Login successful",
    )
        .into_response()
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return unauthorized("Incorrect password");
    }
    (
        StatusCode::OK,
        AppendHeaders(CLEAR_COOKIES),
        "Password reset successfully: 1 tokens cleared",
    )
        .into_response()
}

async fn list_students(State(backend): Shared, headers: HeaderMap) -> Response {
    backend.list_fetches.fetch_add(1, Ordering::SeqCst);
    if !authed(&backend, &headers) {
        return unauthorized("Invalid token or database error");
    }
    Json(json!([{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}, {"id": 3, "name": "Adam"}]))
        .into_response()
}

pub fn student_fixture() -> Value {
    json!({
        "id": 1,
        "name": "Ada",
        "age": 11,
        "current_level": "Python: if/else, print()",
        "final_goal": "RPG shooter",
        "future_concepts": ["dicts", "classes"],
        "notes": "likes dragons",
        "current_class": 4,
        "classes": [
            {"class_id": 4, "status": "upcoming", "name": "Lists", "methods": ["append", "pop"],
             "stretch_methods": ["sort"], "description": "inventory",
             "classwork": "Make an inventory list", "notes": null, "hw": "Add three items", "hw_notes": null},
            {"class_id": 3, "status": "Completed", "name": "Loops", "methods": ["for", "while"],
             "stretch_methods": null, "description": "game loop",
             "classwork": "Loop until quit", "notes": "good", "hw": null, "hw_notes": null,
             "classwork_submission": "while True: pass"},
            {"class_id": 2, "status": "assessment", "name": "Your Dice Roller", "methods": [],
             "skills_tested": ["random", "if"], "description": "roll dice",
             "classwork": null, "notes": null, "hw": null, "hw_notes": null},
            {"class_id": 1, "status": "done", "name": "Variables", "methods": ["int", "str"],
             "stretch_methods": null, "description": "hp",
             "classwork": "Store hp", "notes": null, "hw": null, "hw_notes": null}
        ]
    })
}

async fn get_student(State(backend): Shared, headers: HeaderMap, Path(id): Path<i32>) -> Response {
    backend.student_fetches.fetch_add(1, Ordering::SeqCst);
    if !authed(&backend, &headers) {
        return (StatusCode::NOT_FOUND, AppendHeaders(CLEAR_COOKIES)).into_response();
    }
    if id != 1 {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(student_fixture()).into_response()
}

async fn submit_work(
    State(backend): Shared,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authed(&backend, &headers) {
        return unauthorized("No token provided");
    }
    if body["work"].as_str().map(str::is_empty).unwrap_or(true) {
        return (StatusCode::BAD_REQUEST, "Work cannot be empty").into_response();
    }
    let mut record = body.clone();
    record["kind"] = json!(kind);
    backend.submissions.lock().unwrap().push(record);
    StatusCode::OK.into_response()
}

async fn get_questions(State(backend): Shared, headers: HeaderMap) -> Response {
    if !authed(&backend, &headers) {
        return unauthorized("No token provided");
    }
    Json(Value::Array(backend.questions.lock().unwrap().clone())).into_response()
}

async fn ask(State(backend): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authed(&backend, &headers) {
        return unauthorized("No token provided");
    }
    backend.asked.lock().unwrap().push(body);
    StatusCode::CREATED.into_response()
}

async fn comment(State(backend): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authed(&backend, &headers) {
        return unauthorized("No token provided");
    }
    let created_at = "2025-03-01T12:30:00Z".to_string();
    if !backend.drop_comments.load(Ordering::SeqCst) {
        let author = headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|c| c.split("; ").find_map(|pair| pair.strip_prefix("name=")))
            .map(|raw| urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_default());
        let id = backend.next_comment_id.fetch_add(1, Ordering::SeqCst);
        let mut questions = backend.questions.lock().unwrap();
        if let Some(question) = questions.iter_mut().find(|q| q["id"] == body["question_id"]) {
            question["comments"]
                .as_array_mut()
                .expect("comments array")
                .push(json!({
                    "id": id,
                    "account_name": author,
                    "comment": body["comment"],
                    "created_at": created_at,
                }));
        }
    }
    created_at.into_response()
}

pub fn projects_fixture() -> Value {
    json!([
        {"id": 10, "title": "Pong", "description": "two paddles", "author_name": "ada",
         "views": 5, "status": "ready", "created_at": "2025-02-01T00:00:00Z",
         "url": "https://play.example/10"},
        {"id": 11, "title": "Snake", "description": "eat apples", "author_name": null,
         "views": 0, "status": "building", "created_at": "2025-02-02T00:00:00Z", "url": ""},
        {"id": 12, "title": "Tetris", "description": "blocks", "author_name": "grace",
         "views": 9, "status": "ready", "created_at": "2025-02-03T00:00:00Z",
         "url": "https://play.example/12"}
    ])
}

async fn list_projects(State(backend): Shared) -> Response {
    backend.project_fetches.fetch_add(1, Ordering::SeqCst);
    Json(projects_fixture()).into_response()
}

async fn submit_project(State(backend): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authed(&backend, &headers) {
        return unauthorized("No token provided");
    }
    if body["deploy_method"] != "pygbag" {
        return (StatusCode::BAD_REQUEST, "Unsupported deploy method").into_response();
    }
    Json(json!({"id": 77, "status": "pending"})).into_response()
}

async fn record_view(State(backend): Shared, Path(_id): Path<i64>) -> StatusCode {
    backend.views.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}
