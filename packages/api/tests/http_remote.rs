use std::collections::HashMap;

use api::HttpRemote;
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use store::models::{Credentials, TaskPayload};
use store::{Client, FormMode, Submission, SyncError, Task};

async fn list_tasks(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let user_id: i64 = query.get("userId").and_then(|v| v.parse().ok()).unwrap_or(-1);
    Json(json!({
        "status": "Success",
        "data": [{ "id": 1, "task": "Write report", "priority": 8, "userId": user_id }]
    }))
}

async fn add_task(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json || body["userId"] != json!(7) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "Failed", "message": "bad request" })),
        );
    }
    (StatusCode::CREATED, Json(json!({ "status": "Success", "data": body })))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] != json!("secret") {
        return (
            StatusCode::UNAUTHORIZED,
            HeaderMap::new(),
            Json(json!({ "status": "Failed", "message": "Invalid email or password" })),
        );
    }
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, "token=abc123; Path=/".parse().unwrap());
    (
        StatusCode::OK,
        headers,
        Json(json!({ "status": "Success", "data": { "user": {
            "id": 7, "name": "Asha", "email": body["email"]
        }}})),
    )
}

async fn verify(headers: HeaderMap) -> impl IntoResponse {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("token=abc123"));
    if signed_in {
        (
            StatusCode::OK,
            Json(json!({ "status": "Success", "data": { "id": 7, "email": "asha@example.com" } })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "Failed", "message": "Unauthorized" })),
        )
    }
}

async fn soft_failure() -> Json<Value> {
    Json(json!({ "status": "Failed", "message": "Task not found" }))
}

async fn crash() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "oops")
}

async fn serve() -> String {
    let app = Router::new()
        .route("/tasks/getTasks", get(list_tasks))
        .route("/tasks/addTask", post(add_task))
        .route("/tasks/deleteTask", axum::routing::delete(soft_failure))
        .route("/auth/login", post(login))
        .route("/auth/verifyToken", get(verify))
        .route("/loans", get(crash));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn client(base: &str) -> Client<HttpRemote> {
    Client::new(HttpRemote::new(base).unwrap())
}

#[tokio::test]
async fn test_list_sends_query_and_decodes() {
    let client = client(&serve().await);
    let tasks = client.list::<Task>(7).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].user_id, Some(7));
    assert_eq!(tasks[0].priority, 8);
}

#[tokio::test]
async fn test_body_is_sent_as_json() {
    let client = client(&serve().await);
    client
        .save_task(
            7,
            Submission {
                mode: FormMode::Add,
                payload: TaskPayload {
                    task: "Write report".to_string(),
                    priority: 8,
                },
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_session_cookie_is_kept() {
    let client = client(&serve().await);
    assert!(client.verify().await.is_err());

    let user = client
        .login(&Credentials {
            email: "asha@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.display_name(), "Asha");
    assert_eq!(client.verify().await.unwrap().id, 7);
}

#[tokio::test]
async fn test_error_statuses() {
    let client = client(&serve().await);

    let err = client.verify().await.unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized");

    let err = client.delete_task(3).await.unwrap_err();
    assert_eq!(
        err,
        SyncError::Api {
            status: 200,
            message: "Task not found".to_string()
        }
    );

    let err = client.list::<store::Loan>(7).await.unwrap_err();
    assert_eq!(err.to_string(), "API Error");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{addr}"));
    let err = client.list::<Task>(1).await.unwrap_err();
    assert!(err.is_transport());
}
