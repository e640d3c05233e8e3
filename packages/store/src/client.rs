//! # Client: typed endpoints over any [`Remote`]
//!
//! [`Client`] turns backend calls into typed operations. Every request goes through
//! [`Client::call`], which applies the response contract:
//!
//! | Reply | Result |
//! |-------|--------|
//! | transport failure | [`SyncError::Transport`] (from the [`Remote`]) |
//! | HTTP status outside `2xx` | [`SyncError::Api`] with the body's `message`, default `"API Error"` |
//! | body is not an envelope | [`SyncError::Api`] |
//! | envelope `status != "Success"` | [`SyncError::Api`] with `message` |
//! | otherwise | the [`Envelope`] |
//!
//! No request is ever retried; the error goes straight back to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::SyncError;
use crate::models::{
    Credentials, Id, LoanPayload, PasswordReset, PaymentPayload, Registration, TaskPayload,
    UserInfo,
};
use crate::mutation::{FormMode, Submission};
use crate::remote::{Envelope, Method, Remote, Request};
use crate::resource::Resource;

pub const VERIFY_PATH: &str = "/auth/verifyToken";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
pub const TASKS_PATH: &str = "/tasks/getTasks";
pub const ADD_TASK_PATH: &str = "/tasks/addTask";
pub const UPDATE_TASK_PATH: &str = "/tasks/updateTask";
pub const DELETE_TASK_PATH: &str = "/tasks/deleteTask";
pub const LOANS_PATH: &str = "/loans";
pub const PAYMENTS_PATH: &str = "/loans/payments";

/// Typed access to the backend.
#[derive(Clone, Debug)]
pub struct Client<R: Remote> {
    remote: R,
}

impl<R: Remote> Client<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Send one request and check the response contract.
    pub async fn call(&self, request: Request) -> Result<Envelope, SyncError> {
        let method = request.method;
        let target = request.target();
        tracing::debug!("{method} {target}");

        let reply = self.remote.send(request).await.inspect_err(|e| {
            tracing::error!("{method} {target} failed: {e}");
        })?;

        if !reply.is_success() {
            let message = reply
                .body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            let err = SyncError::api(reply.status, message);
            tracing::error!("{method} {target} -> {}: {err}", reply.status);
            return Err(err);
        }

        let envelope: Envelope = serde_json::from_value(reply.body).map_err(|e| {
            SyncError::api(reply.status, Some(format!("Malformed response: {e}")))
        })?;

        if !envelope.is_success() {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string());
            tracing::warn!("{method} {target} rejected: {message}");
            return Err(SyncError::Api {
                status: reply.status,
                message,
            });
        }

        Ok(envelope)
    }

    async fn call_for<T: DeserializeOwned>(&self, request: Request) -> Result<T, SyncError> {
        let envelope = self.call(request).await?;
        decode_data(envelope.data.unwrap_or(Value::Null))
    }

    // --- auth ---

    /// Check the session cookie and return the signed-in user.
    pub async fn verify(&self) -> Result<UserInfo, SyncError> {
        self.call_for(Request::new(Method::Get, VERIFY_PATH)).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo, SyncError> {
        let request = Request::new(Method::Post, LOGIN_PATH).body(to_json(credentials)?);
        let envelope = self.call(request).await?;
        user_from_data(envelope.data)
    }

    pub async fn register(&self, registration: &Registration) -> Result<UserInfo, SyncError> {
        let request = Request::new(Method::Post, REGISTER_PATH).body(to_json(registration)?);
        let envelope = self.call(request).await?;
        user_from_data(envelope.data)
    }

    pub async fn forgot_password(&self, reset: &PasswordReset) -> Result<(), SyncError> {
        let request = Request::new(Method::Post, FORGOT_PASSWORD_PATH).body(to_json(reset)?);
        self.call(request).await.map(|_| ())
    }

    // --- resources ---

    /// Fetch the full list of a resource for a user.
    pub async fn list<T: Resource>(&self, user_id: Id) -> Result<Vec<T>, SyncError> {
        let request = Request::new(Method::Get, T::LIST_PATH).query("userId", user_id);
        let envelope = self.call(request).await?;
        match envelope.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(data) => decode_data(data),
        }
    }

    /// Create (`Add`) or update (`Edit`) a task.
    pub async fn save_task(
        &self,
        user_id: Id,
        submission: Submission<TaskPayload>,
    ) -> Result<(), SyncError> {
        let mut body = to_json(&submission.payload)?;
        let request = match submission.mode {
            FormMode::Add => {
                body["userId"] = json!(user_id);
                Request::new(Method::Post, ADD_TASK_PATH)
            }
            FormMode::Edit(id) => {
                body["id"] = json!(id);
                Request::new(Method::Put, UPDATE_TASK_PATH)
            }
        };
        self.call(request.body(body)).await.map(|_| ())
    }

    pub async fn delete_task(&self, id: Id) -> Result<(), SyncError> {
        let request = Request::new(Method::Delete, DELETE_TASK_PATH).body(json!({ "id": id }));
        self.call(request).await.map(|_| ())
    }

    /// Create (`Add`) or update (`Edit`) a loan.
    pub async fn save_loan(
        &self,
        user_id: Id,
        submission: Submission<LoanPayload>,
    ) -> Result<(), SyncError> {
        let mut body = to_json(&submission.payload)?;
        body["userId"] = json!(user_id);
        let request = match submission.mode {
            FormMode::Add => Request::new(Method::Post, LOANS_PATH),
            FormMode::Edit(id) => {
                body["id"] = json!(id);
                Request::new(Method::Put, LOANS_PATH)
            }
        };
        self.call(request.body(body)).await.map(|_| ())
    }

    /// Delete a loan together with its payment history.
    pub async fn delete_loan(&self, id: Id) -> Result<(), SyncError> {
        let request = Request::new(Method::Delete, LOANS_PATH).body(json!({ "id": id }));
        self.call(request).await.map(|_| ())
    }

    /// Register a payment. The server re-checks the amount against the balance.
    pub async fn register_payment(
        &self,
        submission: Submission<PaymentPayload>,
    ) -> Result<(), SyncError> {
        let request =
            Request::new(Method::Post, PAYMENTS_PATH).body(to_json(&submission.payload)?);
        self.call(request).await.map(|_| ())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, SyncError> {
    serde_json::to_value(value)
        .map_err(|e| SyncError::Transport(format!("could not encode request: {e}")))
}

fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, SyncError> {
    serde_json::from_value(data)
        .map_err(|e| SyncError::api(200, Some(format!("Malformed response: {e}"))))
}

/// Login and register answer `{ data: { user } }`; accept a bare user as well.
fn user_from_data(data: Option<Value>) -> Result<UserInfo, SyncError> {
    let data = data.unwrap_or(Value::Null);
    match data.get("user") {
        Some(user) => decode_data(user.clone()),
        None => decode_data(data),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::Task;
    use crate::remote::Reply;

    /// Answers every request with a fixed reply and records what it saw.
    struct Canned {
        reply: Result<Reply, SyncError>,
        seen: RefCell<Vec<Request>>,
    }

    impl Canned {
        fn new(reply: Result<Reply, SyncError>) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Remote for Canned {
        async fn send(&self, request: Request) -> Result<Reply, SyncError> {
            self.seen.borrow_mut().push(request);
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_non_2xx_uses_body_message() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            401,
            json!({ "status": "Failed", "message": "Invalid credentials" }),
        ))));
        let err = client.verify().await.unwrap_err();
        assert_eq!(
            err,
            SyncError::Api {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_2xx_without_message_is_api_error() {
        let client = Client::new(Canned::new(Ok(Reply::new(502, Value::Null))));
        let err = client.list::<Task>(1).await.unwrap_err();
        assert_eq!(err.to_string(), "API Error");
    }

    #[tokio::test]
    async fn test_status_other_than_success_is_api_error() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Failed", "message": "Task not found" }),
        ))));
        let err = client.delete_task(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let client = Client::new(Canned::new(Err(SyncError::Transport(
            "connection refused".to_string(),
        ))));
        let err = client.list::<Task>(1).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_list_sends_user_query_and_decodes() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success", "data": [
                { "id": 1, "task": "Write report", "priority": 8, "userId": 4 }
            ]}),
        ))));
        let tasks = client.list::<Task>(4).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, 8);

        let seen = client.remote().seen.borrow();
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].target(), "/tasks/getTasks?userId=4");
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn test_save_task_shapes_add_and_edit_bodies() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success" }),
        ))));
        let payload = TaskPayload {
            task: "Write report".to_string(),
            priority: 8,
        };
        client
            .save_task(
                4,
                Submission {
                    mode: FormMode::Add,
                    payload: payload.clone(),
                },
            )
            .await
            .unwrap();
        client
            .save_task(
                4,
                Submission {
                    mode: FormMode::Edit(11),
                    payload,
                },
            )
            .await
            .unwrap();

        let seen = client.remote().seen.borrow();
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(seen[0].path, ADD_TASK_PATH);
        assert_eq!(seen[0].body.as_ref().unwrap()["userId"], json!(4));
        assert_eq!(seen[1].method, Method::Put);
        assert_eq!(seen[1].path, UPDATE_TASK_PATH);
        assert_eq!(seen[1].body.as_ref().unwrap()["id"], json!(11));
        assert!(seen[1].body.as_ref().unwrap().get("userId").is_none());
    }

    #[tokio::test]
    async fn test_login_reads_nested_user() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success", "data": { "user": {
                "id": 2, "name": "Asha", "email": "asha@example.com"
            }}}),
        ))));
        let user = client
            .login(&Credentials {
                email: "asha@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.display_name(), "Asha");
    }

    #[tokio::test]
    async fn test_list_without_data_is_empty() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success" }),
        ))));
        let tasks = client.list::<Task>(4).await.unwrap();
        assert!(tasks.is_empty());

        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success", "data": null }),
        ))));
        assert!(client.list::<Task>(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forgot_password_posts_email() {
        let client = Client::new(Canned::new(Ok(Reply::new(
            200,
            json!({ "status": "Success", "message": "Reset link sent" }),
        ))));
        client
            .forgot_password(&PasswordReset {
                email: "asha@example.com".to_string(),
            })
            .await
            .unwrap();

        let seen = client.remote().seen.borrow();
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(seen[0].path, FORGOT_PASSWORD_PATH);
        assert_eq!(
            seen[0].body,
            Some(json!({ "email": "asha@example.com" }))
        );
    }
}
