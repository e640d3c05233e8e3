use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::{
    ADD_TASK_PATH, DELETE_TASK_PATH, FORGOT_PASSWORD_PATH, LOANS_PATH, LOGIN_PATH,
    PAYMENTS_PATH, REGISTER_PATH, TASKS_PATH, UPDATE_TASK_PATH, VERIFY_PATH,
};
use crate::error::SyncError;
use crate::models::{
    Credentials, Id, LenderType, Loan, LoanPayload, LoanStatus, PaymentPayload, Registration,
    Task, TaskPayload, UserInfo,
};
use crate::remote::{Envelope, Method, Remote, Reply, Request};

/// In-memory backend implementing every endpoint, for tests and the offline demo.
///
/// Applies the server's rules: remaining balance is `amount` minus payments, a loan
/// whose balance reaches zero becomes "Paid Off", and overpayments are refused.
#[derive(Clone, Debug, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Backend>>,
}

#[derive(Debug, Default)]
struct Backend {
    next_id: Id,
    users: Vec<(UserInfo, String)>,
    session: Option<Id>,
    tasks: Vec<Task>,
    loans: Vec<Loan>,
    payments: Vec<PaymentPayload>,
    offline: bool,
    fail_next: Option<(u16, String)>,
    log: Vec<Request>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithIds<T> {
    #[serde(default)]
    id: Option<Id>,
    #[serde(default)]
    user_id: Option<Id>,
    #[serde(flatten)]
    fields: T,
}

#[derive(Deserialize)]
struct IdOnly {
    id: Id,
}

type Answer = Result<(u16, Value), (u16, String)>;

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Backend> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed_user(&self, name: &str, email: &str, password: &str) -> UserInfo {
        let mut backend = self.inner();
        let user = UserInfo {
            id: backend.next(),
            name: Some(name.to_string()),
            email: email.to_string(),
        };
        backend.users.push((user.clone(), password.to_string()));
        user
    }

    /// Mark `user_id` as signed in, as a session cookie would.
    pub fn sign_in(&self, user_id: Id) {
        self.inner().session = Some(user_id);
    }

    pub fn sign_out(&self) {
        self.inner().session = None;
    }

    pub fn seed_task(&self, user_id: Id, text: &str, priority: u8) -> Task {
        let mut backend = self.inner();
        let task = Task {
            id: backend.next(),
            task: text.to_string(),
            priority,
            user_id: Some(user_id),
        };
        backend.tasks.push(task.clone());
        task
    }

    pub fn seed_loan(
        &self,
        user_id: Id,
        lender_name: &str,
        lender_type: LenderType,
        amount: Decimal,
    ) -> Loan {
        let mut backend = self.inner();
        let loan = Loan {
            id: backend.next(),
            lender_name: lender_name.to_string(),
            lender_type,
            amount,
            interest_rate: Decimal::ZERO,
            taken_date: None,
            due_date: None,
            repayment_terms: None,
            notes: None,
            status: LoanStatus::Active,
            remaining_balance: amount,
            user_id: Some(user_id),
        };
        backend.loans.push(loan.clone());
        loan
    }

    /// Fail every request with a transport error while `offline` is set.
    pub fn set_offline(&self, offline: bool) {
        self.inner().offline = offline;
    }

    /// Answer the next request with `status` and `message` instead of handling it.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.inner().fail_next = Some((status, message.to_string()));
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.inner().log.clone()
    }

    /// How many `GET`s hit `path`.
    pub fn fetch_count(&self, path: &str) -> usize {
        self.inner()
            .log
            .iter()
            .filter(|r| r.method == Method::Get && r.path == path)
            .count()
    }

    pub fn loan(&self, id: Id) -> Option<Loan> {
        self.inner().loans.iter().find(|l| l.id == id).cloned()
    }
}

impl Remote for MemoryRemote {
    async fn send(&self, request: Request) -> Result<Reply, SyncError> {
        let mut backend = self.inner();
        backend.log.push(request.clone());

        if backend.offline {
            return Err(SyncError::Transport("network unreachable".to_string()));
        }
        if let Some((status, message)) = backend.fail_next.take() {
            return Ok(reply_error(status, message));
        }

        let answer = backend.handle(&request);
        Ok(match answer {
            Ok((status, data)) => {
                Reply::new(status, json!(Envelope::success(data)))
            }
            Err((status, message)) => reply_error(status, message),
        })
    }
}

fn reply_error(status: u16, message: String) -> Reply {
    Reply::new(status, json!(Envelope::failure(message)))
}

fn body<T: DeserializeOwned>(request: &Request) -> Result<T, (u16, String)> {
    let value = request.body.clone().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| (400, format!("Invalid request body: {e}")))
}

fn user_query(request: &Request) -> Result<Id, (u16, String)> {
    request
        .query_value("userId")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| (400, "userId is required".to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl Backend {
    fn next(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn handle(&mut self, request: &Request) -> Answer {
        match (request.method, request.path.as_str()) {
            (Method::Get, VERIFY_PATH) => self.verify(),
            (Method::Post, LOGIN_PATH) => self.login(body(request)?),
            (Method::Post, REGISTER_PATH) => self.register(body(request)?),
            (Method::Post, FORGOT_PASSWORD_PATH) => Ok((200, json!({ "sent": true }))),
            (Method::Get, TASKS_PATH) => {
                let user_id = user_query(request)?;
                let tasks: Vec<&Task> = self
                    .tasks
                    .iter()
                    .filter(|t| t.user_id == Some(user_id))
                    .collect();
                Ok((200, encode(&tasks)))
            }
            (Method::Post, ADD_TASK_PATH) => self.add_task(body(request)?),
            (Method::Put, UPDATE_TASK_PATH) => self.update_task(body(request)?),
            (Method::Delete, DELETE_TASK_PATH) => {
                let IdOnly { id } = body(request)?;
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                if self.tasks.len() == before {
                    return Err((404, "Task not found".to_string()));
                }
                Ok((200, json!({ "id": id })))
            }
            (Method::Get, LOANS_PATH) => {
                let user_id = user_query(request)?;
                let loans: Vec<&Loan> = self
                    .loans
                    .iter()
                    .filter(|l| l.user_id == Some(user_id))
                    .collect();
                Ok((200, encode(&loans)))
            }
            (Method::Post, LOANS_PATH) => self.add_loan(body(request)?),
            (Method::Put, LOANS_PATH) => self.update_loan(body(request)?),
            (Method::Delete, LOANS_PATH) => {
                let IdOnly { id } = body(request)?;
                let before = self.loans.len();
                self.loans.retain(|l| l.id != id);
                if self.loans.len() == before {
                    return Err((404, "Loan not found".to_string()));
                }
                self.payments.retain(|p| p.loan_id != id);
                Ok((200, json!({ "id": id })))
            }
            (Method::Post, PAYMENTS_PATH) => self.pay(body(request)?),
            (method, path) => Err((404, format!("Cannot {method} {path}"))),
        }
    }

    fn user(&self, id: Id) -> Option<&UserInfo> {
        self.users.iter().map(|(u, _)| u).find(|u| u.id == id)
    }

    fn verify(&self) -> Answer {
        match self.session.and_then(|id| self.user(id)) {
            Some(user) => Ok((200, encode(user))),
            None => Err((401, "Unauthorized".to_string())),
        }
    }

    fn login(&mut self, credentials: Credentials) -> Answer {
        let found = self
            .users
            .iter()
            .find(|(u, pw)| u.email.eq_ignore_ascii_case(&credentials.email) && *pw == credentials.password)
            .map(|(u, _)| u.clone());
        match found {
            Some(user) => {
                self.session = Some(user.id);
                Ok((200, json!({ "user": encode(&user) })))
            }
            None => Err((401, "Invalid email or password".to_string())),
        }
    }

    fn register(&mut self, registration: Registration) -> Answer {
        if self
            .users
            .iter()
            .any(|(u, _)| u.email.eq_ignore_ascii_case(&registration.email))
        {
            return Err((409, "An account with this email already exists".to_string()));
        }
        let user = UserInfo {
            id: self.next(),
            name: Some(registration.name),
            email: registration.email,
        };
        self.users.push((user.clone(), registration.password));
        self.session = Some(user.id);
        Ok((201, json!({ "user": encode(&user) })))
    }

    fn add_task(&mut self, request: WithIds<TaskPayload>) -> Answer {
        let Some(user_id) = request.user_id else {
            return Err((400, "userId is required".to_string()));
        };
        let TaskPayload { task, priority } = request.fields;
        if task.trim().is_empty() || !(1..=10).contains(&priority) {
            return Err((400, "Invalid task".to_string()));
        }
        let task = Task {
            id: self.next(),
            task,
            priority,
            user_id: Some(user_id),
        };
        self.tasks.push(task.clone());
        Ok((201, encode(&task)))
    }

    fn update_task(&mut self, request: WithIds<TaskPayload>) -> Answer {
        let id = request.id.ok_or((400, "id is required".to_string()))?;
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err((404, "Task not found".to_string()));
        };
        task.task = request.fields.task;
        task.priority = request.fields.priority;
        Ok((200, encode(&*task)))
    }

    fn paid(&self, loan_id: Id) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .map(|p| p.payment_amount)
            .sum()
    }

    fn add_loan(&mut self, request: WithIds<LoanPayload>) -> Answer {
        let Some(user_id) = request.user_id else {
            return Err((400, "userId is required".to_string()));
        };
        let fields = request.fields;
        if fields.amount <= Decimal::ZERO {
            return Err((400, "Loan amount must be greater than zero".to_string()));
        }
        let loan = Loan {
            id: self.next(),
            lender_name: fields.lender_name,
            lender_type: fields.lender_type,
            amount: fields.amount,
            interest_rate: fields.interest_rate,
            taken_date: fields.taken_date,
            due_date: fields.due_date,
            repayment_terms: fields.repayment_terms,
            notes: fields.notes,
            status: LoanStatus::Active,
            remaining_balance: fields.amount,
            user_id: Some(user_id),
        };
        self.loans.push(loan.clone());
        Ok((201, encode(&loan)))
    }

    fn update_loan(&mut self, request: WithIds<LoanPayload>) -> Answer {
        let id = request.id.ok_or((400, "id is required".to_string()))?;
        let paid = self.paid(id);
        let fields = request.fields;
        let Some(loan) = self.loans.iter_mut().find(|l| l.id == id) else {
            return Err((404, "Loan not found".to_string()));
        };
        if fields.amount < paid {
            return Err((400, "Amount cannot be less than what has been paid".to_string()));
        }
        loan.lender_name = fields.lender_name;
        loan.lender_type = fields.lender_type;
        loan.amount = fields.amount;
        loan.interest_rate = fields.interest_rate;
        loan.taken_date = fields.taken_date;
        loan.due_date = fields.due_date;
        loan.repayment_terms = fields.repayment_terms;
        loan.notes = fields.notes;
        loan.remaining_balance = fields.amount - paid;
        loan.status = settle(loan.status, loan.remaining_balance);
        Ok((200, encode(&*loan)))
    }

    fn pay(&mut self, payment: PaymentPayload) -> Answer {
        if payment.payment_amount <= Decimal::ZERO {
            return Err((400, "Payment amount must be greater than zero".to_string()));
        }
        let Some(loan) = self.loans.iter_mut().find(|l| l.id == payment.loan_id) else {
            return Err((404, "Loan not found".to_string()));
        };
        if payment.payment_amount > loan.remaining_balance {
            return Err((400, "Payment exceeds remaining balance".to_string()));
        }
        loan.remaining_balance -= payment.payment_amount;
        loan.status = settle(loan.status, loan.remaining_balance);
        let data = json!({ "loanId": loan.id, "remainingBalance": encode(&loan.remaining_balance) });
        self.payments.push(payment);
        Ok((201, data))
    }
}

fn settle(status: LoanStatus, remaining: Decimal) -> LoanStatus {
    if remaining.is_zero() {
        LoanStatus::PaidOff
    } else if status == LoanStatus::PaidOff {
        LoanStatus::Active
    } else {
        status
    }
}
