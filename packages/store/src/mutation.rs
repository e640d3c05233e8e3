//! # Mutation flow: the add/edit/delete/payment lifecycle
//!
//! [`MutationFlow`] is the state machine behind every form:
//!
//! ```text
//! Idle ──open──▶ FormOpen(mode, draft) ──submit──▶ Submitting ──ok──▶ Idle (+ reload)
//!                   ▲    │ invalid                      │
//!                   │    └──────── stays open ◀─────────┘ err (message kept)
//! ```
//!
//! - [`MutationFlow::submit`] validates the draft; an invalid draft stays in
//!   `FormOpen` with field errors and produces no request.
//! - A valid draft moves to `Submitting` and yields exactly one [`Submission`]. While
//!   submitting, further submits are refused, which is what keeps a double click from
//!   sending twice.
//! - [`MutationFlow::complete`] closes the form on success (the caller must reload the
//!   store) or reopens it with the error message on failure.
//!
//! [`DeleteFlow`] is the same shape without a form: confirm, submit, reload-or-error.
//!
//! [`submit_and_reload`] / [`delete_and_reload`] drive a whole flow against a
//! [`Client`] and a [`ResourceStore`].

use std::future::Future;

use crate::client::Client;
use crate::error::{FieldErrors, FlowError, SyncError};
use crate::forms::Draft;
use crate::models::Id;
use crate::remote::Remote;
use crate::resource::{Resource, ResourceStore};

/// Whether a form creates a new entity or edits an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(Id),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

/// A validated payload ready for exactly one adapter call.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission<P> {
    pub mode: FormMode,
    pub payload: P,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowState<D> {
    Idle,
    FormOpen {
        mode: FormMode,
        draft: D,
        error: Option<String>,
        field_errors: FieldErrors,
    },
    Submitting {
        mode: FormMode,
        draft: D,
    },
}

/// Result of a finished submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The form closed; reload the store.
    Saved,
    /// The form is open again showing this message.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MutationFlow<D> {
    state: FlowState<D>,
}

impl<D> Default for MutationFlow<D> {
    fn default() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }
}

impl<D: Draft> MutationFlow<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState<D> {
        &self.state
    }

    /// Open an empty form.
    pub fn open_add(&mut self, draft: D) {
        self.open(FormMode::Add, draft);
    }

    /// Open a form prefilled from a copy of `entity`. The entity itself is not touched.
    pub fn open_edit<E>(&mut self, entity: &E)
    where
        E: Resource,
        D: for<'a> From<&'a E>,
    {
        self.open(FormMode::Edit(entity.id()), D::from(entity));
    }

    pub fn open(&mut self, mode: FormMode, draft: D) {
        if self.is_submitting() {
            return;
        }
        self.state = FlowState::FormOpen {
            mode,
            draft,
            error: None,
            field_errors: FieldErrors::new(),
        };
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FlowState::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FlowState::Submitting { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::FormOpen { mode, .. } | FlowState::Submitting { mode, .. } => Some(*mode),
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::FormOpen { draft, .. } | FlowState::Submitting { draft, .. } => Some(draft),
        }
    }

    /// Edit the draft. Only possible while the form is open and not submitting.
    pub fn update(&mut self, edit: impl FnOnce(&mut D)) {
        if let FlowState::FormOpen {
            draft,
            field_errors,
            ..
        } = &mut self.state
        {
            edit(draft);
            *field_errors = FieldErrors::new();
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FlowState::FormOpen { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        match &self.state {
            FlowState::FormOpen { field_errors, .. } => field_errors.get(field),
            _ => None,
        }
    }

    /// Validate and move to `Submitting`.
    pub fn submit(&mut self) -> Result<Submission<D::Payload>, FlowError> {
        match self.state {
            FlowState::Idle => return Err(FlowError::NotOpen),
            FlowState::Submitting { .. } => return Err(FlowError::AlreadySubmitting),
            FlowState::FormOpen { .. } => {}
        }
        let FlowState::FormOpen {
            mode,
            draft,
            error,
            field_errors,
        } = &mut self.state
        else {
            return Err(FlowError::NotOpen);
        };

        match draft.validate() {
            Ok(payload) => {
                let mode = *mode;
                let draft = draft.clone();
                self.state = FlowState::Submitting { mode, draft };
                Ok(Submission { mode, payload })
            }
            Err(errors) => {
                tracing::debug!("submission rejected by validation: {errors}");
                *error = None;
                *field_errors = errors.clone();
                Err(FlowError::Invalid(errors))
            }
        }
    }

    /// Record the adapter's answer for the in-flight submission.
    pub fn complete(&mut self, outcome: Result<(), SyncError>) -> Result<Completion, FlowError> {
        if !self.is_submitting() {
            return Err(FlowError::NotSubmitting);
        }
        let FlowState::Submitting { mode, draft } =
            std::mem::replace(&mut self.state, FlowState::Idle)
        else {
            return Err(FlowError::NotSubmitting);
        };
        match outcome {
            Ok(()) => Ok(Completion::Saved),
            Err(e) => {
                let message = e.to_string();
                self.state = FlowState::FormOpen {
                    mode,
                    draft,
                    error: Some(message.clone()),
                    field_errors: FieldErrors::new(),
                };
                Ok(Completion::Failed(message))
            }
        }
    }

    /// Close the form. Refused while a request is in flight, which cannot be cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            FlowState::Submitting { .. } => false,
            _ => {
                self.state = FlowState::Idle;
                true
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming(Id),
    Submitting(Id),
}

/// Confirm → delete → reload-or-error, without a form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteFlow {
    state: DeleteState,
    error: Option<String>,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request(&mut self, id: Id) {
        if !matches!(self.state, DeleteState::Submitting(_)) {
            self.state = DeleteState::Confirming(id);
            self.error = None;
        }
    }

    pub fn pending(&self) -> Option<Id> {
        match self.state {
            DeleteState::Confirming(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, DeleteState::Submitting(_))
    }

    pub fn decline(&mut self) {
        if let DeleteState::Confirming(_) = self.state {
            self.state = DeleteState::Idle;
        }
    }

    /// The user confirmed; returns the id to delete.
    pub fn confirm(&mut self) -> Result<Id, FlowError> {
        match self.state {
            DeleteState::Confirming(id) => {
                self.state = DeleteState::Submitting(id);
                Ok(id)
            }
            DeleteState::Submitting(_) => Err(FlowError::AlreadySubmitting),
            DeleteState::Idle => Err(FlowError::NotOpen),
        }
    }

    pub fn complete(&mut self, outcome: Result<(), SyncError>) -> Result<Completion, FlowError> {
        if !self.is_submitting() {
            return Err(FlowError::NotSubmitting);
        }
        self.state = DeleteState::Idle;
        match outcome {
            Ok(()) => {
                self.error = None;
                Ok(Completion::Saved)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Ok(Completion::Failed(message))
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

/// Submit the open form, call the adapter once and reload the store on success.
///
/// Returns `Ok(Completion::Failed(_))` when the mutation failed (no reload happened and
/// the form is open again), and `Err` when the mutation succeeded but the reload did not
/// (the form is closed and the store keeps its previous list).
pub async fn submit_and_reload<R, T, D, F, Fut>(
    flow: &mut MutationFlow<D>,
    store: &mut ResourceStore<T>,
    client: &Client<R>,
    user_id: Id,
    send: F,
) -> Result<Completion, SyncError>
where
    R: Remote,
    T: Resource,
    D: Draft,
    F: FnOnce(Submission<D::Payload>) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    let submission = match flow.submit() {
        Ok(submission) => submission,
        Err(FlowError::Invalid(errors)) => return Ok(Completion::Failed(errors.to_string())),
        Err(e) => return Ok(Completion::Failed(e.to_string())),
    };
    let outcome = send(submission).await;
    match flow.complete(outcome) {
        Ok(Completion::Saved) => {
            store.load(client, user_id).await?;
            Ok(Completion::Saved)
        }
        Ok(failed) => Ok(failed),
        Err(e) => Ok(Completion::Failed(e.to_string())),
    }
}

/// Run a confirmed deletion and reload the store on success.
pub async fn delete_and_reload<R, T, F, Fut>(
    flow: &mut DeleteFlow,
    store: &mut ResourceStore<T>,
    client: &Client<R>,
    user_id: Id,
    send: F,
) -> Result<Completion, SyncError>
where
    R: Remote,
    T: Resource,
    F: FnOnce(Id) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    let id = match flow.confirm() {
        Ok(id) => id,
        Err(e) => return Ok(Completion::Failed(e.to_string())),
    };
    let outcome = send(id).await;
    match flow.complete(outcome) {
        Ok(Completion::Saved) => {
            store.load(client, user_id).await?;
            Ok(Completion::Saved)
        }
        Ok(failed) => Ok(failed),
        Err(e) => Ok(Completion::Failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::client::{LOANS_PATH, TASKS_PATH};
    use crate::forms::{PaymentDraft, TaskDraft};
    use crate::memory::MemoryRemote;
    use crate::models::{LenderType, Loan, Task};
    use crate::view::TaskMetrics;

    fn setup() -> (MemoryRemote, Client<MemoryRemote>, Id) {
        let remote = MemoryRemote::new();
        let user = remote.seed_user("Asha", "asha@example.com", "pw");
        let client = Client::new(remote.clone());
        (remote, client, user.id)
    }

    fn draft(text: &str, priority: u8) -> TaskDraft {
        TaskDraft {
            task: text.to_string(),
            priority,
        }
    }

    #[test]
    fn test_submit_requires_open_form() {
        let mut flow = MutationFlow::<TaskDraft>::new();
        assert_eq!(flow.submit().unwrap_err(), FlowError::NotOpen);
    }

    #[test]
    fn test_submit_is_single_flight() {
        let mut flow = MutationFlow::new();
        flow.open_add(draft("Pay rent", 5));
        let submission = flow.submit().unwrap();
        assert_eq!(submission.mode, FormMode::Add);
        assert!(flow.is_submitting());

        assert_eq!(flow.submit().unwrap_err(), FlowError::AlreadySubmitting);
        assert!(!flow.cancel());
        flow.open_add(draft("Other", 1));
        assert_eq!(flow.draft().map(|d| d.task.as_str()), Some("Pay rent"));
    }

    #[test]
    fn test_invalid_draft_stays_open_with_field_errors() {
        let mut flow = MutationFlow::new();
        flow.open_add(draft("  ", 5));
        assert!(matches!(flow.submit(), Err(FlowError::Invalid(_))));
        assert!(!flow.is_submitting());
        assert!(flow.field_error("task").is_some());

        flow.update(|d| d.task = "Pay rent".to_string());
        assert!(flow.field_error("task").is_none());
        assert!(flow.submit().is_ok());
    }

    #[test]
    fn test_complete_failure_reopens_with_message() {
        let mut flow = MutationFlow::new();
        flow.open_add(draft("Pay rent", 5));
        flow.submit().unwrap();
        let done = flow
            .complete(Err(SyncError::api(500, Some("boom".to_string()))))
            .unwrap();
        assert_eq!(done, Completion::Failed("boom".to_string()));
        assert_eq!(flow.error(), Some("boom"));
        assert_eq!(flow.draft().map(|d| d.task.as_str()), Some("Pay rent"));
        assert!(flow.cancel());
        assert!(!flow.is_open());
    }

    #[test]
    fn test_complete_without_submission_is_refused() {
        let mut flow = MutationFlow::new();
        flow.open_add(draft("Pay rent", 5));
        assert_eq!(flow.complete(Ok(())).unwrap_err(), FlowError::NotSubmitting);
        assert!(flow.is_open());
    }

    #[test]
    fn test_open_edit_copies_entity() {
        let task = Task {
            id: 4,
            task: "Call bank".to_string(),
            priority: 3,
            user_id: Some(1),
        };
        let mut flow = MutationFlow::<TaskDraft>::new();
        flow.open_edit(&task);
        flow.update(|d| d.priority = 10);
        assert_eq!(flow.mode(), Some(FormMode::Edit(4)));
        assert_eq!(task.priority, 3);
    }

    #[tokio::test]
    async fn test_success_reloads_once_and_closes() {
        let (remote, client, user_id) = setup();
        let mut store = ResourceStore::<Task>::new();
        store.load(&client, user_id).await.unwrap();
        let high_before = TaskMetrics::of(store.items()).high;

        let mut flow = MutationFlow::new();
        flow.open_add(draft("Write report", 8));
        let fetches = remote.fetch_count(TASKS_PATH);
        let done = submit_and_reload(&mut flow, &mut store, &client, user_id, |s| {
            client.save_task(user_id, s)
        })
        .await
        .unwrap();

        assert_eq!(done, Completion::Saved);
        assert!(!flow.is_open());
        assert_eq!(remote.fetch_count(TASKS_PATH), fetches + 1);
        let added = store.items().iter().find(|t| t.task == "Write report").unwrap();
        assert_eq!(added.priority, 8);
        assert_eq!(TaskMetrics::of(store.items()).high, high_before + 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_reload() {
        let (remote, client, user_id) = setup();
        let mut store = ResourceStore::<Task>::new();
        store.load(&client, user_id).await.unwrap();

        let mut flow = MutationFlow::new();
        flow.open_add(draft("Write report", 8));
        remote.fail_next(500, "Database unavailable");
        let fetches = remote.fetch_count(TASKS_PATH);
        let done = submit_and_reload(&mut flow, &mut store, &client, user_id, |s| {
            client.save_task(user_id, s)
        })
        .await
        .unwrap();

        assert_eq!(done, Completion::Failed("Database unavailable".to_string()));
        assert!(flow.is_open());
        assert_eq!(flow.error(), Some("Database unavailable"));
        assert_eq!(remote.fetch_count(TASKS_PATH), fetches);
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_form_open() {
        let (remote, client, user_id) = setup();
        let mut store = ResourceStore::<Task>::new();
        let mut flow = MutationFlow::new();
        flow.open_add(draft("Write report", 8));
        remote.set_offline(true);

        let done = submit_and_reload(&mut flow, &mut store, &client, user_id, |s| {
            client.save_task(user_id, s)
        })
        .await
        .unwrap();
        assert!(matches!(done, Completion::Failed(ref m) if !m.is_empty()));
        assert!(flow.error().is_some());
        assert!(!store.is_loaded());
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_request() {
        let (remote, client, user_id) = setup();
        let loan = remote.seed_loan(user_id, "HDFC", LenderType::Bank, Decimal::from(1200));
        let before = remote.requests().len();

        let mut tasks = ResourceStore::<Task>::new();
        let mut task_flow = MutationFlow::new();
        task_flow.open_add(draft("", 5));
        let done = submit_and_reload(&mut task_flow, &mut tasks, &client, user_id, |s| {
            client.save_task(user_id, s)
        })
        .await
        .unwrap();
        assert!(matches!(done, Completion::Failed(_)));

        let mut loans = ResourceStore::<Loan>::new();
        let mut pay_flow = MutationFlow::new();
        let mut payment = PaymentDraft::from(&loan);
        payment.amount = "0".to_string();
        pay_flow.open_add(payment);
        submit_and_reload(&mut pay_flow, &mut loans, &client, user_id, |s| {
            client.register_payment(s)
        })
        .await
        .unwrap();

        assert_eq!(remote.requests().len(), before);
        assert!(pay_flow.field_error("paymentAmount").is_some());
    }

    #[tokio::test]
    async fn test_payment_balance_comes_from_server() {
        let (remote, client, user_id) = setup();
        remote.seed_loan(user_id, "HDFC", LenderType::Bank, Decimal::from(1200));
        let mut loans = ResourceStore::<Loan>::new();
        loans.load(&client, user_id).await.unwrap();
        let loan = loans.items()[0].clone();

        let mut flow = MutationFlow::new();
        let mut payment = PaymentDraft::from(&loan);
        payment.amount = "500".to_string();
        flow.open_add(payment);
        let done = submit_and_reload(&mut flow, &mut loans, &client, user_id, |s| {
            client.register_payment(s)
        })
        .await
        .unwrap();

        assert_eq!(done, Completion::Saved);
        assert_eq!(remote.fetch_count(LOANS_PATH), 2);
        assert_eq!(loans.get(loan.id).unwrap().remaining_balance, Decimal::from(700));
    }

    #[tokio::test]
    async fn test_payment_rejected_by_server_with_stale_balance() {
        let (remote, client, user_id) = setup();
        let seeded = remote.seed_loan(user_id, "HDFC", LenderType::Bank, Decimal::from(1200));
        let mut loans = ResourceStore::<Loan>::new();
        loans.load(&client, user_id).await.unwrap();

        // another session pays 500; the draft still carries 1200
        let mut elsewhere = PaymentDraft::from(&seeded);
        elsewhere.amount = "500".to_string();
        client
            .register_payment(Submission {
                mode: FormMode::Add,
                payload: elsewhere.validate().unwrap(),
            })
            .await
            .unwrap();

        let mut flow = MutationFlow::new();
        let mut payment = PaymentDraft::from(&seeded);
        payment.amount = "1000".to_string();
        flow.open_add(payment);
        let done = submit_and_reload(&mut flow, &mut loans, &client, user_id, |s| {
            client.register_payment(s)
        })
        .await
        .unwrap();

        assert_eq!(
            done,
            Completion::Failed("Payment exceeds remaining balance".to_string())
        );
        assert!(flow.is_open());
        assert_eq!(remote.fetch_count(LOANS_PATH), 1);
    }

    #[tokio::test]
    async fn test_delete_confirm_then_reload() {
        let (remote, client, user_id) = setup();
        let task = remote.seed_task(user_id, "Pay rent", 5);
        let mut store = ResourceStore::<Task>::new();
        store.load(&client, user_id).await.unwrap();

        let mut flow = DeleteFlow::new();
        assert_eq!(flow.confirm().unwrap_err(), FlowError::NotOpen);
        flow.request(task.id);
        assert_eq!(flow.pending(), Some(task.id));
        flow.decline();
        assert_eq!(flow.pending(), None);

        flow.request(task.id);
        let done = delete_and_reload(&mut flow, &mut store, &client, user_id, |id| {
            client.delete_task(id)
        })
        .await
        .unwrap();
        assert_eq!(done, Completion::Saved);
        assert!(store.is_empty());
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_error() {
        let (remote, client, user_id) = setup();
        let mut store = ResourceStore::<Task>::new();
        let mut flow = DeleteFlow::new();
        flow.request(99);
        let done = delete_and_reload(&mut flow, &mut store, &client, user_id, |id| {
            client.delete_task(id)
        })
        .await
        .unwrap();

        assert_eq!(done, Completion::Failed("Task not found".to_string()));
        assert_eq!(flow.error(), Some("Task not found"));
        assert_eq!(remote.fetch_count(TASKS_PATH), 0);
        flow.dismiss_error();
        assert!(flow.error().is_none());
    }
}
