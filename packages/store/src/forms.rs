//! # Form drafts and client-side validation
//!
//! A draft holds what the user typed, as strings where the input is free text.
//! [`Draft::validate`] parses it into the payload the backend expects or returns
//! [`FieldErrors`] keyed by field name. An invalid draft never reaches the network.
//!
//! | Draft | Payload | Rejected when |
//! |-------|---------|---------------|
//! | [`TaskDraft`] | [`TaskPayload`] | empty text, priority outside 1–10 |
//! | [`LoanDraft`] | [`LoanPayload`] | empty lender name, amount ≤ 0, negative rate, missing taken date, due date before taken date |
//! | [`PaymentDraft`] | [`PaymentPayload`] | amount ≤ 0, amount above the loan's remaining balance |
//! | [`LoginDraft`] / [`RegisterDraft`] | [`Credentials`] / [`Registration`] | missing email, password or name |
//! | [`ForgotPasswordDraft`] | [`PasswordReset`] | missing email |
//!
//! The payment balance check is a pre-check only; the server repeats it and its answer
//! wins.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::FieldErrors;
use crate::models::{
    lenient_date, Credentials, Id, LenderType, Loan, LoanPayload, PasswordReset, PaymentPayload,
    Registration, Task, TaskPayload,
};

/// Priority preselected for new tasks.
pub const DEFAULT_TASK_PRIORITY: u8 = 9;

/// Form state that validates into a request payload.
pub trait Draft: Clone {
    type Payload;

    fn validate(&self) -> Result<Self::Payload, FieldErrors>;
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    lenient_date::parse(raw).map(Some).map_err(|_| ())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub task: String,
    pub priority: u8,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            task: String::new(),
            priority: DEFAULT_TASK_PRIORITY,
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            task: task.task.clone(),
            priority: task.priority,
        }
    }
}

impl Draft for TaskDraft {
    type Payload = TaskPayload;

    fn validate(&self) -> Result<TaskPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let task = self.task.trim();
        if task.is_empty() {
            errors.insert("task", "Task description cannot be empty.");
        }
        if !(1..=10).contains(&self.priority) {
            errors.insert("priority", "Priority must be between 1 and 10.");
        }
        errors.into_result(TaskPayload {
            task: task.to_string(),
            priority: self.priority,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoanDraft {
    pub lender_name: String,
    pub lender_type: LenderType,
    pub amount: String,
    pub interest_rate: String,
    pub taken_date: String,
    pub due_date: String,
    pub repayment_terms: String,
    pub notes: String,
}

impl LoanDraft {
    /// Blank form with the taken date set to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            lender_name: String::new(),
            lender_type: LenderType::Bank,
            amount: "0".to_string(),
            interest_rate: "0".to_string(),
            taken_date: format_date(Some(today)),
            due_date: String::new(),
            repayment_terms: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&Loan> for LoanDraft {
    fn from(loan: &Loan) -> Self {
        Self {
            lender_name: loan.lender_name.clone(),
            lender_type: loan.lender_type,
            amount: loan.amount.to_string(),
            interest_rate: loan.interest_rate.to_string(),
            taken_date: format_date(loan.taken_date),
            due_date: format_date(loan.due_date),
            repayment_terms: loan.repayment_terms.clone().unwrap_or_default(),
            notes: loan.notes.clone().unwrap_or_default(),
        }
    }
}

impl Draft for LoanDraft {
    type Payload = LoanPayload;

    fn validate(&self) -> Result<LoanPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let lender_name = non_empty(&self.lender_name);
        if lender_name.is_none() {
            errors.insert("lenderName", "Lender name is required.");
        }

        let amount = match parse_amount(&self.amount) {
            Some(amount) if amount > Decimal::ZERO => amount,
            Some(_) => {
                errors.insert("amount", "Loan amount must be greater than zero.");
                Decimal::ZERO
            }
            None => {
                errors.insert("amount", "Enter a valid loan amount.");
                Decimal::ZERO
            }
        };

        let interest_rate = if self.interest_rate.trim().is_empty() {
            Decimal::ZERO
        } else {
            match parse_amount(&self.interest_rate) {
                Some(rate) if rate >= Decimal::ZERO => rate,
                Some(_) => {
                    errors.insert("interestRate", "Interest rate cannot be negative.");
                    Decimal::ZERO
                }
                None => {
                    errors.insert("interestRate", "Enter a valid interest rate.");
                    Decimal::ZERO
                }
            }
        };

        let taken_date = match parse_date(&self.taken_date) {
            Ok(Some(date)) => Some(date),
            Ok(None) => {
                errors.insert("takenDate", "Taken date is required.");
                None
            }
            Err(()) => {
                errors.insert("takenDate", "Enter a valid date.");
                None
            }
        };

        let due_date = match parse_date(&self.due_date) {
            Ok(due) => due,
            Err(()) => {
                errors.insert("dueDate", "Enter a valid date.");
                None
            }
        };
        if let (Some(taken), Some(due)) = (taken_date, due_date) {
            if due < taken {
                errors.insert("dueDate", "Due date cannot be before the taken date.");
            }
        }

        errors.into_result(LoanPayload {
            lender_name: lender_name.unwrap_or_default(),
            lender_type: self.lender_type,
            amount,
            interest_rate,
            taken_date,
            due_date,
            repayment_terms: non_empty(&self.repayment_terms),
            notes: non_empty(&self.notes),
        })
    }
}

/// Payment form for one loan. Carries the balance it was opened with for the pre-check.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentDraft {
    pub loan_id: Id,
    pub remaining_balance: Decimal,
    pub amount: String,
    pub payment_date: String,
    pub notes: String,
}

impl PaymentDraft {
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.payment_date = format_date(Some(date));
        self
    }
}

impl From<&Loan> for PaymentDraft {
    /// Suggests paying off the whole remaining balance.
    fn from(loan: &Loan) -> Self {
        let suggested = if loan.remaining_balance > Decimal::ZERO {
            loan.remaining_balance
        } else {
            Decimal::ZERO
        };
        Self {
            loan_id: loan.id,
            remaining_balance: loan.remaining_balance,
            amount: suggested.to_string(),
            payment_date: String::new(),
            notes: String::new(),
        }
    }
}

impl Draft for PaymentDraft {
    type Payload = PaymentPayload;

    fn validate(&self) -> Result<PaymentPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let amount = match parse_amount(&self.amount) {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => {
                errors.insert("paymentAmount", "Payment amount must be greater than zero.");
                Decimal::ZERO
            }
        };
        if amount > self.remaining_balance {
            errors.insert("paymentAmount", "Amount exceeds remaining balance!");
        }

        let payment_date = match parse_date(&self.payment_date) {
            Ok(date) => date,
            Err(()) => {
                errors.insert("paymentDate", "Enter a valid date.");
                None
            }
        };

        errors.into_result(PaymentPayload {
            loan_id: self.loan_id,
            payment_amount: amount,
            payment_date,
            notes: self.notes.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl Draft for LoginDraft {
    type Payload = Credentials;

    fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Email is required");
        }
        if self.password.trim().is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Draft for RegisterDraft {
    type Payload = Registration;

    fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() {
            errors.insert("name", "Full name is required");
        }
        if email.is_empty() {
            errors.insert("email", "Email is required");
        }
        if self.password.trim().is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result(Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForgotPasswordDraft {
    pub email: String,
}

impl Draft for ForgotPasswordDraft {
    type Payload = PasswordReset;

    fn validate(&self) -> Result<PasswordReset, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Email is required");
        }
        errors.into_result(PasswordReset {
            email: email.to_string(),
        })
    }
}
