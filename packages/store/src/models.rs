//! # Domain models for tasks, loans, payments and users
//!
//! Defines the data structures exchanged with the backend. Entity types are
//! `Serialize + Deserialize` with camelCase field names so they decode straight from
//! the JSON the API returns.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Task`] | A to-do item with a 1–10 priority. |
//! | [`Loan`] | A loan taken from a bank, a person or another lender. `remaining_balance` is computed by the server from the payments registered against the loan. |
//! | [`UserInfo`] | The authenticated user, cached for the session lifetime. |
//! | [`TaskPayload`] / [`LoanPayload`] / [`PaymentPayload`] | Validated bodies produced by [`crate::forms`] and sent by [`crate::Client`]. |
//!
//! Monetary values are [`Decimal`]s. The backend may send them as JSON numbers or
//! as strings (SQL `NUMERIC` columns), both are accepted. Dates accept either
//! `YYYY-MM-DD` or a full ISO timestamp, in which case only the date part is kept.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the backend.
pub type Id = i64;

/// Priority above which a task counts as high priority.
pub const HIGH_PRIORITY_ABOVE: u8 = 7;
/// Lowest priority that still counts as medium.
pub const MEDIUM_PRIORITY_FROM: u8 = 4;

/// A to-do item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Id,
    pub task: String,
    pub priority: u8,
    #[serde(default)]
    pub user_id: Option<Id>,
}

/// Priority band used for badges and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn of(priority: u8) -> Self {
        if priority > HIGH_PRIORITY_ABOVE {
            Self::High
        } else if priority >= MEDIUM_PRIORITY_FROM {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Task {
    pub fn band(&self) -> PriorityBand {
        PriorityBand::of(self.priority)
    }
}

/// Who the money was borrowed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LenderType {
    #[default]
    Bank,
    Person,
    #[serde(other)]
    Other,
}

impl LenderType {
    pub const ALL: [LenderType; 3] = [LenderType::Bank, LenderType::Person, LenderType::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Person => "Person",
            Self::Other => "Other",
        }
    }

    /// Parse a select value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for LenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a loan. Transitions happen on the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    #[default]
    Active,
    #[serde(rename = "Paid Off")]
    PaidOff,
    Default,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::PaidOff => "Paid Off",
            Self::Default => "Default",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loan as returned by `GET /loans`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Id,
    pub lender_name: String,
    #[serde(default)]
    pub lender_type: LenderType,
    pub amount: Decimal,
    #[serde(default)]
    pub interest_rate: Decimal,
    #[serde(default, with = "lenient_date")]
    pub taken_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub repayment_terms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: LoanStatus,
    /// Computed by the server: `amount` minus every registered payment.
    #[serde(default)]
    pub remaining_balance: Decimal,
    #[serde(default)]
    pub user_id: Option<Id>,
}

impl Loan {
    pub fn is_paid_off(&self) -> bool {
        self.status == LoanStatus::PaidOff
    }
}

/// User information returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Body of `POST /tasks/addTask` and `PUT /tasks/updateTask` (minus id/userId).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub task: String,
    pub priority: u8,
}

/// Loan fields sent on create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayload {
    pub lender_name: String,
    pub lender_type: LenderType,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub interest_rate: Decimal,
    #[serde(with = "lenient_date")]
    pub taken_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub repayment_terms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /loans/payments`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub loan_id: Id,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub payment_amount: Decimal,
    #[serde(with = "lenient_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub email: String,
}

/// `Option<NaiveDate>` as `"YYYY-MM-DD"`, reading timestamps and empty strings leniently.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s).map(Some).map_err(de::Error::custom),
        }
    }

    /// Parse the leading `YYYY-MM-DD` of a date or timestamp.
    pub fn parse(s: &str) -> Result<NaiveDate, chrono::ParseError> {
        let head = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(head, FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loan_decodes_string_and_number_amounts() {
        let loan: Loan = serde_json::from_value(json!({
            "id": 3,
            "lenderName": "Axis Bank",
            "lenderType": "Bank",
            "amount": "1500.50",
            "interestRate": 10.5,
            "takenDate": "2024-03-01T00:00:00.000Z",
            "dueDate": null,
            "status": "Paid Off",
            "remainingBalance": 0,
            "userId": 1
        }))
        .unwrap();

        assert_eq!(loan.amount, Decimal::new(150050, 2));
        assert_eq!(loan.interest_rate, Decimal::new(105, 1));
        assert_eq!(loan.taken_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(loan.due_date.is_none());
        assert_eq!(loan.status, LoanStatus::PaidOff);
        assert!(loan.is_paid_off());
    }

    #[test]
    fn test_unknown_lender_type_is_other() {
        let loan: Loan = serde_json::from_value(json!({
            "id": 1,
            "lenderName": "Uncle",
            "lenderType": "Family",
            "amount": 100,
            "remainingBalance": 100
        }))
        .unwrap();
        assert_eq!(loan.lender_type, LenderType::Other);
        assert_eq!(loan.status, LoanStatus::Active);
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(PriorityBand::of(10), PriorityBand::High);
        assert_eq!(PriorityBand::of(8), PriorityBand::High);
        assert_eq!(PriorityBand::of(7), PriorityBand::Medium);
        assert_eq!(PriorityBand::of(4), PriorityBand::Medium);
        assert_eq!(PriorityBand::of(3), PriorityBand::Low);
        assert_eq!(PriorityBand::of(1), PriorityBand::Low);
    }

    #[test]
    fn test_payment_payload_wire_format() {
        let payload = PaymentPayload {
            loan_id: 7,
            payment_amount: Decimal::new(500, 0),
            payment_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            notes: String::new(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["loanId"], json!(7));
        assert_eq!(value["paymentAmount"], json!(500.0));
        assert_eq!(value["paymentDate"], json!("2025-01-15"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = UserInfo {
            id: 1,
            name: Some("Sriram".to_string()),
            email: "s@example.com".to_string(),
        };
        assert_eq!(user.display_name(), "Sriram");
        user.name = Some("  ".to_string());
        assert_eq!(user.display_name(), "s@example.com");
    }
}
