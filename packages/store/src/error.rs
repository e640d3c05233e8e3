//! Error types shared by the adapter, the stores and the flows.

use std::collections::BTreeMap;

/// Message used when the server rejects a request without saying why.
pub const DEFAULT_API_MESSAGE: &str = "API Error";

/// Failure of a remote call. Both variants carry a message fit for the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a response (network down, DNS, CORS, ...).
    #[error("Unable to connect to the server: {0}")]
    Transport(String),
    /// The server answered with a non-2xx code or a non-`Success` status.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl SyncError {
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_MESSAGE.to_string());
        Self::Api { status, message }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Client-side validation failures, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (_, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Rejected state-machine transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("no form is open")]
    NotOpen,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("nothing is being submitted")]
    NotSubmitting,
    #[error("{0}")]
    Invalid(FieldErrors),
}

/// Errors reading [`crate::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_defaults_blank_message() {
        let err = SyncError::api(500, Some("   ".to_string()));
        assert_eq!(err.to_string(), DEFAULT_API_MESSAGE);
        let err = SyncError::api(400, Some("Task not found".to_string()));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("amount", "Amount must be greater than zero");
        errors.insert("amount", "ignored");
        errors.insert("lenderName", "Lender name is required");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("amount"), Some("Amount must be greater than zero"));
        assert!(errors.clone().into_result(()).is_err());
        assert!(FieldErrors::new().into_result(1).is_ok());
    }
}
