//! Per-session user state and the route guard built on it.

use crate::error::SyncError;
use crate::models::UserInfo;

/// The signed-in user, if any, and whether the first verify call is still running.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserInfo>,
    pub loading: bool,
}

impl Session {
    /// State before the verify call on mount has answered.
    pub fn initializing() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    /// Record the answer of the verify call. Any error means "not signed in".
    pub fn resolve(&mut self, verified: Result<UserInfo, SyncError>) {
        self.loading = false;
        self.user = match verified {
            Ok(user) => {
                tracing::info!("session restored for user {}", user.id);
                Some(user)
            }
            Err(e) => {
                tracing::debug!("no active session: {e}");
                None
            }
        };
    }

    pub fn sign_in(&mut self, user: UserInfo) {
        self.user = Some(user);
        self.loading = false;
    }

    /// Logout.
    pub fn clear(&mut self) {
        self.user = None;
        self.loading = false;
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }
}

/// What a protected page should do with the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Still verifying; show a loading screen.
    Pending,
    /// Not signed in; send to the login page.
    Redirect,
    Granted,
}

pub fn guard(session: &Session) -> Access {
    match (session.loading, &session.user) {
        (true, _) => Access::Pending,
        (false, None) => Access::Redirect,
        (false, Some(_)) => Access::Granted,
    }
}
