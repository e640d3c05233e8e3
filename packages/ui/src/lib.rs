//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const APP_CSS: Asset = asset!("/assets/styling/app.css");

mod auth;
pub use auth::{use_auth, use_user_id, AuthProvider, LogoutButton, ProtectedRoute};

pub mod activity_log;
pub use activity_log::{log_activity, log_error, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle};

mod modal;
pub use modal::{ConfirmDialog, ModalOverlay};

mod widgets;
pub use widgets::{ErrorBanner, FieldError, MetricCard, PriorityBadge, StatusBadge, Tone};

mod forms;
pub use forms::{
    ForgotPasswordFields, LoanForm, LoginFields, PaymentForm, RegisterFields, TaskForm,
};

mod sidebar;
pub use sidebar::{NavItem, Sidebar, Topbar};

mod sync;
pub use sync::{money, reload, settle, today, use_resource_store};
