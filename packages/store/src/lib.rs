pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod mutation;
pub mod remote;
pub mod resource;
pub mod session;
pub mod view;

mod memory;
pub use memory::MemoryRemote;

pub use client::Client;
pub use config::{BackendKind, ClientConfig};
pub use error::{ConfigError, FieldErrors, FlowError, SyncError};
pub use forms::{
    Draft, ForgotPasswordDraft, LoanDraft, LoginDraft, PaymentDraft, RegisterDraft, TaskDraft,
};
pub use models::{Id, LenderType, Loan, LoanStatus, PriorityBand, Task, UserInfo};
pub use mutation::{Completion, DeleteFlow, FormMode, MutationFlow, Submission};
pub use remote::{Envelope, Method, Remote, Reply, Request};
pub use resource::{Resource, ResourceStore};
pub use session::{guard, Access, Session};

pub use rust_decimal::Decimal;
