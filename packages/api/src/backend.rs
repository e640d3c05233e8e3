//! Backend selection from [`ClientConfig`].

use rust_decimal::Decimal;
use store::{BackendKind, ClientConfig, LenderType, MemoryRemote, Remote, Reply, Request, SyncError};

use crate::http::HttpRemote;

/// Account available on the in-memory demo backend.
pub const DEMO_EMAIL: &str = "demo@lifedesk.app";
pub const DEMO_PASSWORD: &str = "demo";

/// The transport the app runs against.
#[derive(Clone, Debug)]
pub enum Backend {
    Http(HttpRemote),
    Memory(MemoryRemote),
}

impl Backend {
    pub fn from_config(config: &ClientConfig) -> Result<Self, SyncError> {
        match config.api.backend {
            BackendKind::Http => {
                tracing::info!("using backend at {}", config.base_url());
                Ok(Self::Http(HttpRemote::new(config.base_url())?))
            }
            BackendKind::Memory => {
                tracing::info!("using in-memory demo backend ({DEMO_EMAIL} / {DEMO_PASSWORD})");
                Ok(Self::Memory(demo()))
            }
        }
    }
}

/// A memory backend with one account and a little data to look at.
pub fn demo() -> MemoryRemote {
    let remote = MemoryRemote::new();
    let user = remote.seed_user("Demo User", DEMO_EMAIL, DEMO_PASSWORD);
    remote.seed_task(user.id, "Pay electricity bill", 9);
    remote.seed_task(user.id, "Renew car insurance", 6);
    remote.seed_task(user.id, "Sort old receipts", 2);
    remote.seed_loan(user.id, "HDFC Bank", LenderType::Bank, Decimal::from(250_000));
    remote.seed_loan(user.id, "Ravi", LenderType::Person, Decimal::from(15_000));
    remote
}

impl Remote for Backend {
    async fn send(&self, request: Request) -> Result<Reply, SyncError> {
        match self {
            Self::Http(remote) => remote.send(request).await,
            Self::Memory(remote) => remote.send(request).await,
        }
    }
}
