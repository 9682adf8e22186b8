//! # BizDesk Back Office
//!
//! Command layer of the BizDesk back office. The web client calls these
//! commands with raw form fields; they validate, talk to the database and
//! publish notifications.
//!
//! ## Module Organization
//! ```text
//! bizdesk_backoffice/
//! ├── lib.rs            ◄─── You are here (Backoffice context, startup)
//! ├── config.rs         ◄─── AppConfig from BIZDESK_* variables
//! ├── error.rs          ◄─── API error type for commands
//! ├── identity.rs       ◄─── IdentityProvider seam + in-memory provider
//! ├── notifications.rs  ◄─── Broadcast hub (low stock, sale recorded)
//! ├── services/
//! │   ├── sale_service.rs ◄─ Sale-transaction coordinator
//! │   └── store.rs        ◄─ Storage seam for the coordinator
//! └── commands/
//!     ├── product.rs    ◄─── add / list / get / low stock / sale defaults
//!     ├── customer.rs   ◄─── add / list
//!     ├── sale.rs       ◄─── record_sale / list_sales
//!     ├── delivery.rs   ◄─── add / list
//!     ├── dashboard.rs  ◄─── dashboard_stats
//!     ├── config.rs     ◄─── get_config
//!     └── auth.rs       ◄─── sign_in / sign_up / sign_out
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG or "info,bizdesk=debug,sqlx=warn"  │
//! │  2. AppConfig::from_env()   BIZDESK_* over defaults                     │
//! │  3. Backoffice::open()      create data dir, connect, run migrations    │
//! │  4. commands::*(&app, &session, &raw)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod identity;
pub mod notifications;
pub mod services;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bizdesk_db::{Database, DbConfig};

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorCode, StartupError};
pub use identity::{IdentityError, IdentityProvider, InMemoryIdentity, Session};
pub use notifications::{Notification, Notifications};
pub use services::{NextView, SaleCoordinator, SaleOutcome, SaleStore, SaleWriteMode};

/// Everything a command needs.
///
/// Cheap to share behind an `Arc`; the database handle is a pool.
pub struct Backoffice {
    db: Database,
    config: AppConfig,
    notifications: Notifications,
    identity: Arc<dyn IdentityProvider>,
    sales: SaleCoordinator<Database>,
}

impl Backoffice {
    /// Assembles the context from an open database.
    pub fn new(db: Database, config: AppConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        let notifications = Notifications::new();
        let sales = SaleCoordinator::new(db.clone(), notifications.clone())
            .with_threshold(config.low_stock_threshold)
            .with_mode(config.sale_write_mode);

        Backoffice {
            db,
            config,
            notifications,
            identity,
            sales,
        }
    }

    /// Opens the database named by `config` and assembles the context.
    pub async fn open(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, StartupError> {
        if let Some(dir) = config.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(ConfigError::from)?;
            }
        }

        info!(db_path = %config.db_path.display(), "Opening back office");
        let db = Database::new(DbConfig::new(&config.db_path)).await?;

        info!(
            mode = %config.sale_write_mode,
            threshold = config.low_stock_threshold,
            "Back office ready"
        );
        Ok(Backoffice::new(db, config, identity))
    }

    /// Loads configuration from the environment, then [`Backoffice::open`].
    pub async fn from_env(identity: Arc<dyn IdentityProvider>) -> Result<Self, StartupError> {
        let config = AppConfig::from_env()?;
        Backoffice::open(config, identity).await
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// The sale coordinator, configured from [`AppConfig`].
    pub fn sales(&self) -> &SaleCoordinator<Database> {
        &self.sales
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizdesk=trace` - Show trace for bizdesk crates only
/// - Default: `info,bizdesk=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bizdesk=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
