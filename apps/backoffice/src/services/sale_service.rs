//! # Sale-Transaction Coordinator
//!
//! Records a sale and keeps product stock consistent with it.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        record_sale(draft)                               │
//! │                                                                         │
//! │  1. product(id)            fresh read ──── error / missing ──► Failed   │
//! │        │                                                                │
//! │  2. stock < quantity? ─────────────────────────► InsufficientStock      │
//! │        │                                          (nothing written)     │
//! │  3. insert_sale(sale)      total = qty × price ── error ──► Failed      │
//! │        │                                                                │
//! │  4. set_stock(id, stock − qty) ───────────────── error ──► Failed       │
//! │        │                                   (sale row stays; logged)     │
//! │  5. remaining < threshold? ──► publish LowStock (never blocks)          │
//! │        │                                                                │
//! │  6. Recorded { sale, low_stock_warning } → next view: sales list        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In [`SaleWriteMode::Atomic`] steps 2 to 4 become a single store
//! transaction with a conditional decrement, so the whole call is
//! all-or-nothing and concurrent sales cannot oversell.
//!
//! No step is retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

use super::store::SaleStore;
use crate::notifications::{Notification, Notifications};
use bizdesk_core::{LowStockWarning, Product, Sale, SaleDraft, LOW_STOCK_THRESHOLD};
use bizdesk_db::StockDecrement;

/// Message shown when any store step fails.
pub const SALE_FAILED_MESSAGE: &str = "Failed to record sale. Please try again.";

// =============================================================================
// Write Mode
// =============================================================================

/// How the sale and its stock decrement reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleWriteMode {
    /// Insert the sale, then write the new stock level. Two separate writes.
    #[default]
    TwoStep,
    /// Conditional decrement and insert in one transaction.
    Atomic,
}

impl SaleWriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleWriteMode::TwoStep => "two_step",
            SaleWriteMode::Atomic => "atomic",
        }
    }
}

impl fmt::Display for SaleWriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleWriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "two_step" | "two-step" => Ok(SaleWriteMode::TwoStep),
            "atomic" => Ok(SaleWriteMode::Atomic),
            other => Err(format!("unknown sale write mode: {}", other)),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Where the client goes after a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextView {
    SalesList,
}

/// Result of [`SaleCoordinator::record_sale`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaleOutcome {
    /// The sale was stored and stock decremented.
    Recorded {
        sale: Sale,
        low_stock_warning: Option<LowStockWarning>,
    },

    /// Not enough stock. Nothing was written.
    InsufficientStock {
        product_name: String,
        available: i64,
    },

    /// A store step failed.
    Failed { reason: String },
}

impl SaleOutcome {
    fn failed() -> Self {
        SaleOutcome::Failed {
            reason: SALE_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, SaleOutcome::Recorded { .. })
    }

    /// The view to show next; only a recorded sale moves on.
    pub fn next_view(&self) -> Option<NextView> {
        match self {
            SaleOutcome::Recorded { .. } => Some(NextView::SalesList),
            _ => None,
        }
    }

    /// User-facing message for the outcome.
    pub fn message(&self) -> String {
        match self {
            SaleOutcome::Recorded { .. } => "Sale recorded successfully".to_string(),
            SaleOutcome::InsufficientStock {
                product_name,
                available,
            } => format!(
                "Insufficient stock for {}. Available: {}",
                product_name, available
            ),
            SaleOutcome::Failed { reason } => reason.clone(),
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Runs the record-a-sale use case against a [`SaleStore`].
#[derive(Debug, Clone)]
pub struct SaleCoordinator<S> {
    store: S,
    notifications: Notifications,
    low_stock_threshold: i64,
    mode: SaleWriteMode,
}

impl<S: SaleStore> SaleCoordinator<S> {
    /// Creates a two-step coordinator with the default threshold.
    pub fn new(store: S, notifications: Notifications) -> Self {
        SaleCoordinator {
            store,
            notifications,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            mode: SaleWriteMode::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn with_mode(mut self, mode: SaleWriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SaleWriteMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records a validated sale.
    ///
    /// Never returns an error: store failures become
    /// [`SaleOutcome::Failed`] after being logged.
    pub async fn record_sale(&self, draft: &SaleDraft) -> SaleOutcome {
        debug!(
            product_id = %draft.product_id,
            quantity = draft.quantity_sold,
            mode = %self.mode,
            "Recording sale"
        );

        let product = match self.store.product(&draft.product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                warn!(product_id = %draft.product_id, "Sale for unknown product");
                return SaleOutcome::failed();
            }
            Err(e) => {
                error!(product_id = %draft.product_id, error = %e, "Failed to load product");
                return SaleOutcome::failed();
            }
        };

        match self.mode {
            SaleWriteMode::TwoStep => self.record_two_step(&product, draft).await,
            SaleWriteMode::Atomic => self.record_atomic(&product, draft).await,
        }
    }

    async fn record_two_step(&self, product: &Product, draft: &SaleDraft) -> SaleOutcome {
        if !product.can_sell(draft.quantity_sold) {
            return insufficient(product, product.stock_quantity, draft);
        }

        let sale = Sale::from_draft(draft);
        if let Err(e) = self.store.insert_sale(&sale).await {
            error!(sale_id = %sale.id, error = %e, "Failed to insert sale");
            return SaleOutcome::failed();
        }

        let new_stock = product.stock_quantity - draft.quantity_sold;
        if let Err(e) = self.store.set_stock(&product.id, new_stock).await {
            // The sale row exists but stock was not decremented.
            error!(
                sale_id = %sale.id,
                product_id = %product.id,
                expected_stock = new_stock,
                error = %e,
                "Sale recorded without stock update"
            );
            return SaleOutcome::failed();
        }

        self.recorded(product, sale, new_stock)
    }

    async fn record_atomic(&self, product: &Product, draft: &SaleDraft) -> SaleOutcome {
        let sale = Sale::from_draft(draft);

        match self.store.insert_sale_with_decrement(&sale).await {
            Ok(StockDecrement::Applied { remaining }) => self.recorded(product, sale, remaining),
            Ok(StockDecrement::Insufficient { available }) => {
                insufficient(product, available, draft)
            }
            Err(e) => {
                error!(sale_id = %sale.id, error = %e, "Atomic sale write failed");
                SaleOutcome::failed()
            }
        }
    }

    fn recorded(&self, product: &Product, sale: Sale, remaining: i64) -> SaleOutcome {
        info!(
            sale_id = %sale.id,
            product_id = %product.id,
            total_cents = sale.total_value_cents,
            remaining = remaining,
            "Sale recorded"
        );

        self.notifications.publish(Notification::SaleRecorded {
            sale_id: sale.id.clone(),
            product_name: product.name.clone(),
            total_value_cents: sale.total_value_cents,
        });

        let low_stock_warning = (remaining < self.low_stock_threshold).then(|| LowStockWarning {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            remaining,
        });

        if let Some(warning) = &low_stock_warning {
            self.notifications
                .publish(Notification::LowStock(warning.clone()));
        }

        SaleOutcome::Recorded {
            sale,
            low_stock_warning,
        }
    }
}

fn insufficient(product: &Product, available: i64, draft: &SaleDraft) -> SaleOutcome {
    info!(
        product_id = %product.id,
        available = available,
        requested = draft.quantity_sold,
        "Insufficient stock"
    );

    SaleOutcome::InsufficientStock {
        product_name: product.name.clone(),
        available,
    }
}
