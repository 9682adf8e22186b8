//! # Sale Commands
//!
//! ## Record Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(raw)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_sale ──── rejected ──► ApiError VALIDATION_ERROR (no I/O)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleCoordinator::record_sale                                           │
//! │       ├── Recorded           ──► RecordSaleResponse (+ warning)         │
//! │       ├── InsufficientStock  ──► ApiError INSUFFICIENT_STOCK            │
//! │       └── Failed             ──► ApiError DATABASE_ERROR                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use crate::identity::Session;
use crate::services::{NextView, SaleOutcome};
use crate::Backoffice;
use bizdesk_core::validation::{validate_sale, RawFields};
use bizdesk_core::{CoreError, LowStockWarning, Sale, SaleListing};

/// Response from record_sale command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleResponse {
    pub sale: Sale,
    pub message: String,
    /// Set when the sale left the product below the low-stock threshold.
    pub low_stock_warning: Option<LowStockWarning>,
    pub next_view: NextView,
}

/// Validates the sale form and records the sale.
pub async fn record_sale(
    app: &Backoffice,
    session: &Session,
    raw: &RawFields,
) -> Result<RecordSaleResponse, ApiError> {
    debug!(user_id = %session.user_id, "record_sale command");

    let draft = validate_sale(raw)?;
    let outcome = app.sales().record_sale(&draft).await;
    let message = outcome.message();

    match outcome {
        SaleOutcome::Recorded {
            sale,
            low_stock_warning,
        } => {
            info!(sale_id = %sale.id, total_cents = sale.total_value_cents, "record_sale done");
            Ok(RecordSaleResponse {
                sale,
                message,
                low_stock_warning,
                next_view: NextView::SalesList,
            })
        }
        SaleOutcome::InsufficientStock {
            product_name,
            available,
        } => Err(CoreError::InsufficientStock {
            product_name,
            available,
            requested: draft.quantity_sold,
        }
        .into()),
        SaleOutcome::Failed { reason } => Err(ApiError::new(ErrorCode::DatabaseError, reason)),
    }
}

/// Lists sales by sale date, newest first, with product and customer names.
pub async fn list_sales(app: &Backoffice, session: &Session) -> Result<Vec<SaleListing>, ApiError> {
    debug!(user_id = %session.user_id, "list_sales command");

    Ok(app.db().sales().list_with_names().await?)
}
