//! # Config Command
//!
//! What the web client needs to render headers and prices.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::identity::Session;
use crate::services::SaleWriteMode;
use crate::Backoffice;

/// Client-facing slice of [`AppConfig`](crate::AppConfig). The database
/// path stays on the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Dashboard header.
    pub business_name: String,
    pub currency_symbol: String,
    pub low_stock_threshold: i64,
    pub sale_write_mode: SaleWriteMode,
}

/// Called once when the client starts.
pub async fn get_config(app: &Backoffice, session: &Session) -> Result<ClientConfig, ApiError> {
    debug!(user_id = %session.user_id, "get_config command");

    let config = app.config();
    Ok(ClientConfig {
        business_name: config.business_name.clone(),
        currency_symbol: config.currency_symbol.clone(),
        low_stock_threshold: config.low_stock_threshold,
        sale_write_mode: config.sale_write_mode,
    })
}
