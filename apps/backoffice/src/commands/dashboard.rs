//! # Dashboard Command
//!
//! The four counters are independent reads and are issued together.

use tracing::debug;

use crate::error::ApiError;
use crate::identity::Session;
use crate::Backoffice;
use bizdesk_core::{DashboardStats, DeliveryStatus};

pub async fn dashboard_stats(
    app: &Backoffice,
    session: &Session,
) -> Result<DashboardStats, ApiError> {
    debug!(user_id = %session.user_id, "dashboard_stats command");

    let db = app.db();
    let products = db.products();
    let customers = db.customers();
    let sales = db.sales();
    let deliveries = db.deliveries();

    let (
        (total_products, low_stock_count),
        total_customers,
        (total_sales, total_revenue_cents),
        pending_deliveries,
    ) = tokio::try_join!(
        products.stock_summary(app.config().low_stock_threshold),
        customers.count(),
        sales.totals(),
        deliveries.count_by_status(DeliveryStatus::Pending),
    )?;

    Ok(DashboardStats {
        total_products,
        total_customers,
        total_sales,
        pending_deliveries,
        total_revenue_cents,
        low_stock_count,
    })
}
