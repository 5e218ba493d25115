//! Dashboard overview.

use serde_json::json;

use storekeep_admin::guard::Route;

use super::{CliError, Console, print_json};

/// # Errors
///
/// Returns an error if not logged in or any overview request fails.
pub async fn show(console: &Console) -> Result<(), CliError> {
    console.enter(&Route::Dashboard).await?;
    let mut view = console.app.dashboard();
    view.load().await?;

    print_json(&json!({
        "stats": view.stats(),
        "recentOrders": view.recent_orders(),
        "lowStockProducts": view.low_stock_products(),
    }))
}
