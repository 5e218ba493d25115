//! Dashboard overview endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::http::{ApiClient, ApiError};

use super::Record;

/// Headline counters for the overview page.
///
/// Counters the backend leaves out, or sends as anything other than a
/// non-negative number, read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "lenient_count")]
    pub total_orders: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_products: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_customers: u64,
}

/// Accept integers, fractional numbers (truncated), numeric strings and
/// `null`.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(float_count)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(float_count),
        _ => None,
    };
    Ok(count.unwrap_or_default())
}

// Float-to-int `as` saturates; negatives and NaN land on zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_count(value: f64) -> u64 {
    if value > 0.0 { value.trunc() as u64 } else { 0 }
}

/// `/dashboard/*` endpoints.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /dashboard/stats`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<DashboardStats, ApiError> {
        let stats: Option<DashboardStats> = self.client.get("dashboard/stats").await?;
        Ok(stats.unwrap_or_default())
    }

    /// `GET /dashboard/recent-orders`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn get_recent_orders(&self) -> Result<Vec<Record>, ApiError> {
        let orders: Option<Vec<Record>> = self.client.get("dashboard/recent-orders").await?;
        Ok(orders.unwrap_or_default())
    }

    /// `GET /dashboard/low-stock-products`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn get_low_stock_products(&self) -> Result<Vec<Record>, ApiError> {
        let products: Option<Vec<Record>> =
            self.client.get("dashboard/low-stock-products").await?;
        Ok(products.unwrap_or_default())
    }
}
