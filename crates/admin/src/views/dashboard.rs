//! Overview page.

use tracing::{instrument, warn};

use crate::api::{DashboardStats, Record};
use crate::http::ApiError;

use super::{ViewContext, ViewError};

/// Error text shown when any of the overview requests fails.
pub const DASHBOARD_FAILURE: &str = "Failed to fetch dashboard data";

/// Counters, recent orders and low-stock products.
#[derive(Debug)]
pub struct DashboardView {
    ctx: ViewContext,
    stats: DashboardStats,
    recent_orders: Vec<Record>,
    low_stock_products: Vec<Record>,
    loading: bool,
    error: Option<String>,
}

impl DashboardView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            stats: DashboardStats {
                total_orders: 0,
                total_products: 0,
                total_customers: 0,
            },
            recent_orders: Vec::new(),
            low_stock_products: Vec::new(),
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    #[must_use]
    pub fn recent_orders(&self) -> &[Record] {
        &self.recent_orders
    }

    #[must_use]
    pub fn low_stock_products(&self) -> &[Record] {
        &self.low_stock_products
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Issue all three requests at once and wait for every one to settle.
    ///
    /// Sections that loaded are shown even when another failed.
    ///
    /// # Errors
    ///
    /// Returns the first failure as `ViewError::Api`.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.loading = true;
        self.error = None;

        let api = self.ctx.api.dashboard();
        let (stats, recent, low_stock) = tokio::join!(
            api.get_stats(),
            api.get_recent_orders(),
            api.get_low_stock_products(),
        );
        self.loading = false;

        let mut failures: Vec<ApiError> = Vec::new();
        match stats {
            Ok(stats) => self.stats = stats,
            Err(e) => failures.push(e),
        }
        match recent {
            Ok(orders) => self.recent_orders = orders,
            Err(e) => failures.push(e),
        }
        match low_stock {
            Ok(products) => self.low_stock_products = products,
            Err(e) => failures.push(e),
        }

        if failures.is_empty() {
            return Ok(());
        }
        warn!(failed = failures.len(), "dashboard requests failed");
        self.error = Some(DASHBOARD_FAILURE.to_string());

        // One redirect even if several requests saw the expired session.
        let first = match failures.iter().position(ApiError::is_unauthorized) {
            Some(i) => failures.swap_remove(i),
            None => failures.swap_remove(0),
        };
        self.ctx.navigation.observe(&first);
        Err(first.into())
    }
}
