//! Resource API modules.
//!
//! Each module maps operations one-to-one onto backend calls through the
//! shared [`ApiClient`]. Payloads pass through as raw JSON records; errors
//! come back exactly as the client produced them.

mod auth;
mod dashboard;
mod record;
mod resource;
mod settings;

pub use auth::{AuthApi, LoginResponse};
pub use dashboard::{DashboardApi, DashboardStats};
pub use record::{Record, Settings};
pub use resource::{Resource, ResourceApi, StatusField, StatusUpdate};
pub use settings::SettingsApi;

use crate::http::ApiClient;

/// Entry point to every backend API.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn resource(&self, resource: Resource) -> ResourceApi {
        ResourceApi::new(self.client.clone(), resource)
    }

    #[must_use]
    pub fn products(&self) -> ResourceApi {
        self.resource(Resource::Products)
    }

    #[must_use]
    pub fn orders(&self) -> ResourceApi {
        self.resource(Resource::Orders)
    }

    #[must_use]
    pub fn customers(&self) -> ResourceApi {
        self.resource(Resource::Customers)
    }

    #[must_use]
    pub fn blogs(&self) -> ResourceApi {
        self.resource(Resource::Blogs)
    }

    #[must_use]
    pub fn discounts(&self) -> ResourceApi {
        self.resource(Resource::Discounts)
    }

    #[must_use]
    pub fn shipping_methods(&self) -> ResourceApi {
        self.resource(Resource::ShippingMethods)
    }

    #[must_use]
    pub fn settings(&self) -> SettingsApi {
        SettingsApi::new(self.client.clone())
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(self.client.clone())
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }
}
