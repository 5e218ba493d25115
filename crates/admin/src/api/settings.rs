//! Store settings singleton.

use serde_json::Value;
use tracing::instrument;

use crate::http::{ApiClient, ApiError};

use super::Settings;

/// `/settings` endpoints.
#[derive(Debug, Clone)]
pub struct SettingsApi {
    client: ApiClient,
}

impl SettingsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /settings`
    ///
    /// A backend that has never saved settings may answer with an empty
    /// body; that reads as empty settings.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Settings, ApiError> {
        let settings: Option<Settings> = self.client.get("settings").await?;
        Ok(settings.unwrap_or_default())
    }

    /// `PUT /settings`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self, settings))]
    pub async fn update(&self, settings: &Settings) -> Result<Value, ApiError> {
        self.client.put("settings", settings).await
    }
}
