//! Single-record page (order details).

use reqwest::StatusCode;
use tracing::instrument;

use storekeep_core::RecordId;

use crate::api::{Record, Resource, ResourceApi, StatusUpdate};

use super::{ViewContext, ViewError};

/// One record fetched by id, with status changes.
#[derive(Debug)]
pub struct DetailView {
    ctx: ViewContext,
    api: ResourceApi,
    id: RecordId,
    record: Option<Record>,
    loading: bool,
    updating: bool,
    error: Option<String>,
}

impl DetailView {
    #[must_use]
    pub fn new(ctx: ViewContext, resource: Resource, id: RecordId) -> Self {
        let api = ctx.api.resource(resource);
        Self {
            ctx,
            api,
            id,
            record: None,
            loading: false,
            updating: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    #[must_use]
    pub const fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.updating
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the record.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` when the backend answers 404, or
    /// `ViewError::Api` for any other failure.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn load(&mut self) -> Result<&Record, ViewError> {
        self.loading = true;
        self.error = None;
        let result = self.api.get_by_id(&self.id).await;
        self.loading = false;

        match result {
            Ok(record) => Ok(self.record.insert(record)),
            Err(e) => {
                self.record = None;
                self.error = Some(self.ctx.absorb(&e));
                if e.status() == Some(StatusCode::NOT_FOUND) {
                    let label = self.api.resource().label();
                    self.error = Some(format!("{label} not found"));
                    return Err(ViewError::NotFound(format!("{label} {}", self.id)));
                }
                Err(e.into())
            }
        }
    }

    /// Set the record's status to `update` and re-fetch.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Api` if the update fails.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn set_status(&mut self, update: &StatusUpdate) -> Result<(), ViewError> {
        self.updating = true;
        let result = self.api.update_status(&self.id, update).await;
        self.updating = false;

        if let Err(e) = result {
            self.error = Some(self.ctx.absorb(&e));
            return Err(ViewError::Api(e));
        }
        self.ctx.success(format!(
            "{} status updated successfully",
            self.api.resource().label()
        ));
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "re-fetch after status change failed");
        }
        Ok(())
    }
}
