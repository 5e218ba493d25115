//! Resource list pages (orders, products, customers, blogs, discounts,
//! shipping methods).

use serde_json::Value;
use tracing::{instrument, warn};

use storekeep_core::RecordId;

use crate::api::{Record, Resource, ResourceApi, StatusUpdate};

use super::{Confirm, RecordForm, ViewContext, ViewError};

/// A table of records with a detail/edit modal.
///
/// Every mutation is followed by a fresh `get_all`; the list is never
/// patched locally.
#[derive(Debug)]
pub struct ListView {
    ctx: ViewContext,
    api: ResourceApi,
    records: Vec<Record>,
    selected: Option<Record>,
    loading: bool,
    error: Option<String>,
}

impl ListView {
    #[must_use]
    pub fn new(ctx: ViewContext, resource: Resource) -> Self {
        let api = ctx.api.resource(resource);
        Self {
            ctx,
            api,
            records: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.api.resource()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record open in the modal.
    #[must_use]
    pub const fn selected(&self) -> Option<&Record> {
        self.selected.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id().as_ref() == Some(id))
    }

    /// Fetch the list. `loading` stays set until the request settles.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Api` if the fetch fails; the previous records are
    /// kept and `error` is set.
    #[instrument(skip(self), fields(resource = %self.resource()))]
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.loading = true;
        self.error = None;
        let result = self.api.get_all().await;
        self.loading = false;

        match result {
            Ok(records) => {
                self.records = records;
                Ok(())
            }
            Err(e) => {
                self.error = Some(self.ctx.absorb(&e));
                Err(e.into())
            }
        }
    }

    /// Open the modal for record `id`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` if the record is not in the list.
    pub fn select(&mut self, id: &RecordId) -> Result<&Record, ViewError> {
        let record = self
            .find(id)
            .cloned()
            .ok_or_else(|| ViewError::NotFound(format!("{} {id}", self.resource().label())))?;
        Ok(self.selected.insert(record))
    }

    /// Close the modal.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Form for the open modal: prefilled when a record is selected, empty
    /// otherwise.
    #[must_use]
    pub fn form(&self) -> RecordForm {
        self.selected.as_ref().map_or_else(
            || RecordForm::new(self.resource()),
            |record| RecordForm::from_record(self.resource(), record),
        )
    }

    /// Flip record `id` between its two statuses.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` if the record is not in the list, or
    /// `ViewError::Api` if the update fails.
    pub async fn toggle_status(&mut self, id: &RecordId) -> Result<StatusUpdate, ViewError> {
        let record = self
            .find(id)
            .ok_or_else(|| ViewError::NotFound(format!("{} {id}", self.resource().label())))?;
        let update = self.resource().status_field().toggled(record);
        self.set_status(id, &update).await?;
        Ok(update)
    }

    /// Send an explicit status update for record `id`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Api` if the update fails.
    #[instrument(skip(self), fields(resource = %self.resource()))]
    pub async fn set_status(
        &mut self,
        id: &RecordId,
        update: &StatusUpdate,
    ) -> Result<(), ViewError> {
        if let Err(e) = self.api.update_status(id, update).await {
            self.error = Some(self.ctx.absorb(&e));
            return Err(e.into());
        }
        self.ctx.success(format!(
            "{} {} successfully",
            self.resource().label(),
            update.describe()
        ));
        self.refresh().await;
        Ok(())
    }

    /// Delete record `id` once `confirm` approves.
    ///
    /// Returns whether a delete was sent.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Api` if the delete fails.
    #[instrument(skip(self, confirm), fields(resource = %self.resource()))]
    pub async fn delete(
        &mut self,
        id: &RecordId,
        confirm: &dyn Confirm,
    ) -> Result<bool, ViewError> {
        let prompt = format!(
            "Are you sure you want to delete this {}?",
            self.resource().label().to_lowercase()
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        if let Err(e) = self.api.delete(id).await {
            self.error = Some(self.ctx.absorb(&e));
            return Err(e.into());
        }
        self.ctx
            .success(format!("{} deleted successfully", self.resource().label()));
        if self.selected.as_ref().and_then(Record::id).as_ref() == Some(id) {
            self.close();
        }
        self.refresh().await;
        Ok(true)
    }

    /// Submit the modal form: update the selected record, or create a new
    /// one when nothing is selected. Closes the modal on success.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` before any request when required
    /// fields are blank, or `ViewError::Api` if the save fails.
    #[instrument(skip(self, form), fields(resource = %self.resource()))]
    pub async fn save(&mut self, form: &RecordForm) -> Result<Value, ViewError> {
        form.validate()?;

        let target = self.selected.as_ref().and_then(Record::id);
        let result = match &target {
            Some(id) => self.api.update(id, form.data()).await,
            None => self.api.create(form.data()).await,
        };
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                self.error = Some(self.ctx.absorb(&e));
                return Err(e.into());
            }
        };

        let verb = if target.is_some() { "updated" } else { "created" };
        self.ctx
            .success(format!("{} {verb} successfully", self.resource().label()));
        self.close();
        self.refresh().await;
        Ok(value)
    }

    /// Re-fetch after a successful mutation. A failure here only shows up in
    /// `error`; the mutation itself went through.
    async fn refresh(&mut self) {
        if let Err(e) = self.load().await {
            warn!(error = %e, "re-fetch after mutation failed");
        }
    }
}
