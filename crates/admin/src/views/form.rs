//! Create and edit forms.

use serde_json::Value;
use tracing::debug;

use storekeep_core::RecordId;

use crate::api::{Record, Resource};
use crate::guard::Route;

use super::{ViewContext, ViewError};

/// Server-managed fields dropped when a record is loaded into a form.
const SERVER_FIELDS: [&str; 5] = ["_id", "id", "__v", "createdAt", "updatedAt"];

/// Form for one resource's record.
///
/// Holds raw field values. The only local check is that required fields are
/// filled in; everything else is the backend's call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    resource: Resource,
    data: Record,
    submitting: bool,
    error: Option<String>,
}

impl RecordForm {
    /// Empty form for a new record.
    #[must_use]
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            data: Record::new(),
            submitting: false,
            error: None,
        }
    }

    /// Form prefilled from an existing record.
    #[must_use]
    pub fn from_record(resource: Resource, record: &Record) -> Self {
        let mut data = record.clone();
        for field in SERVER_FIELDS {
            data.remove(field);
        }
        Self {
            data,
            ..Self::new(resource)
        }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    #[must_use]
    pub const fn data(&self) -> &Record {
        &self.data
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(field, value);
        self
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Required fields that are absent, null or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        self.resource
            .required_fields()
            .iter()
            .filter(|field| match self.data.get(field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .map(|field| (*field).to_string())
            .collect()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Validation` listing every blank required field.
    pub fn validate(&self) -> Result<(), ViewError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ViewError::Validation(missing))
        }
    }

    /// Create the record, then return to the resource's list.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` before any request when required fields
    /// are blank, or `ViewError::Api` when the backend rejects the record.
    pub async fn create(&mut self, ctx: &ViewContext) -> Result<Value, ViewError> {
        self.submit(ctx, None).await
    }

    /// Update record `id`, then return to the resource's list.
    ///
    /// # Errors
    ///
    /// Same as [`RecordForm::create`].
    pub async fn update(&mut self, ctx: &ViewContext, id: &RecordId) -> Result<Value, ViewError> {
        self.submit(ctx, Some(id)).await
    }

    async fn submit(
        &mut self,
        ctx: &ViewContext,
        id: Option<&RecordId>,
    ) -> Result<Value, ViewError> {
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        let api = ctx.api.resource(self.resource);
        let result = match id {
            Some(id) => api.update(id, &self.data).await,
            None => api.create(&self.data).await,
        };
        self.submitting = false;

        match result {
            Ok(value) => {
                let verb = if id.is_some() { "updated" } else { "created" };
                debug!(resource = %self.resource, verb, "record saved from form");
                ctx.success(format!("{} {verb} successfully", self.resource.label()));
                ctx.navigation.go(&Route::list_of(self.resource));
                Ok(value)
            }
            Err(e) => {
                self.error = Some(ctx.absorb(&e));
                Err(e.into())
            }
        }
    }
}

/// The "add blog post" page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogForm {
    pub title: String,
    pub content: String,
    pub image: String,
    pub author: String,
    /// Comma-separated.
    pub tags: String,
    pub status: String,
}

impl Default for BlogForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            image: String::new(),
            author: String::new(),
            tags: String::new(),
            status: "draft".to_string(),
        }
    }
}

impl BlogForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags split on commas, trimmed, empties dropped.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The generic form this page submits.
    #[must_use]
    pub fn to_form(&self) -> RecordForm {
        RecordForm::new(Resource::Blogs)
            .with("title", self.title.as_str())
            .with("content", self.content.as_str())
            .with("image", self.image.as_str())
            .with("author", self.author.as_str())
            .with("tags", self.tag_list())
            .with("status", self.status.as_str())
    }

    /// Create the post and return to the blog list.
    ///
    /// # Errors
    ///
    /// See [`RecordForm::create`].
    pub async fn submit(&self, ctx: &ViewContext) -> Result<Value, ViewError> {
        self.to_form().create(ctx).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::views::testing::harness;

    #[test]
    fn test_missing_fields_treats_blank_as_missing() {
        let form = RecordForm::new(Resource::ShippingMethods)
            .with("name", "  ")
            .with("price", 4.5)
            .with("estimatedDays", Value::Null);
        assert_eq!(form.missing_fields(), vec!["name", "estimatedDays"]);
        assert!(matches!(form.validate(), Err(ViewError::Validation(_))));
    }

    #[test]
    fn test_from_record_drops_server_fields() {
        let record = Record::new()
            .with("_id", "d1")
            .with("code", "SAVE10")
            .with("createdAt", "2024-01-01");
        let form = RecordForm::from_record(Resource::Discounts, &record);
        assert_eq!(form.data(), &Record::new().with("code", "SAVE10"));
    }

    #[test]
    fn test_blog_form_defaults_and_tags() {
        let form = BlogForm {
            tags: "rust, web ,, admin".to_string(),
            ..BlogForm::new()
        };
        assert_eq!(form.status, "draft");
        assert_eq!(form.tag_list(), vec!["rust", "web", "admin"]);
        assert_eq!(
            form.to_form().data().get("tags"),
            Some(&json!(["rust", "web", "admin"]))
        );
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let h = harness(&server);
        let err = BlogForm::new().submit(&h.ctx).await.unwrap_err();
        assert!(matches!(err, ViewError::Validation(ref f) if f.len() == 4));
        assert!(h.history.history().is_empty());
    }

    #[tokio::test]
    async fn test_blog_submit_creates_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/blogs"))
            .and(body_json(json!({
                "title": "Hello",
                "content": "Body",
                "image": "https://img.example/1.png",
                "author": "Ada",
                "tags": ["news"],
                "status": "draft"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "b1"})))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let form = BlogForm {
            title: "Hello".to_string(),
            content: "Body".to_string(),
            image: "https://img.example/1.png".to_string(),
            author: "Ada".to_string(),
            tags: "news".to_string(),
            ..BlogForm::new()
        };
        form.submit(&h.ctx).await.unwrap();

        assert_eq!(h.history.current(), Some(Route::Blogs));
        assert_eq!(
            h.toasts.messages(),
            vec!["Blog post created successfully".to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_puts_to_record() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/products/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let mut form = RecordForm::new(Resource::Products)
            .with("name", "Tee")
            .with("price", 20);
        form.update(&h.ctx, &RecordId::new("p1")).await.unwrap();
        assert!(!form.is_submitting());
        assert_eq!(h.history.current(), Some(Route::Products));
    }
}
