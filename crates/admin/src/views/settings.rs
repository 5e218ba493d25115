//! Store settings page.

use serde_json::{Map, Value};
use tracing::instrument;

use crate::api::Settings;

use super::{ViewContext, ViewError};

/// The settings form, edited in place.
///
/// Nested values are addressed with dotted paths such as
/// `socialMedia.facebook` or `shippingMethods.express.price`.
#[derive(Debug)]
pub struct SettingsView {
    ctx: ViewContext,
    settings: Settings,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl SettingsView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            settings: Settings::new(),
            loading: false,
            saving: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Value at a dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut keys = path.split('.');
        let first = self.settings.get(keys.next()?)?;
        keys.try_fold(first, |value, key| value.get(key))
    }

    /// Set the value at a dotted path, creating intermediate objects.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        set_path(self.settings.fields_mut(), path, value.into());
    }

    /// # Errors
    ///
    /// Returns `ViewError::Api` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.loading = true;
        self.error = None;
        let result = self.ctx.api.settings().get().await;
        self.loading = false;

        match result {
            Ok(settings) => {
                self.settings = settings;
                Ok(())
            }
            Err(e) => {
                self.error = Some(self.ctx.absorb(&e));
                Err(e.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Api` if the update fails. Local edits are kept.
    #[instrument(skip(self))]
    pub async fn save(&mut self) -> Result<(), ViewError> {
        self.saving = true;
        let result = self.ctx.api.settings().update(&self.settings).await;
        self.saving = false;

        match result {
            Ok(_) => {
                self.ctx.success("Settings updated successfully");
                Ok(())
            }
            Err(e) => {
                self.error = Some(self.ctx.absorb(&e));
                Err(e.into())
            }
        }
    }
}

fn set_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut current = root;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        if keys.peek().is_none() {
            current.insert(key.to_string(), value);
            return;
        }
        let slot = current.entry(key.to_string()).or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(next) => current = next,
            _ => return,
        }
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
    fn test_set_path_creates_nested_objects() {
        let mut map = Map::new();
        set_path(&mut map, "siteName", json!("Shop"));
        set_path(&mut map, "shippingMethods.express.price", json!(12));
        set_path(&mut map, "siteName.bad", json!(true));
        assert_eq!(
            Value::Object(map),
            json!({
                "siteName": {"bad": true},
                "shippingMethods": {"express": {"price": 12}}
            })
        );
    }

    #[tokio::test]
    async fn test_load_edit_save() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "siteName": "Shop",
                "socialMedia": {"facebook": ""}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/settings"))
            .and(body_json(json!({
                "siteName": "Shop",
                "socialMedia": {"facebook": "fb.com/shop"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let mut view = SettingsView::new(h.ctx.clone());
        view.load().await.unwrap();
        assert_eq!(view.get("socialMedia.facebook"), Some(&json!("")));

        view.set("socialMedia.facebook", "fb.com/shop");
        view.save().await.unwrap();
        assert!(!view.is_saving());
        assert_eq!(
            h.toasts.messages(),
            vec!["Settings updated successfully".to_string()]
        );
    }
}
