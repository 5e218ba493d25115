//! Resource record commands.

use clap::Args;
use serde_json::{Value, json};

use storekeep_admin::api::{Resource, StatusField, StatusUpdate};
use storekeep_admin::guard::Route;
use storekeep_admin::views::{Approve, BlogForm, RecordForm};
use storekeep_core::RecordId;

use super::{CliError, Console, ask, parse_value, print_json};

/// Record fields given on the command line.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Whole record as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// One field as KEY=VALUE; VALUE is parsed as JSON when it can be
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

impl FieldArgs {
    /// Merge `--data` then every `--field` into `form`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Invalid` for malformed input.
    pub fn apply(&self, form: &mut RecordForm) -> Result<(), CliError> {
        if let Some(data) = &self.data {
            let Ok(Value::Object(map)) = serde_json::from_str::<Value>(data) else {
                return Err(CliError::Invalid("--data must be a JSON object".to_string()));
            };
            for (key, value) in map {
                form.set(key, value);
            }
        }
        for field in &self.fields {
            let (key, raw) = field
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| CliError::Invalid(format!("expected KEY=VALUE, got `{field}`")))?;
            form.set(key.trim(), parse_value(raw));
        }
        Ok(())
    }
}

/// The explicit status update `raw` means for `resource`.
fn parse_status(resource: Resource, raw: &str) -> Result<StatusUpdate, CliError> {
    match resource.status_field() {
        StatusField::Lifecycle { .. } => Ok(StatusUpdate::status(raw.trim())),
        StatusField::Active => raw
            .trim()
            .parse::<bool>()
            .map(StatusUpdate::active)
            .map_err(|_| CliError::Invalid(format!("{resource} status must be true or false"))),
    }
}

const fn create_route(resource: Resource) -> Route {
    match resource {
        Resource::Products => Route::AddProduct,
        Resource::Blogs => Route::AddBlog,
        other => Route::list_of(other),
    }
}

fn edit_route(resource: Resource, id: &RecordId) -> Route {
    match resource {
        Resource::Products => Route::EditProduct(id.clone()),
        other => Route::list_of(other),
    }
}

/// # Errors
///
/// Returns an error if not logged in or the fetch fails.
pub async fn list(console: &Console, resource: Resource) -> Result<(), CliError> {
    console.enter(&Route::list_of(resource)).await?;
    let mut view = console.app.list(resource);
    view.load().await?;
    print_json(view.records())
}

/// # Errors
///
/// Returns an error if not logged in or the record cannot be fetched.
pub async fn show(console: &Console, resource: Resource, id: &str) -> Result<(), CliError> {
    let id = RecordId::new(id);
    let route = match resource {
        Resource::Orders => Route::OrderDetails(id.clone()),
        other => Route::list_of(other),
    };
    console.enter(&route).await?;

    let mut view = console.app.detail(resource, id);
    let record = view.load().await?;
    print_json(record)
}

/// # Errors
///
/// Returns an error if not logged in or the delete fails.
pub async fn delete(
    console: &Console,
    resource: Resource,
    id: &str,
    yes: bool,
) -> Result<(), CliError> {
    console.enter(&Route::list_of(resource)).await?;
    let id = RecordId::new(id);
    let mut view = console.app.list(resource);

    let deleted = if yes {
        view.delete(&id, &Approve).await?
    } else {
        view.delete(&id, &ask).await?
    };
    print_json(&json!({ "id": id, "deleted": deleted }))
}

/// # Errors
///
/// Returns an error if not logged in, the record is unknown, or the update
/// fails.
pub async fn status(
    console: &Console,
    resource: Resource,
    id: &str,
    set: Option<&str>,
) -> Result<(), CliError> {
    console.enter(&Route::list_of(resource)).await?;
    let id = RecordId::new(id);
    let mut view = console.app.list(resource);

    let update = match set {
        Some(raw) => {
            let update = parse_status(resource, raw)?;
            view.set_status(&id, &update).await?;
            update
        }
        None => {
            view.load().await?;
            view.toggle_status(&id).await?
        }
    };
    print_json(&json!({ "id": id, "update": update }))
}

/// # Errors
///
/// Returns an error if not logged in, required fields are missing, or the
/// backend rejects the record.
pub async fn create(
    console: &Console,
    resource: Resource,
    fields: &FieldArgs,
) -> Result<(), CliError> {
    console.enter(&create_route(resource)).await?;
    let mut form = RecordForm::new(resource);
    fields.apply(&mut form)?;

    let mut view = console.app.list(resource);
    let created = view.save(&form).await?;
    print_json(&created)
}

/// # Errors
///
/// Returns an error if not logged in, the record is unknown, required
/// fields are missing, or the backend rejects the change.
pub async fn update(
    console: &Console,
    resource: Resource,
    id: &str,
    fields: &FieldArgs,
) -> Result<(), CliError> {
    let id = RecordId::new(id);
    console.enter(&edit_route(resource, &id)).await?;

    let mut view = console.app.list(resource);
    view.load().await?;
    view.select(&id)?;
    let mut form = view.form();
    fields.apply(&mut form)?;

    let updated = view.save(&form).await?;
    print_json(&updated)
}

/// # Errors
///
/// Returns an error if not logged in, required fields are missing, or the
/// backend rejects the post.
pub async fn add_blog(console: &Console, form: &BlogForm) -> Result<(), CliError> {
    console.enter(&Route::AddBlog).await?;
    let created = form.submit(&console.app.context()).await?;
    print_json(&created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_data_then_fields() {
        let args = FieldArgs {
            data: Some(r#"{"name": "Standard", "price": 5}"#.to_string()),
            fields: vec!["price=7.5".to_string(), "estimatedDays=3-5".to_string()],
        };
        let mut form = RecordForm::new(Resource::ShippingMethods);
        args.apply(&mut form).unwrap();

        assert_eq!(form.data().get("price"), Some(&json!(7.5)));
        assert_eq!(form.data().get_str("estimatedDays"), Some("3-5"));
        assert!(form.missing_fields().is_empty());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut form = RecordForm::new(Resource::Products);
        let bad_data = FieldArgs {
            data: Some("[1]".to_string()),
            fields: vec![],
        };
        assert!(bad_data.apply(&mut form).is_err());

        let bad_field = FieldArgs {
            data: None,
            fields: vec!["=x".to_string()],
        };
        assert!(bad_field.apply(&mut form).is_err());
    }

    #[test]
    fn test_parse_status_per_resource() {
        assert_eq!(
            parse_status(Resource::Orders, "shipped").unwrap(),
            StatusUpdate::status("shipped")
        );
        assert_eq!(
            parse_status(Resource::Discounts, "false").unwrap(),
            StatusUpdate::active(false)
        );
        assert!(parse_status(Resource::Customers, "maybe").is_err());
    }
}
