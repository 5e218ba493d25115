//! Store settings.

use storekeep_admin::guard::Route;

use super::{CliError, Console, parse_value, print_json};

/// # Errors
///
/// Returns an error if not logged in, the fetch fails, or `path` is unset.
pub async fn get(console: &Console, path: Option<&str>) -> Result<(), CliError> {
    console.enter(&Route::Settings).await?;
    let mut view = console.app.settings();
    view.load().await?;

    match path {
        None => print_json(view.settings()),
        Some(path) => {
            let value = view
                .get(path)
                .ok_or_else(|| CliError::Invalid(format!("no setting at `{path}`")))?;
            print_json(value)
        }
    }
}

/// # Errors
///
/// Returns an error if not logged in or the load or save fails.
pub async fn set(console: &Console, path: &str, value: &str) -> Result<(), CliError> {
    console.enter(&Route::Settings).await?;
    let mut view = console.app.settings();
    view.load().await?;
    view.set(path, parse_value(value));
    view.save().await?;
    print_json(view.settings())
}
