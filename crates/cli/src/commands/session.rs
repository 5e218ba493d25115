//! Sign in, sign out, who am I.

use storekeep_admin::guard::Route;

use super::{CliError, Console, print_json, read_line};

/// # Errors
///
/// Returns an error if the login is rejected.
pub async fn login(
    console: &Console,
    email: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_line("Password (input is echoed): ")?,
    };

    let mut view = console.app.login();
    view.email = email.to_string();
    view.password = password;
    let admin = view.submit().await?;

    tracing::info!(admin_id = %admin.id, "logged in");
    print_json(&admin)
}

pub async fn logout(console: &Console) {
    console.app.auth().logout().await;
    tracing::info!("logged out");
}

/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a valid session.
pub async fn whoami(console: &Console) -> Result<(), CliError> {
    console.enter(&Route::Dashboard).await?;
    let admin = console
        .app
        .auth()
        .current_admin()
        .ok_or(CliError::NotLoggedIn)?;
    print_json(&admin)
}
