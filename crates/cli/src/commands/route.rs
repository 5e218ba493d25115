//! Route guard check.

use serde_json::json;

use storekeep_admin::guard::GuardDecision;

use super::{CliError, Console, print_json};

/// Print what the dashboard would show for `path` with the current session.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn check(console: &Console, path: &str) -> Result<(), CliError> {
    let state = console.app.auth().resolve().await;
    let decision = match console.app.guard(path) {
        GuardDecision::Loading => json!({ "decision": "loading" }),
        GuardDecision::Render(route) => json!({ "decision": "render", "route": route.path() }),
        GuardDecision::Redirect(route) => json!({ "decision": "redirect", "route": route.path() }),
        GuardDecision::NotFound => json!({ "decision": "not_found" }),
    };
    tracing::debug!(authenticated = state.is_authenticated(), path, "route checked");
    print_json(&decision)
}
