//! Login page.

use crate::auth::{AuthContext, AuthError};
use crate::guard::Route;
use crate::models::{Credentials, CurrentAdmin};

use super::ViewContext;

/// Email and password form.
pub struct LoginView {
    ctx: ViewContext,
    auth: AuthContext,
    pub email: String,
    pub password: String,
    submitting: bool,
    error: Option<String>,
}

impl std::fmt::Debug for LoginView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginView")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("submitting", &self.submitting)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl LoginView {
    #[must_use]
    pub const fn new(ctx: ViewContext, auth: AuthContext) -> Self {
        Self {
            ctx,
            auth,
            email: String::new(),
            password: String::new(),
            submitting: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in and go to the dashboard. On failure the view stays put with
    /// the error text set; the password field is cleared.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] from the auth context.
    pub async fn submit(&mut self) -> Result<CurrentAdmin, AuthError> {
        self.submitting = true;
        self.error = None;
        let credentials = Credentials::new(self.email.as_str(), self.password.as_str());
        let result = self.auth.login(&credentials).await;
        self.submitting = false;

        match result {
            Ok(admin) => {
                self.password.clear();
                self.ctx.navigation.go(&Route::Dashboard);
                Ok(admin)
            }
            Err(e) => {
                self.password.clear();
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
