//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use storekeep_core::Email;

use crate::http::{ApiClient, ApiError};
use crate::models::CurrentAdmin;

/// Wire body of `POST /auth/login`.
#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginWire {
    token: String,
    #[serde(default, alias = "admin")]
    user: Option<CurrentAdmin>,
}

/// Successful login.
pub struct LoginResponse {
    pub token: SecretString,
    /// Profile of the admin, when the backend includes it.
    pub user: Option<CurrentAdmin>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// `/auth/me` answers either with the profile or with `{ "user": profile }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileWire {
    Wrapped {
        #[serde(alias = "admin")]
        user: CurrentAdmin,
    },
    Bare(CurrentAdmin),
}

/// `/auth/*` endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`
    ///
    /// Sent without a bearer token. Rejected credentials come back as
    /// [`ApiError::Status`] with status 401 and leave any stored session alone.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginBody {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let wire: LoginWire = self.client.post_credentials("auth/login", &body).await?;

        Ok(LoginResponse {
            token: SecretString::from(wire.token),
            user: wire.user,
        })
    }

    /// `GET /auth/me`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<CurrentAdmin, ApiError> {
        let profile: ProfileWire = self.client.get("auth/me").await?;
        Ok(match profile {
            ProfileWire::Wrapped { user } | ProfileWire::Bare(user) => user,
        })
    }

    /// `POST /auth/logout`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Value, ApiError> {
        self.client
            .post("auth/logout", &serde_json::Map::new())
            .await
    }
}
