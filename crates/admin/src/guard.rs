//! Dashboard routes and the authentication guard in front of them.

use storekeep_core::RecordId;

use crate::api::Resource;
use crate::auth::AuthState;

/// A dashboard location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    /// `/admin`, an alias of the dashboard.
    Home,
    Dashboard,
    Orders,
    OrderDetails(RecordId),
    Products,
    AddProduct,
    EditProduct(RecordId),
    Customers,
    Blogs,
    AddBlog,
    Discounts,
    ShippingMethods,
    Settings,
}

impl Route {
    /// Where unauthenticated visitors are sent.
    pub const LOGIN_PATH: &'static str = "/admin/login";

    /// Parse a path into a route.
    ///
    /// Trailing slashes and query strings are ignored. `/` is not a route of
    /// its own; [`RouteGuard::resolve`] redirects it.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["admin"] => Self::Home,
            ["admin", "login"] => Self::Login,
            ["admin", "dashboard"] => Self::Dashboard,
            ["admin", "orders"] => Self::Orders,
            ["admin", "orders", id] => Self::OrderDetails(decode_id(id)?),
            ["admin", "products"] => Self::Products,
            ["admin", "add-product"] => Self::AddProduct,
            ["admin", "edit-product", id] => Self::EditProduct(decode_id(id)?),
            ["admin", "customers"] => Self::Customers,
            ["admin", "blogs"] => Self::Blogs,
            ["admin", "add-blog"] => Self::AddBlog,
            ["admin", "discounts"] => Self::Discounts,
            ["admin", "shipping-methods"] => Self::ShippingMethods,
            ["admin", "settings"] => Self::Settings,
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => Self::LOGIN_PATH.to_string(),
            Self::Home => "/admin".to_string(),
            Self::Dashboard => "/admin/dashboard".to_string(),
            Self::Orders => "/admin/orders".to_string(),
            Self::OrderDetails(id) => format!("/admin/orders/{}", urlencoding::encode(id.as_str())),
            Self::Products => "/admin/products".to_string(),
            Self::AddProduct => "/admin/add-product".to_string(),
            Self::EditProduct(id) => {
                format!("/admin/edit-product/{}", urlencoding::encode(id.as_str()))
            }
            Self::Customers => "/admin/customers".to_string(),
            Self::Blogs => "/admin/blogs".to_string(),
            Self::AddBlog => "/admin/add-blog".to_string(),
            Self::Discounts => "/admin/discounts".to_string(),
            Self::ShippingMethods => "/admin/shipping-methods".to_string(),
            Self::Settings => "/admin/settings".to_string(),
        }
    }

    /// Every route except the login page requires an authenticated admin.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// List route of a resource.
    #[must_use]
    pub const fn list_of(resource: Resource) -> Self {
        match resource {
            Resource::Products => Self::Products,
            Resource::Orders => Self::Orders,
            Resource::Customers => Self::Customers,
            Resource::Blogs => Self::Blogs,
            Resource::Discounts => Self::Discounts,
            Resource::ShippingMethods => Self::ShippingMethods,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode_id(segment: &str) -> Option<RecordId> {
    let id = urlencoding::decode(segment).ok()?;
    let usable = !id.trim().is_empty() && id != "." && id != "..";
    usable.then(|| RecordId::new(id.into_owned()))
}

/// Outcome of guarding one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authentication is still being resolved; show a loading indicator.
    Loading,
    /// Render the requested view.
    Render(Route),
    /// Go somewhere else instead.
    Redirect(Route),
    /// No such route.
    NotFound,
}

/// Gates protected routes on the authentication state.
///
/// Pure and synchronous: evaluate it on every render.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide what a protected `route` shows for `state`.
    #[must_use]
    pub fn check(route: &Route, state: &AuthState) -> GuardDecision {
        match state {
            AuthState::Resolving => GuardDecision::Loading,
            AuthState::Authenticated(_) => GuardDecision::Render(route.clone()),
            AuthState::Anonymous => GuardDecision::Redirect(Route::Login),
        }
    }

    /// Decide what navigating to `path` shows for `state`.
    #[must_use]
    pub fn resolve(path: &str, state: &AuthState) -> GuardDecision {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        if trimmed.trim_matches('/').is_empty() {
            return GuardDecision::Redirect(Route::Login);
        }

        match Route::parse(path) {
            None => GuardDecision::NotFound,
            Some(Route::Login) if state.is_authenticated() => {
                GuardDecision::Redirect(Route::Dashboard)
            }
            Some(Route::Login) => GuardDecision::Render(Route::Login),
            Some(route) => Self::check(&route, state),
        }
    }
}
