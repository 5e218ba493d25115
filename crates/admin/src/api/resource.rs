//! CRUD resources exposed by the backend.
//!
//! Every collection follows one endpoint convention:
//!
//! | operation | request |
//! |-----------|---------|
//! | `get_all` | `GET /{resource}` |
//! | `get_by_id` | `GET /{resource}/{id}` |
//! | `create` | `POST /{resource}` |
//! | `update` | `PUT /{resource}/{id}` |
//! | `update_status` | `PATCH /{resource}/{id}/status` |
//! | `delete` | `DELETE /{resource}/{id}` |

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use storekeep_core::RecordId;

use crate::http::{ApiClient, ApiError};

use super::Record;

/// A backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Products,
    Orders,
    Customers,
    Blogs,
    Discounts,
    ShippingMethods,
}

impl Resource {
    pub const ALL: [Self; 6] = [
        Self::Products,
        Self::Orders,
        Self::Customers,
        Self::Blogs,
        Self::Discounts,
        Self::ShippingMethods,
    ];

    /// Collection path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Customers => "customers",
            Self::Blogs => "blogs",
            Self::Discounts => "discounts",
            Self::ShippingMethods => "shipping-methods",
        }
    }

    /// Human-readable singular name, used in notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Products => "Product",
            Self::Orders => "Order",
            Self::Customers => "Customer",
            Self::Blogs => "Blog post",
            Self::Discounts => "Discount",
            Self::ShippingMethods => "Shipping method",
        }
    }

    /// How this resource's status endpoint expects its payload.
    #[must_use]
    pub const fn status_field(self) -> StatusField {
        match self {
            Self::Orders => StatusField::Lifecycle {
                on: "completed",
                off: "pending",
            },
            Self::Products => StatusField::Lifecycle {
                on: "active",
                off: "inactive",
            },
            Self::Blogs => StatusField::Lifecycle {
                on: "published",
                off: "draft",
            },
            Self::Customers | Self::Discounts | Self::ShippingMethods => StatusField::Active,
        }
    }

    /// Form fields that must be filled in before a create or update.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Products => &["name", "price"],
            Self::Blogs => &["title", "content", "image", "author"],
            Self::Discounts => &["code", "value", "startDate", "endDate"],
            Self::ShippingMethods => &["name", "price", "estimatedDays"],
            Self::Orders | Self::Customers => &[],
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "products" | "product" => Ok(Self::Products),
            "orders" | "order" => Ok(Self::Orders),
            "customers" | "customer" => Ok(Self::Customers),
            "blogs" | "blog" => Ok(Self::Blogs),
            "discounts" | "discount" => Ok(Self::Discounts),
            "shipping-methods" | "shipping_methods" | "shipping" => Ok(Self::ShippingMethods),
            other => Err(format!("unknown resource: {other}")),
        }
    }
}

/// Shape of a resource's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    /// A `status` string toggled between two values.
    Lifecycle {
        on: &'static str,
        off: &'static str,
    },
    /// An `isActive` boolean.
    Active,
}

impl StatusField {
    /// The update that flips `record`'s current status.
    ///
    /// A record in any state other than `on` (including a missing status)
    /// moves to `on`.
    #[must_use]
    pub fn toggled(self, record: &Record) -> StatusUpdate {
        match self {
            Self::Lifecycle { on, off } => {
                let next = if record.get_str("status") == Some(on) {
                    off
                } else {
                    on
                };
                StatusUpdate::status(next)
            }
            Self::Active => StatusUpdate::Active {
                is_active: !record.get_bool("isActive").unwrap_or(false),
            },
        }
    }
}

/// Body of a `PATCH /{resource}/{id}/status` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusUpdate {
    /// `{"status": "<value>"}`
    Status { status: String },
    /// `{"isActive": <bool>}`
    Active {
        #[serde(rename = "isActive")]
        is_active: bool,
    },
}

impl StatusUpdate {
    #[must_use]
    pub fn status(value: impl Into<String>) -> Self {
        Self::Status {
            status: value.into(),
        }
    }

    #[must_use]
    pub const fn active(is_active: bool) -> Self {
        Self::Active { is_active }
    }

    /// Past-tense description for a success notification.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Status { status } => status.clone(),
            Self::Active { is_active: true } => "activated".to_string(),
            Self::Active { is_active: false } => "deactivated".to_string(),
        }
    }
}

/// Operations on one backend collection.
#[derive(Debug, Clone)]
pub struct ResourceApi {
    client: ApiClient,
    resource: Resource,
}

impl ResourceApi {
    #[must_use]
    pub const fn new(client: ApiClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    /// `{resource}/{id}` with the id as exactly one path segment.
    ///
    /// Percent-encoding leaves `.` and `..` alone and URL resolution would
    /// collapse them, so those ids are refused along with blank ones.
    fn item_path(&self, id: &RecordId) -> Result<String, ApiError> {
        let raw = id.as_str();
        if raw.trim().is_empty() || raw == "." || raw == ".." {
            return Err(ApiError::InvalidPath(format!(
                "{}: invalid record id {raw:?}",
                self.resource.path()
            )));
        }
        Ok(format!(
            "{}/{}",
            self.resource.path(),
            urlencoding::encode(raw)
        ))
    }

    /// `GET /{resource}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn get_all(&self) -> Result<Vec<Record>, ApiError> {
        self.client.get(self.resource.path()).await
    }

    /// `GET /{resource}/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] for an id that is not a single path
    /// segment; otherwise propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn get_by_id(&self, id: &RecordId) -> Result<Record, ApiError> {
        self.client.get(&self.item_path(id)?).await
    }

    /// `POST /{resource}`
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self, data), fields(resource = %self.resource))]
    pub async fn create(&self, data: &Record) -> Result<Value, ApiError> {
        self.client.post(self.resource.path(), data).await
    }

    /// `PUT /{resource}/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] for an id that is not a single path
    /// segment; otherwise propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self, data), fields(resource = %self.resource))]
    pub async fn update(&self, id: &RecordId, data: &Record) -> Result<Value, ApiError> {
        self.client.put(&self.item_path(id)?, data).await
    }

    /// `PATCH /{resource}/{id}/status`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] for an id that is not a single path
    /// segment; otherwise propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn update_status(
        &self,
        id: &RecordId,
        update: &StatusUpdate,
    ) -> Result<Value, ApiError> {
        let path = format!("{}/status", self.item_path(id)?);
        self.client.patch(&path, update).await
    }

    /// `DELETE /{resource}/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] for an id that is not a single path
    /// segment; otherwise propagates [`ApiError`] from the client unchanged.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn delete(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.delete(&self.item_path(id)?).await
    }
}
