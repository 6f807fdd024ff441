//! Restaurant domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use forkful_core::{RestaurantId, UserId};

/// Field names assigned by the server; caller-supplied values are discarded.
pub const RESERVED_FIELDS: [&str; 4] = ["_id", "user", "imageUrl", "lastUpdated"];

/// A persisted restaurant profile.
///
/// Everything the owner submitted apart from the image is kept as an opaque
/// JSON object and flattened into the serialized record next to the
/// server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Store-generated identifier.
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    /// Owning user.
    pub user: UserId,
    /// Reference URL returned by the image host.
    pub image_url: String,
    /// When the record was last written.
    pub last_updated: DateTime<Utc>,
    /// Caller-supplied fields (name, address, cuisines, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A restaurant that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub user: UserId,
    pub image_url: String,
    pub last_updated: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl NewRestaurant {
    /// Merge submitted fields with the server-assigned ones.
    ///
    /// Any submitted key in [`RESERVED_FIELDS`] is dropped.
    #[must_use]
    pub fn new(
        user: UserId,
        image_url: String,
        last_updated: DateTime<Utc>,
        mut fields: Map<String, Value>,
    ) -> Self {
        for key in RESERVED_FIELDS {
            fields.remove(key);
        }
        Self {
            user,
            image_url,
            last_updated,
            fields,
        }
    }

    /// Attach the identifier assigned by the store.
    #[must_use]
    pub fn into_restaurant(self, id: RestaurantId) -> Restaurant {
        Restaurant {
            id,
            user: self.user,
            image_url: self.image_url,
            last_updated: self.last_updated,
            fields: self.fields,
        }
    }
}

/// An image file received with a request.
///
/// Lives only for the duration of the request.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// MIME type declared by the client, unverified.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
