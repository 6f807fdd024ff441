//! In-memory collaborators for unit tests.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use serde_json::{Map, Value, json};

use forkful_core::{RestaurantId, UserId};

use crate::config::{ApiConfig, CloudinaryConfig};
use crate::db::{RepositoryError, RestaurantStore};
use crate::models::{NewRestaurant, Restaurant, UploadedImage};
use crate::services::{ImageStore, ImageStoreError, StoredImage};

/// Configuration for router tests; nothing here is dialled.
pub fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("postgres://localhost/forkful_test".to_string()),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        identity_header: "x-user-id".to_string(),
        max_upload_bytes: 64 * 1024,
        cloudinary: CloudinaryConfig {
            cloud_name: "test".to_string(),
            api_key: "000000".to_string(),
            api_secret: SecretString::from("k3Jd9_fQ2mZp8LwX1vT7nB4yR0s".to_string()),
            folder: None,
            timeout: Duration::from_secs(1),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Turn a `json!` object literal into a field map.
pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A tiny "PNG" (just the magic prefix).
pub fn png() -> UploadedImage {
    UploadedImage {
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

/// Restaurant store that keeps records in a `Vec`.
#[derive(Default)]
pub struct InMemoryRestaurantStore {
    records: Mutex<Vec<Restaurant>>,
    inserts: AtomicUsize,
    lookups: AtomicUsize,
    fail_inserts: bool,
    fail_lookups: bool,
}

impl InMemoryRestaurantStore {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    /// Insert a record directly, bypassing the counters.
    pub fn seed(&self, owner: &UserId) -> Restaurant {
        let restaurant = NewRestaurant::new(
            owner.clone(),
            "https://img/existing".to_string(),
            Utc::now(),
            fields(json!({ "name": "Existing" })),
        )
        .into_restaurant(RestaurantId::generate());
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(restaurant.clone());
        restaurant
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RestaurantStore for InMemoryRestaurantStore {
    async fn find_by_owner(&self, user: &UserId) -> Result<Option<Restaurant>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(RepositoryError::Unavailable("lookup refused".to_string()));
        }
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|r| &r.user == user)
            .cloned())
    }

    async fn insert(&self, restaurant: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(RepositoryError::Unavailable("insert refused".to_string()));
        }
        let restaurant = restaurant.into_restaurant(RestaurantId::generate());
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(restaurant.clone());
        Ok(restaurant)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.fail_lookups {
            return Err(RepositoryError::Unavailable("ping refused".to_string()));
        }
        Ok(())
    }
}

/// Image store that records every data URI it receives.
pub struct StubImageStore {
    url: Option<String>,
    uploads: Mutex<Vec<String>>,
}

impl StubImageStore {
    pub fn succeeding(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("uploads mutex poisoned").clone()
    }
}

#[async_trait]
impl ImageStore for StubImageStore {
    async fn upload(&self, data_uri: &str) -> Result<StoredImage, ImageStoreError> {
        self.uploads
            .lock()
            .expect("uploads mutex poisoned")
            .push(data_uri.to_string());
        match &self.url {
            Some(url) => Ok(StoredImage {
                url: url.clone(),
                public_id: Some("stub".to_string()),
            }),
            None => Err(ImageStoreError::Api {
                status: 503,
                message: "image host unavailable".to_string(),
            }),
        }
    }
}
