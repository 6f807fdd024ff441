//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::RestaurantStore;
use crate::services::ImageStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Collaborators are held as
/// trait objects so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    restaurants: Arc<dyn RestaurantStore>,
    images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        restaurants: Arc<dyn RestaurantStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                restaurants,
                images,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the restaurant record store.
    #[must_use]
    pub fn restaurants(&self) -> &dyn RestaurantStore {
        self.inner.restaurants.as_ref()
    }

    /// Get the image store.
    #[must_use]
    pub fn images(&self) -> &dyn ImageStore {
        self.inner.images.as_ref()
    }
}
