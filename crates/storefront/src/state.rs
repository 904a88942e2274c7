//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::middleware::RouteTable;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the backend API client, and the route-capability table.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    route_table: RouteTable,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ApiClient::new(&config.api);
        let route_table = RouteTable::storefront();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                route_table,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the route-capability table.
    #[must_use]
    pub fn route_table(&self) -> &RouteTable {
        &self.inner.route_table
    }
}
