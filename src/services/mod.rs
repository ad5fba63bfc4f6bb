//! Business logic services

pub mod auth;
pub mod catalog;
pub mod password;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, CatalogConfig},
    repository::{Store, StoreHealth},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    /// Registration, login and user management
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub health: Arc<dyn StoreHealth>,
}

impl Services {
    /// Create all services on top of one store backend
    pub fn new<S>(store: Arc<S>, auth_config: AuthConfig, catalog_config: CatalogConfig) -> Self
    where
        S: Store + 'static,
    {
        Self {
            auth: auth::AuthService::new(store.clone(), auth_config),
            catalog: catalog::CatalogService::new(store.clone(), store.clone(), catalog_config),
            health: store,
        }
    }
}
