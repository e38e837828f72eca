use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vantara_application::ScopeCatalogRepository;
use vantara_core::{AppResult, OrgId};
use vantara_domain::Scope;

/// In-memory scope catalog implementation.
///
/// Catalogs are seeded once per organization and served back in seeding
/// order, matching the external catalog's stable listing.
#[derive(Debug, Default)]
pub struct InMemoryScopeCatalog {
    scopes: RwLock<HashMap<OrgId, Vec<Scope>>>,
}

impl InMemoryScopeCatalog {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Seeds or replaces an organization's catalog.
    pub async fn seed_org(&self, org_id: OrgId, scopes: Vec<Scope>) {
        self.scopes.write().await.insert(org_id, scopes);
    }
}

#[async_trait]
impl ScopeCatalogRepository for InMemoryScopeCatalog {
    async fn list_scopes(&self, org_id: OrgId) -> AppResult<Vec<Scope>> {
        Ok(self
            .scopes
            .read()
            .await
            .get(&org_id)
            .cloned()
            .unwrap_or_default())
    }
}
