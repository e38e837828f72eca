use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use vantara_application::SubjectGrantRepository;
use vantara_core::{AppResult, OrgId};
use vantara_domain::ScopeId;

/// In-memory store of effective scope grants per subject.
#[derive(Debug, Default)]
pub struct InMemorySubjectGrants {
    grants: RwLock<HashMap<(OrgId, String), BTreeSet<ScopeId>>>,
}

impl InMemorySubjectGrants {
    /// Creates an empty grant store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }

    /// Adds scope grants for a subject.
    pub async fn grant(
        &self,
        org_id: OrgId,
        subject: &str,
        scope_ids: impl IntoIterator<Item = ScopeId>,
    ) {
        self.grants
            .write()
            .await
            .entry((org_id, subject.to_owned()))
            .or_default()
            .extend(scope_ids);
    }
}

#[async_trait]
impl SubjectGrantRepository for InMemorySubjectGrants {
    async fn list_granted_scope_ids(
        &self,
        org_id: OrgId,
        subject: &str,
    ) -> AppResult<BTreeSet<ScopeId>> {
        Ok(self
            .grants
            .read()
            .await
            .get(&(org_id, subject.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}
