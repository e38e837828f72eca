use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vantara_application::{RoleRecord, RoleRepository};
use vantara_core::{AppError, AppResult, OrgId};
use vantara_domain::{RoleSubmission, ScopeId};

/// In-memory role repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<(OrgId, String), RoleRecord>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }

    /// Seeds a system-managed role that the service refuses to modify.
    pub async fn seed_system_role(
        &self,
        org_id: OrgId,
        name: &str,
        scope_ids: Vec<ScopeId>,
    ) -> RoleRecord {
        let record = RoleRecord {
            role_id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            description: None,
            is_system: true,
            scope_ids,
            updated_at: Utc::now().to_rfc3339(),
        };
        self.roles
            .write()
            .await
            .insert((org_id, record.role_id.clone()), record.clone());
        record
    }

    async fn name_taken(&self, org_id: OrgId, name: &str, except_role_id: Option<&str>) -> bool {
        self.roles
            .read()
            .await
            .iter()
            .any(|((stored_org_id, stored_role_id), record)| {
                stored_org_id == &org_id
                    && record.name == name
                    && except_role_id != Some(stored_role_id.as_str())
            })
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list_roles(&self, org_id: OrgId) -> AppResult<Vec<RoleRecord>> {
        let roles = self.roles.read().await;

        let mut records: Vec<RoleRecord> = roles
            .iter()
            .filter_map(|((stored_org_id, _), record)| {
                (stored_org_id == &org_id).then_some(record.clone())
            })
            .collect();
        records.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(records)
    }

    async fn find_role(&self, org_id: OrgId, role_id: &str) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&(org_id, role_id.to_owned()))
            .cloned())
    }

    async fn create_role(
        &self,
        org_id: OrgId,
        submission: RoleSubmission,
    ) -> AppResult<RoleRecord> {
        let name: String = submission.name.into();
        if self.name_taken(org_id, &name, None).await {
            return Err(AppError::Conflict(format!(
                "role '{name}' already exists in organization '{org_id}'"
            )));
        }

        let record = RoleRecord {
            role_id: Uuid::new_v4().to_string(),
            name,
            description: submission.description,
            is_system: false,
            scope_ids: submission.scope_ids,
            updated_at: Utc::now().to_rfc3339(),
        };
        self.roles
            .write()
            .await
            .insert((org_id, record.role_id.clone()), record.clone());

        Ok(record)
    }

    async fn update_role(
        &self,
        org_id: OrgId,
        role_id: &str,
        submission: RoleSubmission,
    ) -> AppResult<RoleRecord> {
        let name: String = submission.name.into();
        if self.name_taken(org_id, &name, Some(role_id)).await {
            return Err(AppError::Conflict(format!(
                "role '{name}' already exists in organization '{org_id}'"
            )));
        }

        let mut roles = self.roles.write().await;
        let record = roles
            .get_mut(&(org_id, role_id.to_owned()))
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        record.name = name;
        record.description = submission.description;
        record.scope_ids = submission.scope_ids;
        record.updated_at = Utc::now().to_rfc3339();

        Ok(record.clone())
    }
}
