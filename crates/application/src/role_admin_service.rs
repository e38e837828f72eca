use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use vantara_core::{AppError, AppResult, OrgId, UserIdentity};
use vantara_domain::{
    AuditAction, PermissionLevel, ResourceCategory, RoleDraft, RoleSubmission, Scope, ScopeId,
    ScopeSelection, resolve_level,
};

const ORGANIZATION_CATEGORY_KEY: &str = "organization";

/// Role projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Stable role identifier.
    pub role_id: String,
    /// Unique role name in organization scope.
    pub name: String,
    /// Optional role description.
    pub description: Option<String>,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Granted scope ids.
    pub scope_ids: Vec<ScopeId>,
    /// Last modification timestamp in RFC3339.
    pub updated_at: String,
}

/// Catalog-seeded state handed to one role-editor form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEditor {
    /// Scope catalog fetched once when the editor opens.
    pub catalog: Vec<Scope>,
    /// Static category configuration shown as editor rows.
    pub categories: Vec<ResourceCategory>,
    /// Identifier of the edited role, absent for a new role.
    pub role_id: Option<String>,
    /// Form state seeded from the role's current grants.
    pub draft: RoleDraft,
}

/// Audit event appended after successful administrative writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Organization partition of the event.
    pub org_id: OrgId,
    /// Actor subject.
    pub subject: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Event resource type.
    pub resource_type: String,
    /// Event resource identifier.
    pub resource_id: String,
    /// Optional event detail.
    pub detail: Option<String>,
}

/// Repository port for the external scope catalog.
#[async_trait]
pub trait ScopeCatalogRepository: Send + Sync {
    /// Lists every scope available in the organization.
    async fn list_scopes(&self, org_id: OrgId) -> AppResult<Vec<Scope>>;
}

/// Repository port resolving the scopes currently granted to a subject.
#[async_trait]
pub trait SubjectGrantRepository: Send + Sync {
    /// Lists effective granted scope ids for a subject.
    async fn list_granted_scope_ids(
        &self,
        org_id: OrgId,
        subject: &str,
    ) -> AppResult<BTreeSet<ScopeId>>;
}

/// Repository port for role storage.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all organization roles.
    async fn list_roles(&self, org_id: OrgId) -> AppResult<Vec<RoleRecord>>;

    /// Finds one role by identifier.
    async fn find_role(&self, org_id: OrgId, role_id: &str) -> AppResult<Option<RoleRecord>>;

    /// Creates a role from a validated submission.
    async fn create_role(&self, org_id: OrgId, submission: RoleSubmission)
    -> AppResult<RoleRecord>;

    /// Updates an existing role from a validated submission.
    async fn update_role(
        &self,
        org_id: OrgId,
        role_id: &str,
        submission: RoleSubmission,
    ) -> AppResult<RoleRecord>;
}

/// Repository port for appending audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Application service for role administration.
///
/// Every method requires the actor to hold admin over the organization
/// category; the check reuses the same level resolution the editor
/// displays.
#[derive(Clone)]
pub struct RoleAdminService {
    catalog_repository: Arc<dyn ScopeCatalogRepository>,
    grant_repository: Arc<dyn SubjectGrantRepository>,
    role_repository: Arc<dyn RoleRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    categories: Vec<ResourceCategory>,
}

impl RoleAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        catalog_repository: Arc<dyn ScopeCatalogRepository>,
        grant_repository: Arc<dyn SubjectGrantRepository>,
        role_repository: Arc<dyn RoleRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            catalog_repository,
            grant_repository,
            role_repository,
            audit_repository,
            categories: ResourceCategory::builtin(),
        }
    }

    /// Returns the organization's scope catalog for administrative users.
    pub async fn list_scopes(&self, actor: &UserIdentity) -> AppResult<Vec<Scope>> {
        self.require_role_admin(actor).await?;
        self.catalog_repository.list_scopes(actor.org_id()).await
    }

    /// Returns organization roles for administrative users.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<RoleRecord>> {
        self.require_role_admin(actor).await?;
        self.role_repository.list_roles(actor.org_id()).await
    }

    /// Opens a role editor, seeded from an existing role when given an id.
    pub async fn open_editor(
        &self,
        actor: &UserIdentity,
        role_id: Option<&str>,
    ) -> AppResult<RoleEditor> {
        self.require_role_admin(actor).await?;
        let catalog = self.catalog_repository.list_scopes(actor.org_id()).await?;

        let Some(role_id) = role_id else {
            return Ok(RoleEditor {
                catalog,
                categories: self.categories.clone(),
                role_id: None,
                draft: RoleDraft::default(),
            });
        };

        let record = self
            .role_repository
            .find_role(actor.org_id(), role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        Ok(RoleEditor {
            catalog,
            categories: self.categories.clone(),
            role_id: Some(record.role_id.clone()),
            draft: RoleDraft {
                name: record.name,
                description: record.description,
                selection: ScopeSelection::seeded(record.scope_ids),
            },
        })
    }

    /// Creates a role from editor state and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        draft: RoleDraft,
    ) -> AppResult<RoleRecord> {
        self.require_role_admin(actor).await?;

        let submission = draft.into_submission()?;
        self.ensure_known_scopes(actor.org_id(), &submission).await?;

        let record = self
            .role_repository
            .create_role(actor.org_id(), submission)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                org_id: actor.org_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::RoleCreated,
                resource_type: "rbac_role".to_owned(),
                resource_id: record.role_id.clone(),
                detail: Some(format!(
                    "created role '{}' with {} scopes",
                    record.name,
                    record.scope_ids.len()
                )),
            })
            .await?;

        Ok(record)
    }

    /// Updates a role from editor state and emits an audit event.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: &str,
        draft: RoleDraft,
    ) -> AppResult<RoleRecord> {
        self.require_role_admin(actor).await?;

        let existing = self
            .role_repository
            .find_role(actor.org_id(), role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        if existing.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be modified",
                existing.name
            )));
        }

        let submission = draft.into_submission()?;
        self.ensure_known_scopes(actor.org_id(), &submission).await?;

        let record = self
            .role_repository
            .update_role(actor.org_id(), role_id, submission)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                org_id: actor.org_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::RoleUpdated,
                resource_type: "rbac_role".to_owned(),
                resource_id: record.role_id.clone(),
                detail: Some(format!(
                    "updated role '{}' to {} scopes",
                    record.name,
                    record.scope_ids.len()
                )),
            })
            .await?;

        Ok(record)
    }

    async fn require_role_admin(&self, actor: &UserIdentity) -> AppResult<()> {
        let organization = self
            .categories
            .iter()
            .find(|category| category.key() == ORGANIZATION_CATEGORY_KEY)
            .ok_or_else(|| {
                AppError::Internal(
                    "organization category missing from configuration".to_owned(),
                )
            })?;

        let catalog = self.catalog_repository.list_scopes(actor.org_id()).await?;
        let granted = self
            .grant_repository
            .list_granted_scope_ids(actor.org_id(), actor.subject())
            .await?;

        if resolve_level(organization, &catalog, &granted) == PermissionLevel::Admin {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' requires organization admin to manage roles",
            actor.subject()
        )))
    }

    async fn ensure_known_scopes(
        &self,
        org_id: OrgId,
        submission: &RoleSubmission,
    ) -> AppResult<()> {
        let catalog = self.catalog_repository.list_scopes(org_id).await?;
        let known: BTreeSet<&ScopeId> = catalog.iter().map(Scope::id).collect();

        if let Some(unknown) = submission
            .scope_ids
            .iter()
            .find(|scope_id| !known.contains(*scope_id))
        {
            return Err(AppError::Validation(format!(
                "unknown scope id '{unknown}' in submission"
            )));
        }

        Ok(())
    }
}
