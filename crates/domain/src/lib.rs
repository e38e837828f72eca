//! Scope-permission domain model and invariants.

#![forbid(unsafe_code)]

mod aggregation;
mod audit;
mod category;
mod level;
mod scope;
mod selection;

pub use aggregation::{
    category_scopes, expand_level, group_by_resource, namespace_scope_ids, namespace_selection,
    namespaces, resolve_level,
};
pub use audit::AuditAction;
pub use category::{ACTIONS_CATEGORY_KEY, ResourceCategory, ResourceCategoryInput};
pub use level::{NamespaceSelection, PermissionLevel};
pub use scope::{ActionTier, Scope, ScopeId};
pub use selection::{RoleDraft, RoleSubmission, ScopeSelection};
