//! In-memory adapter implementations of the application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_log;
mod in_memory_role_repository;
mod in_memory_scope_catalog;
mod in_memory_subject_grants;

pub use in_memory_audit_log::{AuditLogEntry, InMemoryAuditLog};
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use in_memory_scope_catalog::InMemoryScopeCatalog;
pub use in_memory_subject_grants::InMemorySubjectGrants;
