//! Application services and ports.

#![forbid(unsafe_code)]

mod role_admin_service;

pub use role_admin_service::{
    AuditEvent, AuditRepository, RoleAdminService, RoleEditor, RoleRecord, RoleRepository,
    ScopeCatalogRepository, SubjectGrantRepository,
};
