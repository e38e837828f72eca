use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use vantara_core::{AppError, AppResult};

/// Opaque scope identifier issued by the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a scope identifier from a catalog value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ScopeId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Privilege tier a scope's action belongs to.
///
/// Tiers drive canonical level expansion: `read` expands to the `Read` tier,
/// `write` to `Read` plus `Write`, `execute` to `Read` plus `Execute`.
/// `Other` covers actions outside the level vocabulary, such as the
/// namespaced `<namespace>.<verb>` actions of the reserved actions category;
/// those are only ever selected individually or through `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    /// View-only actions.
    Read,
    /// Mutating actions.
    Write,
    /// Run/trigger actions.
    Execute,
    /// Actions outside the coarse level vocabulary.
    Other,
}

/// Atomic permission grant sourced from the external scope catalog.
///
/// Scopes are immutable catalog records. The editor only ever selects or
/// deselects them by id; it never creates or deletes a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    id: ScopeId,
    resource: String,
    action: String,
}

impl Scope {
    /// Creates a validated scope record.
    pub fn new(id: ScopeId, resource: impl Into<String>, action: impl Into<String>) -> AppResult<Self> {
        let resource = resource.into();
        let action = action.into();

        if resource.trim().is_empty() {
            return Err(AppError::Validation(
                "scope resource must not be empty".to_owned(),
            ));
        }

        if action.trim().is_empty() {
            return Err(AppError::Validation(
                "scope action must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            id,
            resource,
            action,
        })
    }

    /// Returns the scope identifier.
    #[must_use]
    pub fn id(&self) -> &ScopeId {
        &self.id
    }

    /// Returns the resource the scope grants access to.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the action label of the scope.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Classifies the action into its privilege tier.
    #[must_use]
    pub fn tier(&self) -> ActionTier {
        match self.action.as_str() {
            "read" | "view" | "list" => ActionTier::Read,
            "write" | "create" | "update" | "delete" => ActionTier::Write,
            "execute" | "run" => ActionTier::Execute,
            _ => ActionTier::Other,
        }
    }

    /// Returns the leading namespace segment of a namespaced action.
    ///
    /// `email.send` yields `email`; a plain action like `read` yields `None`.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        let (head, tail) = self.action.split_once('.')?;
        (!head.is_empty() && !tail.is_empty()).then_some(head)
    }
}
