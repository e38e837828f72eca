use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vantara_core::AppError;

/// Coarse permission label summarizing a category's scope selection.
///
/// `Mixed` is display-only: the resolver derives it when a selection matches
/// no canonical level, and the expander refuses it as a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No scope in the category is selected.
    None,
    /// View-only access to the category.
    Read,
    /// Read plus mutating access.
    Write,
    /// Read plus run/trigger access.
    Execute,
    /// Every scope in the category is selected.
    Admin,
    /// Selection matches no canonical level.
    Mixed,
}

impl PermissionLevel {
    /// Returns a stable storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
            Self::Admin => "admin",
            Self::Mixed => "mixed",
        }
    }

    /// Returns whether the level is a valid expansion target.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Mixed)
    }

    /// Returns the intermediate levels in ascending privilege order.
    ///
    /// Categories offer a subset of these between `None` and `Admin`.
    #[must_use]
    pub fn intermediate() -> &'static [Self] {
        const INTERMEDIATE: &[PermissionLevel] = &[
            PermissionLevel::Read,
            PermissionLevel::Write,
            PermissionLevel::Execute,
        ];

        INTERMEDIATE
    }
}

impl Display for PermissionLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "execute" => Ok(Self::Execute),
            "admin" => Ok(Self::Admin),
            "mixed" => Ok(Self::Mixed),
            _ => Err(AppError::Validation(format!(
                "unknown permission level '{value}'"
            ))),
        }
    }
}

/// Bulk-selection value derived for the reserved actions category.
///
/// `Custom` mirrors `PermissionLevel::Mixed`: derived for display, never a
/// valid target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NamespaceSelection {
    /// No action scope is selected.
    None,
    /// Every action scope is selected.
    All,
    /// Selection matches no single namespace exactly.
    Custom,
    /// Selection equals all scopes under one namespace.
    Namespace {
        /// The matched namespace segment.
        namespace: String,
    },
}

impl NamespaceSelection {
    /// Returns whether the value is a valid bulk-selection target.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Custom)
    }
}
