use serde::{Deserialize, Serialize};
use vantara_core::{AppError, AppResult};

use crate::level::PermissionLevel;

/// Reserved key of the namespace-driven actions category.
pub const ACTIONS_CATEGORY_KEY: &str = "actions";

/// UI-level grouping of one or more catalog resources shown as one row.
///
/// Categories are static application configuration, not user data. The
/// intermediate levels a category offers are the only canonical levels the
/// resolver compares against between `None` and `Admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCategory {
    key: String,
    label: String,
    description: Option<String>,
    resources: Vec<String>,
    intermediate_levels: Vec<PermissionLevel>,
}

/// Input payload used to construct a validated resource category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCategoryInput {
    /// Stable category key.
    pub key: String,
    /// User-facing category label.
    pub label: String,
    /// Optional category description.
    pub description: Option<String>,
    /// Catalog resources grouped under the category.
    pub resources: Vec<String>,
    /// Intermediate levels the category offers between none and admin.
    pub intermediate_levels: Vec<PermissionLevel>,
}

impl ResourceCategory {
    /// Creates a validated resource category.
    pub fn new(input: ResourceCategoryInput) -> AppResult<Self> {
        let ResourceCategoryInput {
            key,
            label,
            description,
            resources,
            intermediate_levels,
        } = input;

        if key.trim().is_empty() {
            return Err(AppError::Validation(
                "category key must not be empty".to_owned(),
            ));
        }

        if label.trim().is_empty() {
            return Err(AppError::Validation(
                "category label must not be empty".to_owned(),
            ));
        }

        if resources.is_empty() {
            return Err(AppError::Contract(format!(
                "category '{key}' must group at least one resource"
            )));
        }

        if resources.iter().any(|resource| resource.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "category '{key}' resources must not contain empty entries"
            )));
        }

        for level in &intermediate_levels {
            if !PermissionLevel::intermediate().contains(level) {
                return Err(AppError::Contract(format!(
                    "category '{key}' offers '{level}' which is not an intermediate level"
                )));
            }
        }

        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            key,
            label,
            description,
            resources,
            intermediate_levels,
        })
    }

    /// Returns the stable category key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the user-facing category label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the optional category description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the catalog resources grouped under the category.
    #[must_use]
    pub fn resources(&self) -> &[String] {
        self.resources.as_slice()
    }

    /// Returns whether the category groups the given resource.
    #[must_use]
    pub fn contains_resource(&self, resource: &str) -> bool {
        self.resources.iter().any(|value| value == resource)
    }

    /// Returns whether the category offers a level as an intermediate target.
    ///
    /// `None` and `Admin` are always offered; `Mixed` never is.
    #[must_use]
    pub fn offers(&self, level: PermissionLevel) -> bool {
        match level {
            PermissionLevel::None | PermissionLevel::Admin => true,
            PermissionLevel::Mixed => false,
            PermissionLevel::Read | PermissionLevel::Write | PermissionLevel::Execute => {
                self.intermediate_levels.contains(&level)
            }
        }
    }

    /// Returns whether this is the reserved namespace-driven actions category.
    #[must_use]
    pub fn is_actions(&self) -> bool {
        self.key == ACTIONS_CATEGORY_KEY
    }

    /// Returns the bundled category configuration table.
    ///
    /// Organization offers read as its only intermediate level: partial
    /// write access to org membership and settings is not a state the
    /// product exposes. The actions category offers no intermediate levels
    /// at all; it is driven by namespace bulk-selection instead.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self {
                key: "workflows".to_owned(),
                label: "Workflows".to_owned(),
                description: Some("Automation playbooks and their runs".to_owned()),
                resources: vec!["workflows".to_owned()],
                intermediate_levels: vec![
                    PermissionLevel::Read,
                    PermissionLevel::Write,
                    PermissionLevel::Execute,
                ],
            },
            Self {
                key: "agents".to_owned(),
                label: "Agents".to_owned(),
                description: Some("Chat agents and their sessions".to_owned()),
                resources: vec!["agents".to_owned()],
                intermediate_levels: vec![
                    PermissionLevel::Read,
                    PermissionLevel::Write,
                    PermissionLevel::Execute,
                ],
            },
            Self {
                key: "cases".to_owned(),
                label: "Cases".to_owned(),
                description: Some("Security cases and their comments".to_owned()),
                resources: vec!["cases".to_owned(), "cases.comments".to_owned()],
                intermediate_levels: vec![PermissionLevel::Read, PermissionLevel::Write],
            },
            Self {
                key: "tables".to_owned(),
                label: "Tables".to_owned(),
                description: Some("Custom data tables and rows".to_owned()),
                resources: vec!["tables".to_owned()],
                intermediate_levels: vec![PermissionLevel::Read, PermissionLevel::Write],
            },
            Self {
                key: "organization".to_owned(),
                label: "Organization".to_owned(),
                description: Some("Organization profile, members and settings".to_owned()),
                resources: vec![
                    "organization".to_owned(),
                    "organization.members".to_owned(),
                    "organization.settings".to_owned(),
                ],
                intermediate_levels: vec![PermissionLevel::Read],
            },
            Self {
                key: ACTIONS_CATEGORY_KEY.to_owned(),
                label: "Actions".to_owned(),
                description: Some("Integration actions, grouped by namespace".to_owned()),
                resources: vec!["actions".to_owned()],
                intermediate_levels: Vec::new(),
            },
        ]
    }
}
