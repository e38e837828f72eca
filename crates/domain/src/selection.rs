use std::collections::BTreeSet;

use vantara_core::{AppError, AppResult, NonEmptyString};

use crate::aggregation::{
    category_scopes, expand_level, namespace_scope_ids, namespace_selection, resolve_level,
};
use crate::category::ResourceCategory;
use crate::level::{NamespaceSelection, PermissionLevel};
use crate::scope::{Scope, ScopeId};

/// Selected-scope set owned by one role-editor form instance.
///
/// Seeded from an existing role's grants (or empty for a new role),
/// mutated only through explicit user actions, and discarded when the
/// editor closes without a submit. Setting a level replaces the category's
/// subset with the canonical expansion, so it always lands exactly on the
/// requested level, never on mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSelection {
    ids: BTreeSet<ScopeId>,
}

impl ScopeSelection {
    /// Creates an empty selection for a new role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection seeded from an existing role's granted scopes.
    #[must_use]
    pub fn seeded(ids: impl IntoIterator<Item = ScopeId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Returns whether a scope is currently selected.
    #[must_use]
    pub fn contains(&self, id: &ScopeId) -> bool {
        self.ids.contains(id)
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of selected scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Toggles one scope and returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ScopeId) -> bool {
        if self.ids.remove(&id) {
            return false;
        }

        self.ids.insert(id);
        true
    }

    /// Derives the displayed level for a category from this selection.
    #[must_use]
    pub fn level_for(&self, category: &ResourceCategory, catalog: &[Scope]) -> PermissionLevel {
        resolve_level(category, catalog, &self.ids)
    }

    /// Derives the displayed namespace value for the actions category.
    #[must_use]
    pub fn namespace_for(
        &self,
        category: &ResourceCategory,
        catalog: &[Scope],
    ) -> NamespaceSelection {
        namespace_selection(category, catalog, &self.ids)
    }

    /// Replaces a category's subset with the canonical set for a level.
    pub fn set_level(
        &mut self,
        category: &ResourceCategory,
        catalog: &[Scope],
        level: PermissionLevel,
    ) -> AppResult<()> {
        let target = expand_level(category, catalog, level)?;
        self.replace_category(category, catalog, target);
        Ok(())
    }

    /// Replaces the actions category's subset with a namespace bulk-selection.
    pub fn set_namespace(
        &mut self,
        category: &ResourceCategory,
        catalog: &[Scope],
        selection: &NamespaceSelection,
    ) -> AppResult<()> {
        let target = match selection {
            NamespaceSelection::Custom => {
                return Err(AppError::Contract(
                    "custom has no canonical namespace expansion".to_owned(),
                ));
            }
            NamespaceSelection::None => BTreeSet::new(),
            NamespaceSelection::All => expand_level(category, catalog, PermissionLevel::Admin)?,
            NamespaceSelection::Namespace { namespace } => {
                namespace_scope_ids(category, catalog, namespace)?
            }
        };

        self.replace_category(category, catalog, target);
        Ok(())
    }

    fn replace_category(
        &mut self,
        category: &ResourceCategory,
        catalog: &[Scope],
        target: BTreeSet<ScopeId>,
    ) {
        for scope in category_scopes(category, catalog) {
            self.ids.remove(scope.id());
        }

        self.ids.extend(target);
    }

    /// Returns the selected scope ids.
    #[must_use]
    pub fn ids(&self) -> &BTreeSet<ScopeId> {
        &self.ids
    }

    /// Consumes the selection into an ordered id list for submission.
    #[must_use]
    pub fn into_ids(self) -> Vec<ScopeId> {
        self.ids.into_iter().collect()
    }
}

/// Role-editor form state before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDraft {
    /// Role name as typed.
    pub name: String,
    /// Role description as typed.
    pub description: Option<String>,
    /// Current scope selection.
    pub selection: ScopeSelection,
}

/// Validated create/update payload for the backing role store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSubmission {
    /// Validated role name.
    pub name: NonEmptyString,
    /// Optional trimmed role description.
    pub description: Option<String>,
    /// Selected scope ids in stable order.
    pub scope_ids: Vec<ScopeId>,
}

impl RoleDraft {
    /// Validates the draft into a submission payload.
    pub fn into_submission(self) -> AppResult<RoleSubmission> {
        let description = self.description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(RoleSubmission {
            name: NonEmptyString::new(self.name)?,
            description,
            scope_ids: self.selection.into_ids(),
        })
    }
}
