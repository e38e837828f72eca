//! Pure derivations between scope selections and coarse permission levels.
//!
//! Everything here is a deterministic function of the category
//! configuration, the catalog and the selected-id set. The resolver is
//! total; only the expanders can fail, and only on caller contract
//! violations (`AppError::Contract`).

use std::collections::{BTreeMap, BTreeSet};

use vantara_core::{AppError, AppResult};

use crate::category::ResourceCategory;
use crate::level::{NamespaceSelection, PermissionLevel};
use crate::scope::{ActionTier, Scope, ScopeId};

/// Returns the catalog scopes grouped under a category, in catalog order.
#[must_use]
pub fn category_scopes(category: &ResourceCategory, catalog: &[Scope]) -> Vec<Scope> {
    catalog
        .iter()
        .filter(|scope| category.contains_resource(scope.resource()))
        .cloned()
        .collect()
}

fn all_ids(scopes: &[Scope]) -> BTreeSet<ScopeId> {
    scopes.iter().map(|scope| scope.id().clone()).collect()
}

fn selection_in(scopes: &[Scope], selected: &BTreeSet<ScopeId>) -> BTreeSet<ScopeId> {
    scopes
        .iter()
        .filter(|scope| selected.contains(scope.id()))
        .map(|scope| scope.id().clone())
        .collect()
}

fn tier_ids(scopes: &[Scope], tiers: &[ActionTier]) -> BTreeSet<ScopeId> {
    scopes
        .iter()
        .filter(|scope| tiers.contains(&scope.tier()))
        .map(|scope| scope.id().clone())
        .collect()
}

/// Canonical id set for an intermediate level, or `None` for other levels.
///
/// Write implies read. Execute implies read but not write.
fn canonical_intermediate_ids(
    scopes: &[Scope],
    level: PermissionLevel,
) -> Option<BTreeSet<ScopeId>> {
    let tiers: &[ActionTier] = match level {
        PermissionLevel::Read => &[ActionTier::Read],
        PermissionLevel::Write => &[ActionTier::Read, ActionTier::Write],
        PermissionLevel::Execute => &[ActionTier::Read, ActionTier::Execute],
        _ => return None,
    };

    Some(tier_ids(scopes, tiers))
}

/// Derives the coarse permission level displayed for a category.
///
/// Total over its inputs: a category with no catalog scopes, or with no
/// selected scope, resolves to `None`; a full selection resolves to
/// `Admin`; otherwise the selection is compared against the canonical set
/// of each intermediate level the category offers, in ascending privilege
/// order, and falls back to `Mixed` when nothing matches exactly.
#[must_use]
pub fn resolve_level(
    category: &ResourceCategory,
    catalog: &[Scope],
    selected: &BTreeSet<ScopeId>,
) -> PermissionLevel {
    let scopes = category_scopes(category, catalog);
    if scopes.is_empty() {
        return PermissionLevel::None;
    }

    let selection = selection_in(&scopes, selected);
    if selection.is_empty() {
        return PermissionLevel::None;
    }

    if selection == all_ids(&scopes) {
        return PermissionLevel::Admin;
    }

    for level in PermissionLevel::intermediate().iter().copied() {
        if !category.offers(level) {
            continue;
        }

        if canonical_intermediate_ids(&scopes, level).is_some_and(|expected| expected == selection)
        {
            return level;
        }
    }

    PermissionLevel::Mixed
}

/// Expands a target level into its canonical scope-id set for a category.
///
/// Fails with `AppError::Contract` when asked to expand `mixed` (which has
/// no canonical set) or an intermediate level the category does not offer.
pub fn expand_level(
    category: &ResourceCategory,
    catalog: &[Scope],
    level: PermissionLevel,
) -> AppResult<BTreeSet<ScopeId>> {
    match level {
        PermissionLevel::Mixed => Err(AppError::Contract(
            "mixed has no canonical scope expansion".to_owned(),
        )),
        PermissionLevel::None => Ok(BTreeSet::new()),
        PermissionLevel::Admin => Ok(all_ids(&category_scopes(category, catalog))),
        PermissionLevel::Read | PermissionLevel::Write | PermissionLevel::Execute => {
            if !category.offers(level) {
                return Err(AppError::Contract(format!(
                    "category '{}' does not offer level '{level}'",
                    category.key()
                )));
            }

            let scopes = category_scopes(category, catalog);
            Ok(canonical_intermediate_ids(&scopes, level).unwrap_or_default())
        }
    }
}

/// Groups category scopes by resource for presentation.
///
/// Resource groups order lexicographically; scopes within a group sort by
/// action label. Output order depends only on the input values.
#[must_use]
pub fn group_by_resource(category_scopes: &[Scope]) -> BTreeMap<String, Vec<Scope>> {
    let mut groups: BTreeMap<String, Vec<Scope>> = BTreeMap::new();
    for scope in category_scopes {
        groups
            .entry(scope.resource().to_owned())
            .or_default()
            .push(scope.clone());
    }

    for scopes in groups.values_mut() {
        scopes.sort_by(|left, right| left.action().cmp(right.action()));
    }

    groups
}

/// Returns the namespaces present in a category's scopes, sorted.
#[must_use]
pub fn namespaces(category_scopes: &[Scope]) -> BTreeSet<String> {
    category_scopes
        .iter()
        .filter_map(|scope| scope.namespace().map(str::to_owned))
        .collect()
}

/// Returns the scope ids under one namespace of a category.
///
/// A namespace unknown to the category is a caller contract violation: the
/// bulk-selection menu is built from [`namespaces`].
pub fn namespace_scope_ids(
    category: &ResourceCategory,
    catalog: &[Scope],
    namespace: &str,
) -> AppResult<BTreeSet<ScopeId>> {
    let scopes = category_scopes(category, catalog);
    let ids: BTreeSet<ScopeId> = scopes
        .iter()
        .filter(|scope| scope.namespace() == Some(namespace))
        .map(|scope| scope.id().clone())
        .collect();

    if ids.is_empty() {
        return Err(AppError::Contract(format!(
            "namespace '{namespace}' has no scopes in category '{}'",
            category.key()
        )));
    }

    Ok(ids)
}

/// Derives the bulk-selection value for the reserved actions category.
///
/// Applies the same exact-set-match discipline as [`resolve_level`]:
/// `None` iff nothing is selected, `All` iff everything is, a namespace
/// iff the selection equals all scopes under exactly that namespace, and
/// `Custom` otherwise.
#[must_use]
pub fn namespace_selection(
    category: &ResourceCategory,
    catalog: &[Scope],
    selected: &BTreeSet<ScopeId>,
) -> NamespaceSelection {
    let scopes = category_scopes(category, catalog);
    let selection = selection_in(&scopes, selected);
    if selection.is_empty() {
        return NamespaceSelection::None;
    }

    if selection == all_ids(&scopes) {
        return NamespaceSelection::All;
    }

    for namespace in namespaces(&scopes) {
        let ids: BTreeSet<ScopeId> = scopes
            .iter()
            .filter(|scope| scope.namespace() == Some(namespace.as_str()))
            .map(|scope| scope.id().clone())
            .collect();

        if ids == selection {
            return NamespaceSelection::Namespace { namespace };
        }
    }

    NamespaceSelection::Custom
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use vantara_core::AppError;

    use crate::category::ResourceCategory;
    use crate::level::{NamespaceSelection, PermissionLevel};
    use crate::scope::{Scope, ScopeId};

    use super::{
        category_scopes, expand_level, group_by_resource, namespace_scope_ids,
        namespace_selection, namespaces, resolve_level,
    };

    fn scope(id: &str, resource: &str, action: &str) -> Scope {
        match Scope::new(ScopeId::new(id), resource, action) {
            Ok(scope) => scope,
            Err(error) => panic!("test scope must be valid: {error}"),
        }
    }

    fn catalog() -> Vec<Scope> {
        vec![
            scope("wf-read", "workflows", "read"),
            scope("wf-write", "workflows", "write"),
            scope("wf-execute", "workflows", "execute"),
            scope("wf-admin", "workflows", "admin"),
            scope("org-read", "organization", "read"),
            scope("org-write", "organization", "write"),
            scope("members-read", "organization.members", "read"),
            scope("members-write", "organization.members", "write"),
            scope("settings-read", "organization.settings", "read"),
            scope("settings-admin", "organization.settings", "admin"),
            scope("act-email-send", "actions", "email.send"),
            scope("act-email-read", "actions", "email.read"),
            scope("act-slack-send", "actions", "slack.send"),
        ]
    }

    fn builtin(key: &str) -> ResourceCategory {
        match ResourceCategory::builtin()
            .into_iter()
            .find(|category| category.key() == key)
        {
            Some(category) => category,
            None => panic!("builtin category '{key}' must exist"),
        }
    }

    fn ids(values: &[&str]) -> BTreeSet<ScopeId> {
        values.iter().map(|value| ScopeId::new(*value)).collect()
    }

    #[test]
    fn empty_selection_resolves_to_none() {
        let level = resolve_level(&builtin("workflows"), &catalog(), &BTreeSet::new());
        assert_eq!(level, PermissionLevel::None);
    }

    #[test]
    fn category_without_catalog_scopes_resolves_to_none() {
        // The cases category has no scopes in this catalog; upstream hides
        // the row on this signal.
        let level = resolve_level(&builtin("cases"), &catalog(), &ids(&["wf-read"]));
        assert_eq!(level, PermissionLevel::None);
    }

    #[test]
    fn full_selection_resolves_to_admin() {
        let selected = ids(&["wf-read", "wf-write", "wf-execute", "wf-admin"]);
        let level = resolve_level(&builtin("workflows"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Admin);
    }

    #[test]
    fn canonical_read_selection_resolves_to_read() {
        let level = resolve_level(&builtin("workflows"), &catalog(), &ids(&["wf-read"]));
        assert_eq!(level, PermissionLevel::Read);
    }

    #[test]
    fn canonical_write_selection_resolves_to_write() {
        let selected = ids(&["wf-read", "wf-write"]);
        let level = resolve_level(&builtin("workflows"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Write);
    }

    #[test]
    fn canonical_execute_selection_resolves_to_execute() {
        let selected = ids(&["wf-read", "wf-execute"]);
        let level = resolve_level(&builtin("workflows"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Execute);
    }

    #[test]
    fn unrelated_read_write_pair_resolves_to_mixed() {
        let selected = ids(&["org-read", "members-write"]);
        let level = resolve_level(&builtin("organization"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Mixed);
    }

    #[test]
    fn legacy_write_selection_in_organization_resolves_to_mixed() {
        // Organization does not offer write as a canonical level, so a
        // selection shaped like one is reported as hand-picked.
        let selected = ids(&[
            "org-read",
            "org-write",
            "members-read",
            "members-write",
            "settings-read",
        ]);
        let level = resolve_level(&builtin("organization"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Mixed);
    }

    #[test]
    fn selection_outside_category_is_ignored() {
        let selected = ids(&["wf-read", "org-read", "act-slack-send"]);
        let level = resolve_level(&builtin("workflows"), &catalog(), &selected);
        assert_eq!(level, PermissionLevel::Read);
    }

    #[test]
    fn expander_rejects_mixed() {
        let result = expand_level(&builtin("workflows"), &catalog(), PermissionLevel::Mixed);
        assert!(matches!(result, Err(AppError::Contract(_))));
    }

    #[test]
    fn expander_rejects_level_the_category_does_not_offer() {
        let result = expand_level(&builtin("organization"), &catalog(), PermissionLevel::Write);
        assert!(matches!(result, Err(AppError::Contract(_))));
    }

    #[test]
    fn write_expansion_is_superset_of_read() {
        let category = builtin("workflows");
        let read = expand_level(&category, &catalog(), PermissionLevel::Read);
        let write = expand_level(&category, &catalog(), PermissionLevel::Write);

        assert!(matches!(
            (read, write),
            (Ok(read), Ok(write)) if write.is_superset(&read) && write.len() > read.len()
        ));
    }

    #[test]
    fn execute_expansion_excludes_write_tier() {
        let result = expand_level(&builtin("workflows"), &catalog(), PermissionLevel::Execute);
        assert!(matches!(
            result,
            Ok(expanded) if expanded == ids(&["wf-read", "wf-execute"])
        ));
    }

    #[test]
    fn only_admin_expansion_covers_unclassified_actions() {
        let category = builtin("workflows");
        let admin = expand_level(&category, &catalog(), PermissionLevel::Admin);
        let write = expand_level(&category, &catalog(), PermissionLevel::Write);

        assert!(matches!(admin, Ok(expanded) if expanded.contains(&ScopeId::new("wf-admin"))));
        assert!(matches!(write, Ok(expanded) if !expanded.contains(&ScopeId::new("wf-admin"))));
    }

    #[test]
    fn round_trip_holds_for_builtin_categories() {
        let catalog = catalog();
        for category in ResourceCategory::builtin() {
            if category_scopes(&category, &catalog).is_empty() {
                continue;
            }

            for level in [
                PermissionLevel::None,
                PermissionLevel::Read,
                PermissionLevel::Write,
                PermissionLevel::Execute,
                PermissionLevel::Admin,
            ] {
                if !category.offers(level) {
                    continue;
                }

                let Ok(expanded) = expand_level(&category, &catalog, level) else {
                    panic!("offered level '{level}' must expand for '{}'", category.key());
                };
                if expanded.is_empty() && level != PermissionLevel::None {
                    continue;
                }

                let resolved = resolve_level(&category, &catalog, &expanded);
                assert_eq!(resolved, level, "category '{}'", category.key());
            }
        }
    }

    #[test]
    fn grouping_orders_resources_and_actions() {
        let category = builtin("organization");
        let scopes = category_scopes(&category, &catalog());
        let groups = group_by_resource(&scopes);

        let resources: Vec<&String> = groups.keys().collect();
        assert_eq!(
            resources,
            [
                "organization",
                "organization.members",
                "organization.settings"
            ]
        );

        let settings_actions: Vec<&str> = groups
            .get("organization.settings")
            .map(|scopes| scopes.iter().map(Scope::action).collect())
            .unwrap_or_default();
        assert_eq!(settings_actions, ["admin", "read"]);
    }

    #[test]
    fn grouping_is_stable_across_calls() {
        let scopes = category_scopes(&builtin("organization"), &catalog());
        assert_eq!(group_by_resource(&scopes), group_by_resource(&scopes));
    }

    #[test]
    fn namespace_scenario_matches_selection_exactly() {
        let category = builtin("actions");
        let catalog = vec![
            scope("1", "actions", "email.send"),
            scope("2", "actions", "email.read"),
            scope("3", "actions", "slack.send"),
        ];

        assert_eq!(
            namespace_selection(&category, &catalog, &ids(&["1", "2"])),
            NamespaceSelection::Namespace {
                namespace: "email".to_owned(),
            }
        );
        assert_eq!(
            namespace_selection(&category, &catalog, &ids(&["1", "2", "3"])),
            NamespaceSelection::All
        );
        assert_eq!(
            namespace_selection(&category, &catalog, &ids(&["1", "3"])),
            NamespaceSelection::Custom
        );
        assert_eq!(
            namespace_selection(&category, &catalog, &BTreeSet::new()),
            NamespaceSelection::None
        );
    }

    #[test]
    fn namespaces_are_listed_sorted() {
        let scopes = category_scopes(&builtin("actions"), &catalog());
        let listed: Vec<String> = namespaces(&scopes).into_iter().collect();
        assert_eq!(listed, ["email", "slack"]);
    }

    #[test]
    fn unknown_namespace_is_a_contract_violation() {
        let result = namespace_scope_ids(&builtin("actions"), &catalog(), "jira");
        assert!(matches!(result, Err(AppError::Contract(_))));
    }

    /// One generated resource: scope counts per tier, each at least one so
    /// canonical sets stay pairwise distinct and the round-trip law holds.
    fn catalog_strategy() -> impl Strategy<Value = Vec<Scope>> {
        prop::collection::vec((1usize..3, 1usize..3, 1usize..3, 1usize..3), 1..4).prop_map(
            |resource_specs| {
                let mut scopes = Vec::new();
                for (index, (reads, writes, executes, others)) in
                    resource_specs.into_iter().enumerate()
                {
                    let resource = format!("resource{index}");
                    let tiers = [
                        ("read", reads),
                        ("write", writes),
                        ("execute", executes),
                        ("manage", others),
                    ];
                    for (action, count) in tiers {
                        for copy in 0..count {
                            let id = format!("{resource}-{action}-{copy}");
                            match Scope::new(ScopeId::new(id), resource.clone(), action) {
                                Ok(scope) => scopes.push(scope),
                                Err(error) => panic!("generated scope must be valid: {error}"),
                            }
                        }
                    }
                }
                scopes
            },
        )
    }

    fn generated_category(catalog: &[Scope]) -> ResourceCategory {
        let resources: BTreeSet<String> = catalog
            .iter()
            .map(|scope| scope.resource().to_owned())
            .collect();
        let input = crate::category::ResourceCategoryInput {
            key: "generated".to_owned(),
            label: "Generated".to_owned(),
            description: None,
            resources: resources.into_iter().collect(),
            intermediate_levels: vec![
                PermissionLevel::Read,
                PermissionLevel::Write,
                PermissionLevel::Execute,
            ],
        };
        match ResourceCategory::new(input) {
            Ok(category) => category,
            Err(error) => panic!("generated category must be valid: {error}"),
        }
    }

    proptest! {
        #[test]
        fn round_trip_law_holds_for_generated_catalogs(catalog in catalog_strategy()) {
            let category = generated_category(&catalog);

            for level in [
                PermissionLevel::None,
                PermissionLevel::Read,
                PermissionLevel::Write,
                PermissionLevel::Execute,
                PermissionLevel::Admin,
            ] {
                let Ok(expanded) = expand_level(&category, &catalog, level) else {
                    panic!("offered level '{level}' must expand");
                };
                prop_assert_eq!(resolve_level(&category, &catalog, &expanded), level);
            }
        }

        #[test]
        fn resolver_is_deterministic(catalog in catalog_strategy(), seed in prop::collection::btree_set(0usize..32, 0..8)) {
            let category = generated_category(&catalog);
            let selected: BTreeSet<ScopeId> = seed
                .into_iter()
                .filter_map(|index| catalog.get(index % catalog.len().max(1)))
                .map(|scope| scope.id().clone())
                .collect();

            let first = resolve_level(&category, &catalog, &selected);
            let second = resolve_level(&category, &catalog, &selected);
            prop_assert_eq!(first, second);
        }
    }
}
