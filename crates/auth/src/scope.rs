//! Per-request authorization scope.
//!
//! A `Scope` is derived from the user snapshot at the start of a request and
//! dropped at its end. It is never cached across requests.

use std::collections::BTreeSet;

use serde::Serialize;

use projectguard_core::ProjectId;

use crate::{AccessLevel, ModuleLevels, ModuleName, ProjectPermission, Resource, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// All projects at the maximal level.
    Unrestricted,
    Restricted(RestrictedScope),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedScope {
    pub project_ids: BTreeSet<ProjectId>,
    pub module_levels: ModuleLevels,
    /// Aggregated project-wide level, consulted for the `projects` resource.
    pub project_level: AccessLevel,
}

impl RestrictedScope {
    pub fn level(&self, resource: Resource) -> AccessLevel {
        match resource {
            Resource::Projects => self.project_level,
            Resource::Module(m) => self.module_levels.get(m),
        }
    }
}

impl Scope {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Scope::Unrestricted)
    }

    /// Aggregated level for `resource`; `Edit` when unrestricted.
    pub fn level(&self, resource: Resource) -> AccessLevel {
        match self {
            Scope::Unrestricted => AccessLevel::Edit,
            Scope::Restricted(r) => r.level(resource),
        }
    }
}

/// Build the aggregated scope for a user.
///
/// - admins and users without any grant are unrestricted
/// - otherwise every module starts at `view` and is raised to the maximum
///   effective level over all grants
pub fn extract_scope(user: &User) -> Scope {
    if user.is_admin() || user.permissions.is_empty() {
        return Scope::Unrestricted;
    }

    Scope::Restricted(aggregate(user.permissions.iter(), AccessLevel::View))
}

/// Build a scope limited to the grants a user holds on one project.
///
/// Unlike [`extract_scope`], levels start at `none`: without a grant for
/// `project` nothing is permitted, and with one the levels equal what the
/// per-entity decision would compute for that grant.
pub fn extract_project_scope(user: &User, project: ProjectId) -> Scope {
    if user.is_admin() || user.permissions.is_empty() {
        return Scope::Unrestricted;
    }

    let entries = user
        .permissions
        .iter()
        .filter(|p| p.project == Some(project));
    Scope::Restricted(aggregate(entries, AccessLevel::None))
}

fn aggregate<'a>(
    entries: impl Iterator<Item = &'a ProjectPermission>,
    floor: AccessLevel,
) -> RestrictedScope {
    let mut project_ids = BTreeSet::new();
    let mut module_levels = ModuleLevels::uniform(floor);
    let mut project_level = floor;

    for entry in entries {
        if let Some(project) = entry.project {
            project_ids.insert(project);
        }
        for module in ModuleName::ALL {
            module_levels.raise(module, entry.level_for(Resource::Module(module)));
        }
        project_level = project_level.max(entry.level_for(Resource::Projects));
    }

    RestrictedScope {
        project_ids,
        module_levels,
        project_level,
    }
}
