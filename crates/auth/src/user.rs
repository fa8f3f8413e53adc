//! User snapshot and the project grants embedded in it.
//!
//! These are passive data shapes. They are owned and mutated by the
//! user-management side; this crate only reads the snapshot handed to it by
//! the authentication layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use projectguard_core::{ProjectId, UserId};

use crate::{AccessLevel, ModuleName, Resource};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Accountant,
    Limited,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Limited => "limited",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project grant
// ─────────────────────────────────────────────────────────────────────────────

/// A grant linking one project to a project-wide level and optional
/// per-module overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPermission {
    /// `None` when the stored reference could not be resolved to a project id.
    #[serde(default, deserialize_with = "lenient_project_id")]
    pub project: Option<ProjectId>,

    /// Project-wide default level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessLevel>,

    /// Module-specific overrides; they win over `access` for that module only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: BTreeMap<ModuleName, AccessLevel>,
}

impl ProjectPermission {
    pub fn new(project: ProjectId, access: AccessLevel) -> Self {
        Self {
            project: Some(project),
            access: Some(access),
            modules: BTreeMap::new(),
        }
    }

    /// A grant that only carries module overrides (no project-wide level).
    pub fn modules_only(project: ProjectId) -> Self {
        Self {
            project: Some(project),
            ..Default::default()
        }
    }

    pub fn with_module(mut self, module: ModuleName, level: AccessLevel) -> Self {
        self.modules.insert(module, level);
        self
    }

    /// Effective level of this single grant for `resource`.
    ///
    /// Module override, then project-wide `access`, then `view`.
    pub fn level_for(&self, resource: Resource) -> AccessLevel {
        let module_override = resource.module().and_then(|m| self.modules.get(&m).copied());
        module_override
            .or(self.access)
            .unwrap_or(AccessLevel::View)
    }
}

/// Stored references that do not parse as a project id become `None` instead
/// of failing the whole user snapshot.
fn lenient_project_id<'de, D>(deserializer: D) -> Result<Option<ProjectId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// User snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Authenticated user snapshot consumed by every check in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub role: Role,
    /// Snapshots that do not state this are treated as inactive.
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Vec<ProjectPermission>,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            is_active: true,
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: ProjectPermission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The grant for `project`, if any. With duplicate entries the first one wins.
    pub fn permission_for(&self, project: ProjectId) -> Option<&ProjectPermission> {
        self.permissions
            .iter()
            .find(|p| p.project == Some(project))
    }
}
