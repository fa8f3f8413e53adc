use serde::Serialize;

use projectguard_core::{ProjectId, UserId};

use crate::{AccessLevel, Action, Resource, Role, User, extract_scope};

/// Whether `level` is sufficient for `action`.
///
/// Reads need at least `view`; writes and deletes need exactly `edit`.
pub fn allow_by_op(level: AccessLevel, action: Action) -> bool {
    match action {
        Action::Read => level >= AccessLevel::View,
        Action::Write | Action::Delete => level == AccessLevel::Edit,
    }
}

/// How a per-project decision was reached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    AdminBypass,
    Unrestricted,
    Granted(AccessLevel),
    NoProjectGrant,
    InsufficientLevel(AccessLevel),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            Decision::AdminBypass | Decision::Unrestricted | Decision::Granted(_)
        )
    }
}

/// Decide `(user, project, resource, action)` against the grant for that
/// project only. Levels granted on other projects never count.
pub fn decide(user: &User, project: ProjectId, resource: Resource, action: Action) -> Decision {
    if user.is_admin() {
        return Decision::AdminBypass;
    }
    if extract_scope(user).is_unrestricted() {
        return Decision::Unrestricted;
    }

    let Some(entry) = user.permission_for(project) else {
        return Decision::NoProjectGrant;
    };

    let effective = entry.level_for(resource);
    if allow_by_op(effective, action) {
        Decision::Granted(effective)
    } else {
        Decision::InsufficientLevel(effective)
    }
}

/// Single source of truth for per-record authorization.
pub fn can_user(user: &User, project: ProjectId, resource: Resource, action: Action) -> bool {
    let decision = decide(user, project, resource, action);
    tracing::debug!(
        user_id = %user.id,
        project_id = %project,
        %resource,
        %action,
        ?decision,
        "authorization decision"
    );
    decision.is_allowed()
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable explanation of a per-project decision.
///
/// Answers "why was this request allowed/denied?" for audit and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionExplanation {
    pub user_id: UserId,
    pub role: Role,
    pub project_id: ProjectId,
    pub resource: Resource,
    pub action: Action,
    pub granted: bool,
    pub reason: String,
    /// Level of the matching project grant, when one exists.
    pub effective_level: Option<AccessLevel>,
    pub denial_kind: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoProjectGrant,
    InsufficientLevel,
}

pub fn explain_decision(
    user: &User,
    project: ProjectId,
    resource: Resource,
    action: Action,
) -> DecisionExplanation {
    let decision = decide(user, project, resource, action);

    let (reason, effective_level, denial_kind) = match decision {
        Decision::AdminBypass => ("user has the admin role".to_string(), None, None),
        Decision::Unrestricted => (
            "user has no project grants and is therefore unrestricted".to_string(),
            None,
            None,
        ),
        Decision::Granted(level) => (
            format!("project grant gives '{level}' on {resource}, sufficient for {action}"),
            Some(level),
            None,
        ),
        Decision::NoProjectGrant => (
            format!("user has no grant for project {project}"),
            None,
            Some(DenialKind::NoProjectGrant),
        ),
        Decision::InsufficientLevel(level) => (
            format!(
                "project grant gives '{level}' on {resource}; {action} requires '{}'",
                required_level(action)
            ),
            Some(level),
            Some(DenialKind::InsufficientLevel),
        ),
    };

    DecisionExplanation {
        user_id: user.id,
        role: user.role,
        project_id: project,
        resource,
        action,
        granted: decision.is_allowed(),
        reason,
        effective_level,
        denial_kind,
    }
}

fn required_level(action: Action) -> AccessLevel {
    match action {
        Action::Read => AccessLevel::View,
        Action::Write | Action::Delete => AccessLevel::Edit,
    }
}
