//! Typed request action.
//!
//! HTTP verbs are normalized here exactly once; the coarse guard and the
//! per-entity decision both consume the resulting `Action`.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
    #[serde(alias = "del")]
    Delete,
}

impl Action {
    /// GET → read, DELETE → delete, every other verb → write.
    pub fn from_http_method(method: &str) -> Self {
        if method.eq_ignore_ascii_case("GET") {
            Action::Read
        } else if method.eq_ignore_ascii_case("DELETE") {
            Action::Delete
        } else {
            Action::Write
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "write" => Ok(Action::Write),
            "delete" | "del" => Ok(Action::Delete),
            other => Err(AuthzError::misconfigured(format!("unknown action '{other}'"))),
        }
    }
}
