//! Runtime configuration for the authorization core.

use std::time::Duration;

pub const LOOKUP_TIMEOUT_ENV: &str = "AUTHZ_LOOKUP_TIMEOUT_MS";

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthzConfig {
    /// Upper bound for the owning-project lookup; expiry resolves to not-found.
    pub lookup_timeout: Duration,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl AuthzConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup_timeout_var(std::env::var(LOOKUP_TIMEOUT_ENV).ok().as_deref())
    }

    fn from_lookup_timeout_var(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Self {
                lookup_timeout: Duration::from_millis(ms),
            },
            _ => {
                tracing::warn!(value = raw, "invalid {LOOKUP_TIMEOUT_ENV}; using default");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_millisecond_timeout() {
        let cfg = AuthzConfig::from_lookup_timeout_var(Some("250"));
        assert_eq!(cfg.lookup_timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_or_missing_values_fall_back_to_default() {
        assert_eq!(AuthzConfig::from_lookup_timeout_var(None), AuthzConfig::default());
        assert_eq!(AuthzConfig::from_lookup_timeout_var(Some("0")), AuthzConfig::default());
        assert_eq!(AuthzConfig::from_lookup_timeout_var(Some("soon")), AuthzConfig::default());
    }
}
