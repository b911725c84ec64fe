//! Probe configuration.
//!
//! # Data Flow
//! ```text
//! process environment (JOBPULSE_TOKEN)
//!     → ProbeConfig (immutable after startup)
//!     → shared via middleware state with the backend registry
//! ```
//!
//! # Design Decisions
//! - Read once at startup; no reload, no runtime mutation
//! - Absent or empty token is not an error: the info endpoint simply
//!   never matches (fail closed)

use serde::{Deserialize, Serialize};

/// Environment variable holding the access token.
pub const TOKEN_VAR: &str = "JOBPULSE_TOKEN";

/// Probe settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Shared secret embedded in the info path. `None` disables the
    /// info endpoint entirely.
    pub token: Option<String>,
}

impl ProbeConfig {
    /// Config with an explicit token. An empty token counts as absent.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }

    /// Read the token from `JOBPULSE_TOKEN`.
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_VAR).ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::info!("JOBPULSE_TOKEN not set, info endpoint disabled");
        }
        Self { token }
    }

    /// The access token, if one is configured and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_counts_as_absent() {
        assert_eq!(ProbeConfig::new("").token(), None);
        assert_eq!(ProbeConfig::default().token(), None);

        // Deserialized configs get the same treatment.
        let config: ProbeConfig = serde_json::from_str(r#"{"token": ""}"#).unwrap();
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_explicit_token_is_kept() {
        let config = ProbeConfig::new("d1f3a9");
        assert_eq!(config.token(), Some("d1f3a9"));
    }

    #[test]
    fn test_minimal_config_deserializes() {
        let config: ProbeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.token(), None);
    }
}
