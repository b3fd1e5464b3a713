//! # Configuration
//!
//! Workspace, token and endpoint settings for the Berryfi client.
//!
//! Sources, highest precedence first:
//! - Command-line flags
//! - Environment: `BERRYFI_WORKSPACE`, `BERRYFI_TOKEN`, `BERRYFI_URL`,
//!   `BERRYFI_TIMEOUT_SECS`
//! - A TOML file passed with `--config`
//!
//! Empty values count as missing. A missing workspace or token is fatal.

use berryfi_core::BerryfiError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_WORKSPACE: &str = "BERRYFI_WORKSPACE";
pub const ENV_TOKEN: &str = "BERRYFI_TOKEN";
pub const ENV_URL: &str = "BERRYFI_URL";
pub const ENV_TIMEOUT: &str = "BERRYFI_TIMEOUT_SECS";

// =============================================================================
// PARTIAL CONFIG
// =============================================================================

/// One layer of settings. Any value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub workspace: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl PartialConfig {
    /// Read a layer through a variable lookup.
    ///
    /// # Errors
    /// `Config` when the timeout is not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BerryfiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match non_empty(lookup(ENV_TIMEOUT)) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                BerryfiError::Config(format!("{ENV_TIMEOUT} must be a number of seconds: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            workspace: non_empty(lookup(ENV_WORKSPACE)),
            token: non_empty(lookup(ENV_TOKEN)),
            base_url: non_empty(lookup(ENV_URL)),
            timeout_secs,
        })
    }

    /// Read the environment layer.
    pub fn from_env() -> Result<Self, BerryfiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read a TOML file layer.
    ///
    /// # Errors
    /// `Config` when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, BerryfiError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BerryfiError::Config(format!("Cannot read config file '{}': {e}", path.display()))
        })?;
        let layer: Self = toml::from_str(&contents).map_err(|e| {
            BerryfiError::Config(format!("Invalid config file '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(layer.normalized())
    }

    /// Fill the gaps of `self` from `lower`. Values already set win.
    #[must_use]
    pub fn merge(self, lower: PartialConfig) -> Self {
        Self {
            workspace: self.workspace.or(lower.workspace),
            token: self.token.or(lower.token),
            base_url: self.base_url.or(lower.base_url),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
        }
    }

    fn normalized(self) -> Self {
        Self {
            workspace: non_empty(self.workspace),
            token: non_empty(self.token),
            base_url: non_empty(self.base_url),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Validate the merged layers into a usable configuration.
    ///
    /// # Errors
    /// `Config` naming the first missing required value.
    pub fn resolve(self) -> Result<BerryfiConfig, BerryfiError> {
        let merged = self.normalized();
        let workspace = merged.workspace.ok_or_else(|| {
            BerryfiError::Config(format!(
                "Missing workspace; pass --workspace or set {ENV_WORKSPACE}"
            ))
        })?;
        let token = merged.token.ok_or_else(|| {
            BerryfiError::Config(format!("Missing token; pass --token or set {ENV_TOKEN}"))
        })?;

        Ok(BerryfiConfig {
            workspace,
            token,
            base_url: merged.base_url,
            timeout_secs: merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// CONFIG
// =============================================================================

/// Validated client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct BerryfiConfig {
    /// Workspace subdomain: `acme` for `acme.fibery.io`.
    pub workspace: String,
    pub token: String,
    /// Overrides `https://{workspace}.fibery.io/api`.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl BerryfiConfig {
    /// Configuration for `workspace` with default endpoint and timeout.
    #[must_use]
    pub fn new(workspace: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            token: token.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from flags, environment and an optional file, in that order.
    pub fn load(flags: PartialConfig, file: Option<&Path>) -> Result<Self, BerryfiError> {
        let file_layer = match file {
            Some(path) => PartialConfig::from_file(path)?,
            None => PartialConfig::default(),
        };
        flags
            .merge(PartialConfig::from_env()?)
            .merge(file_layer)
            .resolve()
    }

    /// API root, without trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.fibery.io/api", self.workspace),
        }
    }

    /// The command endpoint.
    pub fn commands_url(&self) -> String {
        format!("{}/commands", self.base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for BerryfiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BerryfiConfig")
            .field("workspace", &self.workspace)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_values_count_as_missing() {
        let layer = PartialConfig::from_lookup(lookup(&[
            (ENV_WORKSPACE, ""),
            (ENV_TOKEN, "  "),
        ]))
        .expect("layer");
        assert_eq!(layer, PartialConfig::default());
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = PartialConfig::from_lookup(lookup(&[(ENV_TIMEOUT, "soon")])).expect_err("bad");
        assert!(matches!(err, BerryfiError::Config(_)));
    }

    #[test]
    fn higher_layers_win() {
        let flags = PartialConfig {
            token: Some("flag-token".into()),
            ..PartialConfig::default()
        };
        let env = PartialConfig::from_lookup(lookup(&[
            (ENV_WORKSPACE, "acme"),
            (ENV_TOKEN, "env-token"),
            (ENV_TIMEOUT, "5"),
        ]))
        .expect("env");

        let config = flags.merge(env).resolve().expect("resolve");
        assert_eq!(config.workspace, "acme");
        assert_eq!(config.token, "flag-token");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_token_is_fatal() {
        let layer = PartialConfig {
            workspace: Some("acme".into()),
            ..PartialConfig::default()
        };
        let err = layer.resolve().expect_err("no token");
        assert!(err.to_string().contains(ENV_TOKEN));
    }

    #[test]
    fn endpoint_derives_from_workspace() {
        let config = BerryfiConfig::new("acme", "t");
        assert_eq!(config.commands_url(), "https://acme.fibery.io/api/commands");

        let custom = BerryfiConfig {
            base_url: Some("http://127.0.0.1:9000/api/".into()),
            ..config
        };
        assert_eq!(custom.commands_url(), "http://127.0.0.1:9000/api/commands");
    }

    #[test]
    fn debug_hides_the_token() {
        let config = BerryfiConfig::new("acme", "secret-token");
        assert!(!format!("{config:?}").contains("secret-token"));
    }
}
