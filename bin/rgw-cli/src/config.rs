//! Provider settings from file and environment
//!
//! Settings are layered: optional config file (TOML, YAML or JSON), then
//! `RGW_*` environment variables. Command-line flags are applied on top by
//! the caller.

use config::{Config, ConfigError, Environment, File, Map};
use rgw_reconcile::ProviderConfig;
use std::path::Path;

/// Prefix of environment variables read into the provider block
pub const ENV_PREFIX: &str = "RGW";

/// Load the provider block from `path` and the process environment
pub fn load(path: Option<&Path>) -> Result<ProviderConfig, ConfigError> {
    load_with_env(path, None)
}

/// Load the provider block, reading variables from `env` instead of the
/// process environment when given
pub fn load_with_env(
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<ProviderConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder
        .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgw_reconcile::config::DEFAULT_TIMEOUT_MS;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://rgw.local:8080"
access_key_id = "AKFILE"
secret_access_key = "SKFILE"
timeout_ms = 5000
"#
        )
        .unwrap();

        let config = load_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://rgw.local:8080"));
        assert_eq!(config.access_key_id.as_deref(), Some("AKFILE"));
        assert_eq!(config.timeout_ms, Some(5000));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"endpoint": "http://file.local", "access_key_id": "AKFILE"}}"#
        )
        .unwrap();

        let config = load_with_env(
            Some(file.path()),
            env(&[
                ("RGW_ENDPOINT", "http://env.local"),
                ("RGW_TIMEOUT_MS", "750"),
            ]),
        )
        .unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://env.local"));
        assert_eq!(config.access_key_id.as_deref(), Some("AKFILE"));
        assert_eq!(config.timeout_ms, Some(750));
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with_env(None, env(&[])).unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_with_env(Some(&missing), env(&[])).is_err());
    }
}
