/*
 * vSMTP mail transfer agent
 *
 * Copyright (C) 2003 - viridIT SAS
 * Licensed under the Elastic License 2.0
 *
 * You should have received a copy of the Elastic License 2.0 along with
 * this program. If not, see https://www.elastic.co/licensing/elastic-license.
 *
 */

pub mod error;
pub mod logs;

pub use error::ConfigError;
pub use logs::Logs;

use spf_check_auth::spf::{Classifier, PatternsConfig, Selection};
use spf_check_common::dns_resolver::DnsResolver;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, error::ConfigError>;

/// Environment variable holding the path of the configuration file.
pub const CONFIG_PATH_ENV: &str = "SPF_CHECK_CONFIG";

/// Configuration of the checker. Every field is optional in the file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Synthetic client used to run the evaluation.
    #[serde(default)]
    pub probe: SyntheticProbe,
    /// Policy applied when several SPF records are published.
    #[serde(default)]
    pub selection: Selection,
    /// Resolver used for the record fetch and the evaluation.
    #[serde(default)]
    pub dns_resolver: DnsResolver,
    /// Error phrases recognized in the evaluation diagnostic.
    #[serde(default)]
    pub patterns: PatternsConfig,
    /// Report presentation.
    #[serde(default)]
    pub output: Output,
    /// logging configuration.
    #[serde(default)]
    pub logs: Logs,
}

impl Config {
    /// Read the file named by [`CONFIG_PATH_ENV`], or use the defaults when
    /// the variable is not set.
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_json_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Create a configuration structure from a JSON file.
    pub fn from_json_file(path: &impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|error| error::ConfigError::FileOpen(path_ref.into(), error))?;

        Self::from_json_str(&content)
    }

    /// Create a configuration structure from a JSON document.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        Ok(serde_path_to_error::deserialize(&mut deserializer)?)
    }

    /// Compile the classification table.
    pub fn classifier(&self) -> ConfigResult<Classifier> {
        Ok(Classifier::new(&self.patterns)?)
    }
}

/// Client the evaluation pretends to receive mail from.
#[derive(Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntheticProbe {
    #[serde(default = "SyntheticProbe::default_ip")]
    pub ip: std::net::IpAddr,
    /// Local part of the `MAIL FROM` address, the domain being the checked one.
    #[serde(default = "SyntheticProbe::default_local_part")]
    pub local_part: String,
}

impl SyntheticProbe {
    const fn default_ip() -> std::net::IpAddr {
        std::net::IpAddr::V4(std::net::Ipv4Addr::new(10, 0, 0, 1))
    }

    fn default_local_part() -> String {
        "test".to_string()
    }
}

impl Default for SyntheticProbe {
    fn default() -> Self {
        Self {
            ip: Self::default_ip(),
            local_part: Self::default_local_part(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default)]
    pub color: ColorChoice,
}

/// When to colorize the report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    /// Let the terminal detection decide.
    #[default]
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_document() {
        let config = Config::from_json_str("{}").unwrap();
        pretty_assertions::assert_eq!(config.probe, SyntheticProbe::default());
        assert_eq!(config.probe.ip.to_string(), "10.0.0.1");
        assert_eq!(config.probe.local_part, "test");
        assert_eq!(config.selection, Selection::FirstMatch);
        assert_eq!(config.patterns, PatternsConfig::default());
        assert_eq!(config.output.color, ColorChoice::Auto);
    }

    #[tokio::test]
    async fn full_document() {
        let config = Config::from_json_str(
            r#"{
                "probe": { "ip": "2001:db8::1", "local_part": "postmaster" },
                "selection": "reject_multiple",
                "dns_resolver": "cloudflare",
                "patterns": { "lookup_limit": ["too many lookups"] },
                "output": { "color": "never" },
                "logs": { "default_level": "debug" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.probe.ip.to_string(), "2001:db8::1");
        assert_eq!(config.probe.local_part, "postmaster");
        assert_eq!(config.selection, Selection::RejectMultiple);
        assert_eq!(config.dns_resolver.origin, "cloudflare");
        assert_eq!(config.patterns.lookup_limit, vec!["too many lookups"]);
        assert_eq!(config.patterns.syntax, PatternsConfig::default().syntax);
        assert_eq!(config.output.color, ColorChoice::Never);
        assert_eq!(
            config.logs.default_level,
            tracing_subscriber::filter::LevelFilter::DEBUG
        );
    }

    #[tokio::test]
    async fn unknown_field_path() {
        let error = Config::from_json_str(r#"{ "probe": { "helo": "foo" } }"#).unwrap_err();
        let ConfigError::Deserialize(error) = error else {
            panic!("expected a deserialization error");
        };
        assert!(error.path().to_string().starts_with("probe"), "{error}");
    }

    #[tokio::test]
    async fn invalid_pattern() {
        let config = Config::from_json_str(r#"{ "patterns": { "syntax": ["[a-"] } }"#).unwrap();
        assert!(matches!(config.classifier(), Err(ConfigError::Patterns(_))));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::from_json_file(&"/nonexistent/spf-check.json"),
            Err(ConfigError::FileOpen(..))
        ));
    }
}
