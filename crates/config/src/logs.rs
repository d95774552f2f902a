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

use std::{collections::HashMap, str::FromStr};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, serde::Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Logs {
    /// Level applied to every target not listed in `levels`.
    #[serde(
        default = "Logs::default_level",
        deserialize_with = "Logs::deserialize_level"
    )]
    pub default_level: LevelFilter,
    /// Customize the log level of the different part of the program.
    ///
    /// See <https://docs.rs/tracing-subscriber/0.3.15/tracing_subscriber/filter/struct.EnvFilter.html>
    #[serde(default, deserialize_with = "Logs::deserialize_levels")]
    pub levels: HashMap<String, LevelFilter>,
}

impl Logs {
    const fn default_level() -> LevelFilter {
        LevelFilter::WARN
    }

    fn deserialize_level<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <String as serde::Deserialize>::deserialize(deserializer)?;
        LevelFilter::from_str(&value)
            .map_err(|e| serde::de::Error::custom(format!("Failed to parse log level: `{e}`")))
    }

    fn deserialize_levels<'de, D>(deserializer: D) -> Result<HashMap<String, LevelFilter>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <HashMap<String, String> as serde::Deserialize>::deserialize(deserializer)?;
        value
            .into_iter()
            .map(|(target, level)| {
                LevelFilter::from_str(&level)
                    .map(|level| (target, level))
                    .map_err(|e| {
                        serde::de::Error::custom(format!("Failed to parse log level: `{e}`"))
                    })
            })
            .collect::<Result<HashMap<String, LevelFilter>, _>>()
    }

    /// Filter directives equivalent to this configuration.
    #[must_use]
    pub fn directives(&self) -> String {
        std::iter::once(self.default_level.to_string())
            .chain(
                self.levels
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Filter for the subscriber, `RUST_LOG` takes precedence over the file.
    #[must_use]
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(self.directives()))
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            default_level: Self::default_level(),
            levels: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_warn() {
        let logs = Logs::default();
        assert_eq!(logs.default_level, LevelFilter::WARN);
        assert_eq!(logs.directives().to_lowercase(), "warn");
    }

    #[test]
    fn per_target() {
        let logs = serde_json::from_str::<Logs>(
            r#"{ "default_level": "error", "levels": { "spf_check_auth": "trace" } }"#,
        )
        .unwrap();
        pretty_assertions::assert_eq!(
            logs,
            Logs {
                default_level: LevelFilter::ERROR,
                levels: HashMap::from([("spf_check_auth".to_string(), LevelFilter::TRACE)]),
            }
        );
        assert_eq!(
            logs.directives().to_lowercase(),
            "error,spf_check_auth=trace"
        );
    }

    #[test]
    fn invalid_level() {
        let error = serde_json::from_str::<Logs>(r#"{ "default_level": "loud" }"#).unwrap_err();
        assert!(error.to_string().contains("Failed to parse log level"));
    }
}
