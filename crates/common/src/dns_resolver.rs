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

use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};

/// Asynchronous resolver used both to fetch the record and to back the
/// SPF evaluation.
#[derive(Clone)]
pub struct DnsResolver {
    /// Where the resolver configuration comes from, for logs.
    pub origin: String,
    pub resolver: trust_dns_resolver::TokioAsyncResolver,
}

impl std::fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsResolver")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl DnsResolver {
    /// Resolver built from the host configuration (`/etc/resolv.conf` on unix).
    ///
    /// # Errors
    ///
    /// * the system configuration could not be read
    pub fn system() -> Result<Self, trust_dns_resolver::error::ResolveError> {
        Ok(Self {
            origin: "system".to_string(),
            resolver: trust_dns_resolver::TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }

    /// Resolver built from the host configuration, falling back on the
    /// resolver library defaults when the host configuration is unreadable.
    #[must_use]
    pub fn system_or_default() -> Self {
        Self::system().unwrap_or_else(|error| {
            tracing::warn!(%error, "Cannot read the system resolver configuration, using defaults");
            Self::new("default", ResolverConfig::default(), ResolverOpts::default())
        })
    }

    #[must_use]
    pub fn new(origin: impl Into<String>, config: ResolverConfig, option: ResolverOpts) -> Self {
        Self {
            origin: origin.into(),
            resolver: trust_dns_resolver::TokioAsyncResolver::tokio(config, option),
        }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::system_or_default()
    }
}

impl<'de> serde::Deserialize<'de> for DnsResolver {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = DnsResolver;

            fn expecting(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    fmt,
                    "either 'system', a build-in config among '{}' or a map following the `ResolverConfig` scheme",
                    <BuildIn as strum::VariantNames>::VARIANTS.join("|")
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v == "system" {
                    return DnsResolver::system().map_err(serde::de::Error::custom);
                }
                <BuildIn as std::str::FromStr>::from_str(v)
                    .map(|build_in| {
                        DnsResolver::new(v, build_in.into(), ResolverOpts::default())
                    })
                    .map_err(serde::de::Error::custom)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let Inner { config, option } = <Inner as serde::Deserialize>::deserialize(
                    serde::de::value::MapAccessDeserializer::new(map),
                )?;
                Ok(DnsResolver::new("custom", config, option))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Inner {
    #[serde(default)]
    config: ResolverConfig,
    #[serde(default)]
    option: ResolverOpts,
}

#[derive(strum::EnumString, strum::EnumVariantNames)]
#[strum(serialize_all = "snake_case")]
enum BuildIn {
    Google,
    Cloudflare,
    Quad9,
}

impl From<BuildIn> for ResolverConfig {
    fn from(val: BuildIn) -> Self {
        match val {
            BuildIn::Google => Self::google(),
            BuildIn::Cloudflare => Self::cloudflare(),
            BuildIn::Quad9 => Self::quad9(),
        }
    }
}
