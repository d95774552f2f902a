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

use spf_check_common::{dns_resolver::DnsResolver, trust_dns_resolver};

/// Version tag every SPF record starts with.
pub const SPF_PREFIX: &str = "v=spf1";

/// Errors raised while looking for the SPF record of a domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The domain does not exist or has no TXT record.
    #[error("no TXT record found for `{0}`")]
    NoRecords(String),
    /// The resolver did not answer in time.
    #[error("DNS query for `{0}` timed out")]
    Timeout(String),
    /// No nameserver could be reached.
    #[error("no nameserver available to query `{0}`")]
    NoNameservers(String),
    /// Any other resolver failure.
    #[error("DNS query for `{domain}` failed: {reason}")]
    Resolve {
        /// Queried domain.
        domain: String,
        /// Resolver error message.
        reason: String,
    },
    /// TXT records exist but none of them is an SPF record.
    #[error("no TXT record of `{0}` starts with `v=spf1`")]
    NoSpfRecord(String),
    /// Several SPF records are published, see RFC 7208 section 4.5.
    #[error("`{domain}` publishes {count} SPF records")]
    MultipleRecords {
        /// Queried domain.
        domain: String,
        /// Number of records starting with `v=spf1`.
        count: usize,
    },
}

impl FetchError {
    /// Every failure except a strict multiple records rejection is reported
    /// as "no SPF record found".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        !matches!(self, Self::MultipleRecords { .. })
    }

    fn from_resolve(domain: &str, error: &trust_dns_resolver::error::ResolveError) -> Self {
        match error.kind() {
            trust_dns_resolver::error::ResolveErrorKind::NoRecordsFound { .. } => {
                Self::NoRecords(domain.to_string())
            }
            trust_dns_resolver::error::ResolveErrorKind::Timeout => {
                Self::Timeout(domain.to_string())
            }
            trust_dns_resolver::error::ResolveErrorKind::NoConnections => {
                Self::NoNameservers(domain.to_string())
            }
            _ => Self::Resolve {
                domain: domain.to_string(),
                reason: error.to_string(),
            },
        }
    }
}

/// How to pick the record when a domain publishes more than one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Selection {
    /// Keep the first record in resolver order, ignore the others.
    #[default]
    FirstMatch,
    /// Refuse to pick one, the domain is misconfigured.
    RejectMultiple,
}

/// Source of the TXT records of a domain.
#[async_trait::async_trait]
pub trait TxtSource: Sync {
    /// Return the TXT records of `domain` in the order given by the resolver,
    /// each record's character-strings joined together.
    async fn txt(&self, domain: &str) -> Result<Vec<String>, FetchError>;
}

#[async_trait::async_trait]
impl TxtSource for DnsResolver {
    async fn txt(&self, domain: &str) -> Result<Vec<String>, FetchError> {
        Ok(self
            .resolver
            .txt_lookup(domain)
            .await
            .map_err(|error| FetchError::from_resolve(domain, &error))?
            .iter()
            .map(join_strings)
            .collect())
    }
}

/// A TXT record may be split in several character-strings (RFC 7208 section 3.3).
pub(crate) fn join_strings(txt: &trust_dns_resolver::proto::rr::rdata::TXT) -> String {
    txt.iter()
        .map(|data| String::from_utf8_lossy(data))
        .collect()
}

/// Query the TXT records of `domain` and return its SPF record.
///
/// # Errors
///
/// * the TXT query failed
/// * no TXT record starts with [`SPF_PREFIX`]
/// * several records do and `selection` is [`Selection::RejectMultiple`]
#[tracing::instrument(skip(source), ret, err)]
pub async fn fetch(
    source: &impl TxtSource,
    domain: &str,
    selection: Selection,
) -> Result<String, FetchError> {
    let mut records = source
        .txt(domain)
        .await?
        .into_iter()
        .filter(|txt| txt.starts_with(SPF_PREFIX));

    let record = records
        .next()
        .ok_or_else(|| FetchError::NoSpfRecord(domain.to_string()))?;

    match (selection, records.count()) {
        (_, 0) => Ok(record),
        (Selection::FirstMatch, ignored) => {
            tracing::debug!(ignored, "Domain publishes more than one SPF record, keeping the first");
            Ok(record)
        }
        (Selection::RejectMultiple, ignored) => Err(FetchError::MultipleRecords {
            domain: domain.to_string(),
            count: ignored + 1,
        }),
    }
}
