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

/// DNS backend of the evaluation: every query issued while walking the
/// mechanisms goes through the same resolver as the record fetch.
#[derive(Debug, Clone)]
pub struct Lookup(DnsResolver);

impl Lookup {
    /// Issue the evaluation queries with `resolver`.
    #[must_use]
    pub const fn new(resolver: DnsResolver) -> Self {
        Self(resolver)
    }
}

fn to_lookup_error(error: trust_dns_resolver::error::ResolveError) -> viaspf::lookup::LookupError {
    match error.kind() {
        trust_dns_resolver::error::ResolveErrorKind::NoRecordsFound { .. } => {
            viaspf::lookup::LookupError::NoRecords
        }
        trust_dns_resolver::error::ResolveErrorKind::Timeout => {
            viaspf::lookup::LookupError::Timeout
        }
        _ => wrap_error(error),
    }
}

fn wrap_error(
    error: impl std::error::Error + Send + Sync + 'static,
) -> viaspf::lookup::LookupError {
    viaspf::lookup::LookupError::Dns(Some(error.into()))
}

fn to_trust_dns_name(
    name: &viaspf::lookup::Name,
) -> viaspf::lookup::LookupResult<trust_dns_resolver::Name> {
    trust_dns_resolver::Name::from_ascii(name).map_err(wrap_error)
}

#[async_trait::async_trait]
impl viaspf::lookup::Lookup for Lookup {
    async fn lookup_a<'lookup, 'a>(
        &'lookup self,
        name: &'a viaspf::lookup::Name,
    ) -> viaspf::lookup::LookupResult<Vec<std::net::Ipv4Addr>> {
        tracing::trace!(?name, "A lookup");
        Ok(self
            .0
            .resolver
            .ipv4_lookup(to_trust_dns_name(name)?)
            .await
            .map_err(to_lookup_error)?
            .into_iter()
            .map(|i| i.0)
            .collect())
    }

    async fn lookup_aaaa<'lookup, 'a>(
        &'lookup self,
        name: &'a viaspf::lookup::Name,
    ) -> viaspf::lookup::LookupResult<Vec<std::net::Ipv6Addr>> {
        tracing::trace!(?name, "AAAA lookup");
        Ok(self
            .0
            .resolver
            .ipv6_lookup(to_trust_dns_name(name)?)
            .await
            .map_err(to_lookup_error)?
            .into_iter()
            .map(|i| i.0)
            .collect())
    }

    async fn lookup_mx<'lookup, 'a>(
        &'lookup self,
        name: &'a viaspf::lookup::Name,
    ) -> viaspf::lookup::LookupResult<Vec<viaspf::lookup::Name>> {
        tracing::trace!(?name, "MX lookup");
        let mut mxs = self
            .0
            .resolver
            .mx_lookup(to_trust_dns_name(name)?)
            .await
            .map_err(to_lookup_error)?
            .into_iter()
            .collect::<Vec<_>>();
        mxs.sort_by_key(trust_dns_resolver::proto::rr::rdata::MX::preference);
        mxs.into_iter()
            .map(|mx| viaspf::lookup::Name::new(&mx.exchange().to_ascii()).map_err(wrap_error))
            .collect()
    }

    async fn lookup_txt<'lookup, 'a>(
        &'lookup self,
        name: &'a viaspf::lookup::Name,
    ) -> viaspf::lookup::LookupResult<Vec<String>> {
        tracing::trace!(?name, "TXT lookup");
        Ok(self
            .0
            .resolver
            .txt_lookup(to_trust_dns_name(name)?)
            .await
            .map_err(to_lookup_error)?
            .iter()
            .map(super::fetch::join_strings)
            .collect())
    }

    async fn lookup_ptr<'lookup>(
        &'lookup self,
        ip: std::net::IpAddr,
    ) -> viaspf::lookup::LookupResult<Vec<viaspf::lookup::Name>> {
        tracing::trace!(%ip, "PTR lookup");
        self.0
            .resolver
            .reverse_lookup(ip)
            .await
            .map_err(to_lookup_error)?
            .into_iter()
            .map(|name| viaspf::lookup::Name::new(&name.to_ascii()).map_err(wrap_error))
            .collect()
    }
}
