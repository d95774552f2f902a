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

//! Checks that the SPF record of a domain is syntactically correct and below
//! the 10 DNS lookups limit.

#![doc(html_no_source)]
#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]

pub mod cli;
pub mod report;

pub use report::{Formatter, Report};

use spf_check_auth::spf::{
    fetch, Classifier, Evaluator, FetchError, Outcome, Probe, Selection, TxtSource,
};
use spf_check_config::{ColorChoice, Config};

/// One record fetch, one evaluation, one classification.
pub struct Checker<S, E> {
    pub source: S,
    pub evaluator: E,
    pub classifier: Classifier,
    pub selection: Selection,
    pub probe_ip: std::net::IpAddr,
    pub local_part: String,
}

impl<S, E> Checker<S, E>
where
    S: TxtSource,
    E: Evaluator,
{
    /// # Errors
    ///
    /// * the classification patterns of the configuration do not compile
    pub fn from_config(
        config: &Config,
        source: S,
        evaluator: E,
    ) -> spf_check_config::ConfigResult<Self> {
        Ok(Self {
            source,
            evaluator,
            classifier: config.classifier()?,
            selection: config.selection,
            probe_ip: config.probe.ip,
            local_part: config.probe.local_part.clone(),
        })
    }

    #[tracing::instrument(skip(self), fields(selection = %self.selection))]
    pub async fn check(&self, domain: &str) -> Report {
        let record = match fetch(&self.source, domain, self.selection).await {
            Ok(record) => record,
            Err(FetchError::MultipleRecords { count, .. }) => return Report::MultipleRecords(count),
            Err(error) => {
                tracing::info!(%error, "No usable SPF record");
                return Report::NotFound;
            }
        };

        let probe = Probe::new(self.probe_ip, &self.local_part, domain);
        match self.evaluator.evaluate(domain, &probe).await {
            Outcome::Info(text) => Report::Info(text),
            Outcome::Verdict(verdict) => {
                tracing::debug!(?verdict, "Evaluation done");
                Report::Checked {
                    record,
                    classification: self.classifier.classify(&verdict),
                }
            }
        }
    }
}

/// Pick the report presentation.
///
/// `ColorChoice::Always` also needs the `colored` override, which the binary sets.
#[must_use]
pub fn formatter(color: ColorChoice) -> Box<dyn Formatter> {
    match color {
        ColorChoice::Auto | ColorChoice::Always => Box::new(report::Colored),
        ColorChoice::Never => Box::new(report::Plain),
    }
}

#[cfg(test)]
pub(crate) static COLOR_OVERRIDE: std::sync::Mutex<()> = std::sync::Mutex::new(());
