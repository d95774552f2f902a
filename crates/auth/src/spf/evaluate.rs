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

use spf_check_common::spf::{Outcome, Value, Verdict};

/// Synthetic connection used to drive the evaluation, no mail is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Address of the fake client.
    pub ip: std::net::IpAddr,
    /// `MAIL FROM` address, `<local_part>@<domain>`.
    pub sender: String,
}

impl Probe {
    /// Build the probe sending as `local_part` on behalf of `domain`.
    #[must_use]
    pub fn new(ip: std::net::IpAddr, local_part: &str, domain: &str) -> Self {
        Self {
            ip,
            sender: format!("{local_part}@{domain}"),
        }
    }
}

/// Evaluates the SPF policy of a domain for a given probe.
#[async_trait::async_trait]
pub trait Evaluator: Sync {
    /// Run the `check_host()` function of RFC 7208 for the probe, `domain`
    /// being the name the probe greets with.
    async fn evaluate(&self, domain: &str, probe: &Probe) -> Outcome;
}

/// [`Evaluator`] backed by [`viaspf::evaluate_sender`].
pub struct ViaspfEvaluator<L> {
    lookup: L,
    config: viaspf::Config,
}

impl<L> ViaspfEvaluator<L> {
    /// Evaluate with the default `viaspf` configuration, which enforces the
    /// 10 DNS lookups limit.
    #[must_use]
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            config: viaspf::Config::default(),
        }
    }
}

#[async_trait::async_trait]
impl<L> Evaluator for ViaspfEvaluator<L>
where
    L: viaspf::lookup::Lookup + Sync,
{
    #[tracing::instrument(skip(self), ret)]
    async fn evaluate(&self, domain: &str, probe: &Probe) -> Outcome {
        let sender = match viaspf::Sender::from_address(&probe.sender) {
            Ok(sender) => sender,
            Err(error) => {
                return Outcome::Info(format!(
                    "cannot evaluate sender `{}`: {error}",
                    probe.sender
                ));
            }
        };

        let helo = viaspf::Sender::from_domain(domain).ok();

        Outcome::Verdict(
            viaspf::evaluate_sender(
                &self.lookup,
                &self.config,
                probe.ip,
                &sender,
                helo.as_ref().map(viaspf::Sender::domain),
            )
            .await
            .into_verdict(),
        )
    }
}

trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for viaspf::QueryResult {
    fn into_verdict(self) -> Verdict {
        let viaspf::QueryResult {
            spf_result,
            cause,
            trace: _,
        } = self;

        let value = match spf_result {
            viaspf::SpfResult::None => Value::None,
            viaspf::SpfResult::Neutral => Value::Neutral,
            viaspf::SpfResult::Pass => Value::Pass,
            viaspf::SpfResult::Fail(_) => Value::Fail,
            viaspf::SpfResult::Softfail => Value::SoftFail,
            viaspf::SpfResult::Temperror => Value::TempError,
            viaspf::SpfResult::Permerror => Value::PermError,
        };

        let error = cause.and_then(|cause| match cause {
            viaspf::SpfResultCause::Match(mechanism) => {
                tracing::debug!(%mechanism, "Evaluation stopped on a matching mechanism");
                None
            }
            viaspf::SpfResultCause::Error(error) => Some(error.to_string()),
        });

        match (value, error) {
            (Value::TempError | Value::PermError, Some(error)) => Verdict::from_error(value, &error),
            (value, _) => Verdict::new(value, value.default_message()),
        }
    }
}
