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

use spf_check_common::spf::{Verdict, FAIL_NOT_AUTHORIZED};

/// Error phrases the classifier looks for, as regular expressions.
///
/// Matching is case sensitive and not anchored: a pattern matches if it is
/// found anywhere in the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatternsConfig {
    /// Phrases denoting a malformed record.
    #[serde(default = "PatternsConfig::default_syntax")]
    pub syntax: Vec<String>,
    /// Phrases denoting an evaluation that went over the 10 DNS lookups limit.
    #[serde(default = "PatternsConfig::default_lookup_limit")]
    pub lookup_limit: Vec<String>,
    /// Message of a plain hard fail, which does not deserve to be reported.
    #[serde(default = "PatternsConfig::default_canonical_fail")]
    pub canonical_fail: String,
}

impl PatternsConfig {
    fn default_syntax() -> Vec<String> {
        [
            "SPF Permanent Error: Invalid IP4 address:",
            "SPF Permanent Error: Invalid IP6 address:",
            "SPF Permanent Error: Unknown qualifier:",
            "SPF Permanent Error: Unknown mechanism found:",
            "SPF Permanent Error: empty domain:",
            // phrasing of `viaspf`
            "SPF Permanent Error: invalid SPF record found",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    fn default_lookup_limit() -> Vec<String> {
        [
            "SPF Permanent Error: Too many DNS lookups",
            // phrasing of `viaspf`
            "SPF Permanent Error: lookup limit exceeded",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    fn default_canonical_fail() -> String {
        FAIL_NOT_AUTHORIZED.to_string()
    }
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            syntax: Self::default_syntax(),
            lookup_limit: Self::default_lookup_limit(),
            canonical_fail: Self::default_canonical_fail(),
        }
    }
}

/// A pattern of the table is not a valid regular expression.
#[derive(Debug, thiserror::Error)]
#[error("invalid classification pattern `{pattern}`: {source}")]
pub struct PatternError {
    /// The faulty pattern.
    pub pattern: String,
    /// Reason given by the regex compiler.
    #[source]
    pub source: regex::Error,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SyntaxStatus {
    ///
    #[strum(serialize = "syntactically correct")]
    Valid,
    ///
    #[strum(serialize = "not syntactically correct")]
    Invalid,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LookupLimitStatus {
    ///
    #[strum(serialize = "under the 10 lookup limit")]
    Under,
    ///
    #[strum(serialize = "over the 10 lookup limit")]
    Over,
}

/// What the classifier infers from a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    ///
    pub syntax: SyntaxStatus,
    ///
    pub lookup_limit: LookupLimitStatus,
    /// Diagnostic of an unusual hard fail, worth showing to the user.
    pub supplementary: Option<String>,
}

/// Compiled form of a [`PatternsConfig`].
#[derive(Debug, Clone)]
pub struct Classifier {
    syntax: Vec<regex::Regex>,
    lookup_limit: Vec<regex::Regex>,
    canonical_fail: String,
}

fn compile(patterns: &[String]) -> Result<Vec<regex::Regex>, PatternError> {
    patterns
        .iter()
        .map(|pattern| {
            regex::Regex::new(pattern).map_err(|source| PatternError {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl Classifier {
    /// Compile the pattern table.
    ///
    /// # Errors
    ///
    /// * one of the patterns is not a valid regular expression
    pub fn new(config: &PatternsConfig) -> Result<Self, PatternError> {
        Ok(Self {
            syntax: compile(&config.syntax)?,
            lookup_limit: compile(&config.lookup_limit)?,
            canonical_fail: config.canonical_fail.clone(),
        })
    }

    /// Classify the diagnostic of `verdict`.
    ///
    /// A message matching none of the syntax patterns is reported as
    /// syntactically correct, even if the evaluator failed for a reason the
    /// table does not know about.
    #[must_use]
    pub fn classify(&self, verdict: &Verdict) -> Classification {
        let message = verdict.message.as_str();

        Classification {
            syntax: if self.syntax.iter().any(|re| re.is_match(message)) {
                SyntaxStatus::Invalid
            } else {
                SyntaxStatus::Valid
            },
            lookup_limit: if self.lookup_limit.iter().any(|re| re.is_match(message)) {
                LookupLimitStatus::Over
            } else {
                LookupLimitStatus::Under
            },
            supplementary: (verdict.code == 550 && message != self.canonical_fail)
                .then(|| message.to_string()),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&PatternsConfig::default()).expect("default patterns are valid")
    }
}
