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

/// Explanation attached to a plain "not authorized" hard fail.
pub const FAIL_NOT_AUTHORIZED: &str = "SPF fail - not authorized";

/// Disposition of an SPF evaluation, as defined by RFC 7208 section 2.6.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    serde_with::SerializeDisplay,
    serde_with::DeserializeFromStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Value {
    Pass,
    Fail,
    SoftFail,
    Neutral,
    None,
    TempError,
    PermError,
}

impl Value {
    /// SMTP reply code associated with the disposition.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Fail | Self::PermError => 550,
            Self::TempError => 451,
            Self::Pass | Self::SoftFail | Self::Neutral | Self::None => 250,
        }
    }

    /// Message reported for the disposition when the evaluator gives no
    /// error cause.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Pass => "sender SPF authorized",
            Self::Fail => FAIL_NOT_AUTHORIZED,
            Self::SoftFail => "domain owner discourages use of this host",
            Self::Neutral => "access neither permitted nor denied",
            Self::None => "",
            Self::TempError => "SPF Temporary Error",
            Self::PermError => "SPF Permanent Error",
        }
    }
}

/// Disposition, reply code and diagnostic produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    pub value: Value,
    pub code: u16,
    pub message: String,
}

impl Verdict {
    /// Build a verdict, deriving the reply code from the disposition.
    #[must_use]
    pub fn new(value: Value, message: impl Into<String>) -> Self {
        Self {
            value,
            code: value.code(),
            message: message.into(),
        }
    }

    /// Build a verdict for an evaluation that stopped on an error.
    ///
    /// The message follows the `SPF <Permanent|Temporary> Error: <cause>` form.
    #[must_use]
    pub fn from_error(value: Value, cause: &str) -> Self {
        Self::new(value, format!("{}: {cause}", value.default_message()))
    }
}

/// What the evaluator hands back to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing actionable could be computed, the text is shown as is.
    Info(String),
    Verdict(Verdict),
}
