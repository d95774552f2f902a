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

use colored::Colorize;
use spf_check_auth::spf::Classification;

pub const NOT_FOUND: &str = "No SPF record found on the specified domain!";
pub const MULTIPLE_RECORDS: &str = "Multiple SPF records found on the specified domain!";

/// Presentation of the highlighted parts of a report.
pub trait Formatter {
    fn heading(&self, text: &str) -> String;
}

/// Terminal colors, subject to the `colored` crate overrides
/// (`NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE`).
pub struct Colored;

impl Formatter for Colored {
    fn heading(&self, text: &str) -> String {
        text.yellow().to_string()
    }
}

pub struct Plain;

impl Formatter for Plain {
    fn heading(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Result of one check, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The domain has no usable SPF record, whatever the reason.
    NotFound,
    /// The domain publishes several records and the selection policy refuses to pick one.
    MultipleRecords(usize),
    /// The evaluator had nothing actionable to say.
    Info(String),
    Checked {
        record: String,
        classification: Classification,
    },
}

impl Report {
    /// Print the report in a human readable form.
    ///
    /// # Errors
    ///
    /// * writing to `out` failed
    pub fn write(
        &self,
        out: &mut impl std::io::Write,
        formatter: &dyn Formatter,
    ) -> std::io::Result<()> {
        match self {
            Self::NotFound => writeln!(out, "\n{NOT_FOUND}\n"),
            Self::MultipleRecords(count) => {
                writeln!(out, "\n{MULTIPLE_RECORDS} ({count} records)\n")
            }
            Self::Info(text) => writeln!(out, "{text}"),
            Self::Checked {
                record,
                classification,
            } => {
                writeln!(out, "\n{}", formatter.heading("THE FOUND SPF RECORD IS:"))?;
                writeln!(out, "{record}\n")?;
                writeln!(out, "The SPF record is {}", classification.syntax)?;
                writeln!(out, "The SPF record is {}\n", classification.lookup_limit)?;
                if let Some(supplementary) = &classification.supplementary {
                    writeln!(out, "{supplementary}\n")?;
                }
                Ok(())
            }
        }
    }
}
