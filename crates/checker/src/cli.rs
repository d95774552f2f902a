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

/// Validates that the SPF record on the supplied domain is syntactically
/// correct and below the 10 lookup limit.
#[derive(Debug, clap::Parser)]
#[command(name = "spf-check", author, version, about)]
pub struct Args {
    /// Specified domain to lookup.
    pub domain: String,
}
