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

use spf_check::{cli::Args, formatter, Checker};
use spf_check_auth::spf::{Lookup, ViaspfEvaluator};
use spf_check_config::{ColorChoice, Config};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, Layer,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<std::process::ExitCode, Box<dyn std::error::Error>> {
    let args = <Args as clap::Parser>::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("spf-check: {error}");
            return Ok(std::process::ExitCode::FAILURE);
        }
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(config.logs.env_filter());
    if let Err(error) = tracing_subscriber::registry().with(layer).try_init() {
        eprintln!("spf-check: cannot install the logger: {error}");
    }
    if config.output.color == ColorChoice::Always {
        colored::control::set_override(true);
    }

    let checker = Checker::from_config(
        &config,
        config.dns_resolver.clone(),
        ViaspfEvaluator::new(Lookup::new(config.dns_resolver.clone())),
    )?;

    tracing::debug!(domain = %args.domain, ?config, "Starting the check");
    let report = checker.check(&args.domain).await;

    report.write(
        &mut std::io::stdout().lock(),
        formatter(config.output.color).as_ref(),
    )?;
    Ok(std::process::ExitCode::SUCCESS)
}
