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

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to open configuration file at `{0}`: {1}")]
    FileOpen(std::path::PathBuf, std::io::Error),
    #[error("failed to read configuration: `{0}`")]
    Deserialize(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("{0}")]
    Patterns(#[from] spf_check_auth::spf::PatternError),
}
