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

/// Classification of an evaluation diagnostic against known error phrases.
pub mod classify;
/// Evaluation of the record through [`viaspf`].
pub mod evaluate;
/// Retrieval of the SPF record published by a domain.
pub mod fetch;
/// [`viaspf::lookup::Lookup`] implementation over the trust-dns resolver.
pub mod lookup;

pub use classify::{
    Classification, Classifier, LookupLimitStatus, PatternError, PatternsConfig, SyntaxStatus,
};
pub use evaluate::{Evaluator, Probe, ViaspfEvaluator};
pub use fetch::{fetch, FetchError, Selection, TxtSource, SPF_PREFIX};
pub use lookup::Lookup;
pub use spf_check_common::spf::{Outcome, Value, Verdict};
