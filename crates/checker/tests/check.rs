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

use spf_check::{report::Plain, Checker, Report};
use spf_check_auth::spf::{
    Classifier, Evaluator, FetchError, LookupLimitStatus, Outcome, Probe, Selection, SyntaxStatus,
    TxtSource, ViaspfEvaluator,
};
use spf_check_common::spf::{Value, Verdict};
use std::collections::HashMap;
use viaspf::lookup::{LookupError, LookupResult, Name};

/// In-memory zone, only TXT records.
#[derive(Clone, Default)]
struct Zone(HashMap<String, Vec<String>>);

impl Zone {
    fn with(mut self, domain: &str, record: &str) -> Self {
        self.0
            .entry(domain.to_string())
            .or_default()
            .push(record.to_string());
        self
    }

    fn get(&self, domain: &str) -> Option<&Vec<String>> {
        self.0
            .get(&domain.trim_end_matches('.').to_ascii_lowercase())
    }
}

#[async_trait::async_trait]
impl TxtSource for Zone {
    async fn txt(&self, domain: &str) -> Result<Vec<String>, FetchError> {
        self.get(domain)
            .cloned()
            .ok_or_else(|| FetchError::NoRecords(domain.to_string()))
    }
}

#[async_trait::async_trait]
impl viaspf::lookup::Lookup for Zone {
    async fn lookup_a<'lookup, 'a>(
        &'lookup self,
        _: &'a Name,
    ) -> LookupResult<Vec<std::net::Ipv4Addr>> {
        Err(LookupError::NoRecords)
    }

    async fn lookup_aaaa<'lookup, 'a>(
        &'lookup self,
        _: &'a Name,
    ) -> LookupResult<Vec<std::net::Ipv6Addr>> {
        Err(LookupError::NoRecords)
    }

    async fn lookup_mx<'lookup, 'a>(&'lookup self, _: &'a Name) -> LookupResult<Vec<Name>> {
        Err(LookupError::NoRecords)
    }

    async fn lookup_txt<'lookup, 'a>(&'lookup self, name: &'a Name) -> LookupResult<Vec<String>> {
        self.get(AsRef::<str>::as_ref(name))
            .cloned()
            .ok_or(LookupError::NoRecords)
    }

    async fn lookup_ptr<'lookup>(&'lookup self, _: std::net::IpAddr) -> LookupResult<Vec<Name>> {
        Err(LookupError::NoRecords)
    }
}

/// Evaluator returning a canned outcome and remembering the probe it got.
struct Canned {
    outcome: Outcome,
    seen: std::sync::Mutex<Option<(String, Probe)>>,
}

impl Canned {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            seen: std::sync::Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl Evaluator for Canned {
    async fn evaluate(&self, domain: &str, probe: &Probe) -> Outcome {
        *self.seen.lock().unwrap() = Some((domain.to_string(), probe.clone()));
        self.outcome.clone()
    }
}

fn checker<E: Evaluator>(zone: Zone, evaluator: E) -> Checker<Zone, E> {
    Checker {
        source: zone,
        evaluator,
        classifier: Classifier::default(),
        selection: Selection::FirstMatch,
        probe_ip: "10.0.0.1".parse().unwrap(),
        local_part: "test".to_string(),
    }
}

fn render(report: &Report) -> String {
    let mut out = Vec::new();
    report.write(&mut out, &Plain).unwrap();
    String::from_utf8(out).unwrap()
}

#[test_log::test(tokio::test)]
async fn hard_fail_end_to_end() {
    let zone = Zone::default().with("example.com", "v=spf1 -all");
    let checker = checker(
        zone,
        Canned::new(Outcome::Verdict(Verdict::new(
            Value::Fail,
            Value::Fail.default_message(),
        ))),
    );

    let report = checker.check("example.com").await;

    pretty_assertions::assert_eq!(
        render(&report),
        concat!(
            "\n",
            "THE FOUND SPF RECORD IS:\n",
            "v=spf1 -all\n",
            "\n",
            "The SPF record is syntactically correct\n",
            "The SPF record is under the 10 lookup limit\n",
            "\n",
        )
    );

    let (domain, probe) = checker.evaluator.seen.lock().unwrap().clone().unwrap();
    assert_eq!(domain, "example.com");
    assert_eq!(probe.sender, "test@example.com");
    assert_eq!(probe.ip.to_string(), "10.0.0.1");
}

#[test_log::test(tokio::test)]
async fn evaluated_with_viaspf() {
    let zone = Zone::default()
        .with("example.com", "google-site-verification=abc")
        .with("example.com", "v=spf1 -all");
    let checker = checker(zone.clone(), ViaspfEvaluator::new(zone));

    pretty_assertions::assert_eq!(
        checker.check("example.com").await,
        Report::Checked {
            record: "v=spf1 -all".to_string(),
            classification: spf_check_auth::spf::Classification {
                syntax: SyntaxStatus::Valid,
                lookup_limit: LookupLimitStatus::Under,
                supplementary: None,
            },
        }
    );
}

#[test_log::test(tokio::test)]
async fn too_many_includes() {
    let mut zone = Zone::default().with("example.com", "v=spf1 include:l1.example.com -all");
    for level in 1..12 {
        zone = zone.with(
            &format!("l{level}.example.com"),
            &format!("v=spf1 include:l{}.example.com -all", level + 1),
        );
    }
    zone = zone.with("l12.example.com", "v=spf1 -all");

    let checker = checker(zone.clone(), ViaspfEvaluator::new(zone));
    let Report::Checked { classification, .. } = checker.check("example.com").await else {
        panic!("a record is published");
    };

    assert_eq!(classification.lookup_limit, LookupLimitStatus::Over);
    assert_eq!(classification.syntax, SyntaxStatus::Valid);
    let supplementary = classification.supplementary.unwrap();
    assert!(
        supplementary.starts_with("SPF Permanent Error"),
        "{supplementary}"
    );
}

#[rstest::rstest]
#[case("v=spf1 foo:bar -all")]
#[case("v=spf1 ip4:999.0.0.1 -all")]
#[case("v=spf1 *all")]
#[tokio::test]
async fn malformed_record(#[case] record: &str) {
    let zone = Zone::default().with("example.com", record);
    let checker = checker(zone.clone(), ViaspfEvaluator::new(zone));

    let report = checker.check("example.com").await;
    let Report::Checked { classification, .. } = &report else {
        panic!("a record is published");
    };

    pretty_assertions::assert_eq!(classification.syntax, SyntaxStatus::Invalid);
    assert_eq!(classification.lookup_limit, LookupLimitStatus::Under);
    assert!(render(&report).contains("The SPF record is not syntactically correct\n"));
}

#[rstest::rstest]
#[case::no_txt(Zone::default())]
#[case::no_spf(Zone::default().with("example.com", "hello world"))]
#[tokio::test]
async fn no_record(#[case] zone: Zone) {
    let report = checker(zone, Canned::new(Outcome::Info(String::new())))
        .check("example.com")
        .await;

    pretty_assertions::assert_eq!(report, Report::NotFound);
    pretty_assertions::assert_eq!(
        render(&report),
        "\nNo SPF record found on the specified domain!\n\n"
    );
}

#[test_log::test(tokio::test)]
async fn rejected_duplicates() {
    let zone = Zone::default()
        .with("example.com", "v=spf1 -all")
        .with("example.com", "v=spf1 ~all");
    let mut checker = checker(zone, Canned::new(Outcome::Info(String::new())));
    checker.selection = Selection::RejectMultiple;

    pretty_assertions::assert_eq!(
        checker.check("example.com").await,
        Report::MultipleRecords(2)
    );
}

#[test_log::test(tokio::test)]
async fn informational_outcome() {
    let zone = Zone::default().with("example.com", "v=spf1 -all");
    let checker = checker(
        zone,
        Canned::new(Outcome::Info("nothing to report".to_string())),
    );

    let report = checker.check("example.com").await;
    pretty_assertions::assert_eq!(render(&report), "nothing to report\n");
}
