//! Whole-crate integration tests: a mocked pDNS HTTP endpoint exercised
//! through the real backend adapters, transport, and query engine.

use std::rc::Rc;

use dnsdbq_backend::Backend;
use dnsdbq_backend::{CirclBackend, DnsdbBackend};
use dnsdbq_engine::{Framing, TransportConfig, Writer, build_client, run_batch, run_query};
use dnsdbq_present::{OutputFormat, Presenter, TimeFormat};
use dnsdbq_types::{QueryDescriptor, QueryMode, QueryParams, Verb};
use tokio::sync::Mutex as AsyncMutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn saf_body() -> String {
    [
        r#"{"cond":"begin"}"#,
        r#"{"cond":"ongoing","obj":{"rrname":"www.example.com.","rrtype":"A","rdata":"93.184.216.34","time_first":1,"time_last":2,"count":5}}"#,
        r#"{"cond":"succeeded"}"#,
    ]
    .join("\n")
}

#[tokio::test]
async fn dnsdb_backend_lookup_dispatches_one_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dnsdb/v2/lookup/rrset/name/www.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(saf_body()))
        .mount(&server)
        .await;

    let mut backend = DnsdbBackend::default();
    backend.setval("apikey", "test-key").unwrap();
    backend.setval("server", &server.uri()).unwrap();

    let client = build_client(&TransportConfig::default()).unwrap();
    let descriptor = QueryDescriptor::new(QueryMode::RrsetByName, "www.example.com").unwrap();
    let params = QueryParams::default();

    let presenter = Presenter::new(OutputFormat::Json { datefix: false }, TimeFormat::Unix, Verb::Lookup, QueryMode::RrsetByName);
    let writer = Writer::new(presenter, -1, None).unwrap();
    let shared = Rc::new(AsyncMutex::new(writer));

    let outcome = run_query(&client, &backend, &descriptor, &params, Verb::Lookup, &shared, false)
        .await
        .unwrap();

    assert!(!outcome.exit_code_nonzero);
    assert_eq!(outcome.status.as_deref(), Some("noerror"));

    let writer = Rc::try_unwrap(shared).unwrap().into_inner();
    assert_eq!(writer.accepted_count(), 1);
    writer.finish().await.unwrap();
}

#[tokio::test]
async fn dnsdb_backend_saf_failed_forces_nonzero_exit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dnsdb/v2/lookup/rrset/name/bad.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"cond":"failed","msg":"backend exploded"}"#))
        .mount(&server)
        .await;

    let mut backend = DnsdbBackend::default();
    backend.setval("apikey", "test-key").unwrap();
    backend.setval("server", &server.uri()).unwrap();

    let client = build_client(&TransportConfig::default()).unwrap();
    let descriptor = QueryDescriptor::new(QueryMode::RrsetByName, "bad.example.com").unwrap();
    let params = QueryParams::default();

    let presenter = Presenter::new(OutputFormat::Text, TimeFormat::Unix, Verb::Lookup, QueryMode::RrsetByName);
    let writer = Writer::new(presenter, -1, None).unwrap();
    let shared = Rc::new(AsyncMutex::new(writer));

    let outcome = run_query(&client, &backend, &descriptor, &params, Verb::Lookup, &shared, false)
        .await
        .unwrap();

    assert!(outcome.exit_code_nonzero);
    assert_eq!(outcome.message.as_deref(), Some("backend exploded"));
}

#[tokio::test]
async fn circl_backend_rejects_summarize_before_any_http_call() {
    let server = MockServer::start().await;
    // No mocks mounted: a request reaching the server at all is a test failure.
    let mut backend = CirclBackend::default();
    backend.setval("server", &server.uri()).unwrap();

    let client = build_client(&TransportConfig::default()).unwrap();
    let descriptor = QueryDescriptor::new(QueryMode::RrsetByName, "example.com").unwrap();
    let params = QueryParams::default();

    let presenter = Presenter::new(OutputFormat::Text, TimeFormat::Unix, Verb::Summarize, QueryMode::RrsetByName);
    let writer = Writer::new(presenter, -1, None).unwrap();
    let shared = Rc::new(AsyncMutex::new(writer));

    let result = run_query(&client, &backend, &descriptor, &params, Verb::Summarize, &shared, false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn batch_runs_each_line_against_its_own_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dnsdb/v2/lookup/rrset/name/a.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(saf_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dnsdb/v2/lookup/rrset/name/b.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(saf_body()))
        .mount(&server)
        .await;

    let mut backend = DnsdbBackend::default();
    backend.setval("apikey", "test-key").unwrap();
    backend.setval("server", &server.uri()).unwrap();

    let client = build_client(&TransportConfig::default()).unwrap();
    let lines = vec![
        "rrset/name/a.example.com".to_string(),
        "rrset/name/b.example.com".to_string(),
    ];

    let any_error = run_batch(
        lines,
        &client,
        &backend,
        QueryParams::default(),
        Verb::Lookup,
        Framing::None,
        false,
        || {
            let presenter = Presenter::new(OutputFormat::Json { datefix: false }, TimeFormat::Unix, Verb::Lookup, QueryMode::RrsetByName);
            Writer::new(presenter, -1, None)
        },
        false,
    )
    .await
    .unwrap();

    assert!(!any_error);
}

#[tokio::test]
async fn batch_options_line_overrides_verb_for_subsequent_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dnsdb/v2/summarize/rrset/name/a.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"cond":"succeeded"}"#))
        .mount(&server)
        .await;

    let mut backend = DnsdbBackend::default();
    backend.setval("apikey", "test-key").unwrap();
    backend.setval("server", &server.uri()).unwrap();

    let client = build_client(&TransportConfig::default()).unwrap();
    let lines = vec!["$options -V summarize".to_string(), "rrset/name/a.example.com".to_string()];

    let any_error = run_batch(
        lines,
        &client,
        &backend,
        QueryParams::default(),
        Verb::Lookup,
        Framing::None,
        false,
        || {
            let presenter = Presenter::new(OutputFormat::Json { datefix: false }, TimeFormat::Unix, Verb::Lookup, QueryMode::RrsetByName);
            Writer::new(presenter, -1, None)
        },
        false,
    )
    .await
    .unwrap();

    assert!(!any_error);
}
