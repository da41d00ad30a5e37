//! Chaining, short-circuit and header assertions over buffered responses.

use bytes::Bytes;
use dokimos::{AssertionError, BufferedResponse, Checker, Response, Scope};
use proptest::prelude::*;

/// Creates a buffered response with the given status, headers and body.
fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> BufferedResponse<Scope> {
    let mut builder = http::Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let raw = builder.body(Bytes::from_static(body.as_bytes())).unwrap();
    Response::from_bytes(Scope::collecting(), raw)
}

#[test]
fn assertions_return_the_same_inspector() {
    let mut response = response(200, &[("x-id", "1")], "ok");

    let before: *const BufferedResponse<Scope> = &response;
    let after: *const BufferedResponse<Scope> = response.status(200).header("x-id", "1").text("ok");

    assert!(std::ptr::eq(before, after));
    assert!(!response.checker().failed());
}

#[test]
fn first_failure_is_the_only_failure() {
    dokimos_telemetry::init_test_logging();

    let mut response = response(404, &[("x-id", "1")], "missing");

    response
        .status(200)
        .header("x-id", "2")
        .text("found")
        .no_content();

    assert_eq!(
        response.checker().failures(),
        vec![AssertionError::mismatch(&200_u16, &404_u16)]
    );
}

#[test]
fn clones_of_a_scope_share_short_circuit() {
    let scope = Scope::collecting();
    let raw = http::Response::builder()
        .status(500)
        .body(Bytes::new())
        .unwrap();
    let mut response = Response::from_bytes(scope.clone(), raw);

    scope.fail(AssertionError::message("setup failed"));
    response.status(200);

    assert_eq!(scope.failures().len(), 1);
}

#[test]
fn headers_exact_match() {
    let mut response = response(
        200,
        &[("Content-Type", "text/plain"), ("X-Tag", "a"), ("X-Tag", "b")],
        "",
    );

    response.headers([("content-type", vec!["text/plain"]), ("X-TAG", vec!["a", "b"])]);
    assert!(!response.checker().failed());
}

#[test]
fn headers_missing_name_fails() {
    let mut response = response(200, &[("x-a", "1"), ("x-b", "2")], "");
    response.headers([("x-a", vec!["1"])]);
    assert_eq!(response.checker().failures()[0].kind(), "mismatch");
}

#[test]
fn headers_extra_name_fails() {
    let mut response = response(200, &[("x-a", "1")], "");
    response.headers([("x-a", vec!["1"]), ("x-b", vec!["2"])]);
    assert!(response.checker().failed());
}

#[test]
fn headers_value_order_matters() {
    let mut response = response(200, &[("x-tag", "a"), ("x-tag", "b")], "");
    response.headers([("x-tag", vec!["b", "a"])]);
    assert!(response.checker().failed());
}

#[test]
fn headers_empty_value_list_never_matches() {
    let mut present = response(200, &[("x-a", "1")], "");
    present.headers([("x-a", Vec::<&str>::new())]);
    assert!(present.checker().failed());

    let mut absent = response(200, &[], "");
    absent.headers([("x-a", Vec::<&str>::new())]);
    assert!(absent.checker().failed());
}

#[test]
fn headers_empty_expectation_on_bare_response() {
    let mut response = response(200, &[], "");
    response.headers(Vec::<(&str, Vec<&str>)>::new());
    assert!(!response.checker().failed());
}

#[test]
fn no_content_passes_on_empty_response() {
    let mut response = response(204, &[], "");
    response.status(204).no_content();
    assert!(!response.checker().failed());
}

#[test]
fn no_content_fails_on_body() {
    let mut response = response(200, &[], "surprise");
    response.no_content();

    let failures = response.checker().failures();
    assert_eq!(failures, vec![AssertionError::mismatch("", "surprise")]);
}

#[test]
fn no_content_fails_on_content_type() {
    let mut response = response(200, &[("content-type", "text/plain")], "");
    response.no_content();

    let failures = response.checker().failures();
    assert_eq!(failures, vec![AssertionError::mismatch("", "text/plain")]);
}

#[test]
fn no_content_reports_both_problems() {
    let mut response = response(200, &[("content-type", "text/plain")], "hi");
    response.no_content();
    assert_eq!(response.checker().failures().len(), 2);
}

#[test]
fn text_can_be_asserted_repeatedly() {
    let mut response = response(200, &[], "hello");
    response.text("hello").text("hello");
    assert!(!response.checker().failed());
    assert_eq!(response.body(), Bytes::from_static(b"hello"));
}

#[test]
fn content_type_checks_media_then_charset() {
    let mut ok = response(200, &[("content-type", "text/html; charset=UTF-8")], "");
    ok.content_type("text/html", "utf-8");
    assert!(!ok.checker().failed());

    let mut wrong_media = response(200, &[("content-type", "text/html; charset=latin1")], "");
    wrong_media.content_type("text/plain", "utf-8");
    let failures = wrong_media.checker().failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), "mismatch");

    let mut wrong_charset = response(200, &[("content-type", "text/html; charset=latin1")], "");
    wrong_charset.content_type("text/html", "utf-8");
    assert_eq!(
        wrong_charset.checker().failures(),
        vec![AssertionError::charset("utf-8", "latin1")]
    );
}

proptest! {
    #[test]
    fn status_chain_reports_at_most_once(expected in prop::collection::vec(100_u16..600, 1..12)) {
        let mut response = response(200, &[], "");
        for status in &expected {
            response.status(*status);
        }

        let mismatches = usize::from(expected.iter().any(|s| *s != 200));
        prop_assert_eq!(response.checker().failures().len(), mismatches);
    }

    #[test]
    fn header_value_round_trips(value in "[a-zA-Z0-9]{1,24}") {
        let raw = http::Response::builder()
            .header("x-value", value.as_str())
            .body(Bytes::new())
            .unwrap();
        let mut response = Response::from_bytes(Scope::collecting(), raw);

        response.header("X-Value", &value).headers([("x-value", vec![value.as_str()])]);
        prop_assert!(!response.checker().failed());
    }
}
