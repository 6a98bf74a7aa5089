//! Edge case tests for dd-net

use dd_net::{Credentials, Fetcher, HttpFetcher, MemoryFetcher, Method, NetError, Request, Response};
use std::time::Duration;

// ============================================================================
// REQUESTS
// ============================================================================

#[test]
fn test_request_keeps_query_and_fragment() {
    let req = Request::get("https://example.com/page?a=1#top").unwrap();
    assert_eq!(req.url.query(), Some("a=1"));
    assert_eq!(req.url.fragment(), Some("top"));
}

#[test]
fn test_request_rejects_garbage() {
    assert!(matches!(Request::get(""), Err(NetError::InvalidUrl(_))));
    assert!(matches!(Request::get("http://"), Err(NetError::InvalidUrl(_))));
}

#[test]
fn test_headers_keep_insertion_order() {
    let req = Request::get("https://example.com")
        .unwrap()
        .with_header("X-B", "2")
        .with_header("X-A", "1");
    let names: Vec<_> = req.headers.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["X-B", "X-A"]);
}

// ============================================================================
// RESPONSES
// ============================================================================

#[test]
fn test_non_success_statuses() {
    assert!(!Response::new(301, "").is_success());
    assert!(!Response::new(500, "").is_success());
    assert!(Response::new(204, "").is_success());
    assert_eq!(Response::new(500, "").status_text, "Internal Server Error");
}

#[test]
fn test_missing_header() {
    assert_eq!(Response::new(200, "").header("etag"), None);
}

// ============================================================================
// MEMORY FETCHER
// ============================================================================

#[test]
fn test_request_log_records_credentials() {
    let fetcher = MemoryFetcher::new();
    let req = Request::get("https://example.com/private")
        .unwrap()
        .with_credentials(Credentials::new("alice", "s3cret"));
    fetcher.fetch(&req).unwrap();

    let seen = fetcher.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::Get);
    assert_eq!(seen[0].credentials, Some(Credentials::new("alice", "s3cret")));
}

#[test]
fn test_wrong_credentials_unauthorized() {
    let fetcher = MemoryFetcher::new();
    fetcher.route_protected(
        "https://example.com/private",
        Credentials::new("alice", "s3cret"),
        Response::new(200, "ok"),
    );
    let req = Request::get("https://example.com/private")
        .unwrap()
        .with_credentials(Credentials::new("alice", "wrong"));
    let res = fetcher.fetch(&req).unwrap();
    assert_eq!(res.status, 401);
    assert_eq!(res.status_text, "Unauthorized");
}

#[test]
fn test_fetcher_as_trait_object() {
    let memory = MemoryFetcher::new();
    memory.route("https://example.com/", Response::new(200, "home"));
    let fetcher: Box<dyn Fetcher> = Box::new(memory.clone());

    let res = fetcher.fetch(&Request::get("https://example.com").unwrap()).unwrap();
    assert_eq!(res.text().unwrap(), "home");
    assert_eq!(memory.requests().len(), 1);
}

// ============================================================================
// HTTP FETCHER
// ============================================================================

#[test]
fn test_unreachable_host_is_error() {
    let fetcher = HttpFetcher::new("dd-test", Duration::from_millis(200)).unwrap();
    // Port 9 on loopback is almost never listening
    let result = fetcher.fetch(&Request::get("http://127.0.0.1:9/").unwrap());
    assert!(matches!(result, Err(NetError::Network(_)) | Err(NetError::Timeout(_))));
}
