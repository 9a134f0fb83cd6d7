// Location pipeline branch coverage with fake adapters

use std::sync::Arc;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use srvmon::core::network_identity::Sentinel;
use srvmon::ResolutionError;

use super::support::{record, resolver, FakeLocator, FakeResolver};

fn mountain_view() -> srvmon::core::LocationRecord {
    record("Mountain View", "United States", "US")
}

#[tokio::test]
async fn test_public_literal_skips_dns() {
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(FakeLocator::default().with("8.8.8.8", Ok(mountain_view())));
    let pipeline = resolver(dns.clone(), geo.clone(), None);

    let result = pipeline
        .resolve(Some("8.8.8.8"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(mountain_view()));
    assert_eq!(geo.calls(), vec!["8.8.8.8"]);
    assert!(dns.calls().is_empty());
}

#[tokio::test]
async fn test_private_address_uses_resolved_host_name() {
    let dns = Arc::new(FakeResolver::default().with("db1.example.net", Ok("8.8.8.8")));
    let geo = Arc::new(FakeLocator::default().with("8.8.8.8", Ok(mountain_view())));
    let pipeline = resolver(dns.clone(), geo.clone(), Some("db1.example.net"));

    let result = pipeline
        .resolve(Some("10.0.0.5"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(mountain_view()));
    assert_eq!(dns.calls(), vec!["db1.example.net"]);
    assert_eq!(geo.calls(), vec!["8.8.8.8"]);
}

#[tokio::test]
async fn test_private_address_with_literal_host_name() {
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(FakeLocator::default().with("93.184.216.34", Ok(mountain_view())));
    let pipeline = resolver(dns.clone(), geo.clone(), Some("93.184.216.34"));

    let result = pipeline
        .resolve(Some("192.168.1.20"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(mountain_view()));
    assert!(dns.calls().is_empty());
}

#[tokio::test]
async fn test_private_address_without_usable_host_name_is_dns_error() {
    for host_name in [None, Some(""), Some("127.0.1.1"), Some("10.1.1.1")] {
        let dns = Arc::new(FakeResolver::default());
        let geo = Arc::new(FakeLocator::default());
        let pipeline = resolver(dns.clone(), geo.clone(), host_name);

        let result = pipeline
            .resolve(Some("10.0.0.5"), &CancellationToken::new())
            .await;

        assert_eq!(result, Some(Sentinel::DnsError.record()), "{:?}", host_name);
        assert!(dns.calls().is_empty());
        assert!(geo.calls().is_empty());
    }
}

#[tokio::test]
async fn test_unresolvable_host_name_is_dns_error() {
    let dns = Arc::new(
        FakeResolver::default().with("db1.internal", Err(ResolutionError::dns("SERVFAIL"))),
    );
    let geo = Arc::new(FakeLocator::default());
    let pipeline = resolver(dns.clone(), geo.clone(), Some("db1.internal"));

    let result = pipeline
        .resolve(Some("172.20.0.2"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(Sentinel::DnsError.record()));
    assert!(geo.calls().is_empty());
}

#[tokio::test]
async fn test_public_name_is_resolved_first() {
    let dns = Arc::new(FakeResolver::default().with("play.example.net", Ok("203.0.113.9")));
    let geo = Arc::new(
        FakeLocator::default().with("203.0.113.9", Ok(record("Amsterdam", "Netherlands", "NL"))),
    );
    let pipeline = resolver(dns.clone(), geo.clone(), None);

    let result = pipeline
        .resolve(Some("play.example.net"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(record("Amsterdam", "Netherlands", "NL")));
    assert_eq!(dns.calls(), vec!["play.example.net"]);
}

#[tokio::test]
async fn test_failed_public_name_stops_before_geo_lookup() {
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(FakeLocator::default());
    let pipeline = resolver(dns.clone(), geo.clone(), None);

    let result = pipeline
        .resolve(Some("gone.example.net"), &CancellationToken::new())
        .await;

    assert_eq!(result, Some(Sentinel::DnsError.record()));
    assert!(geo.calls().is_empty());
}

#[tokio::test]
async fn test_geo_failures_map_to_sentinels() {
    let cases = [
        (ResolutionError::geo("HTTP 429"), Sentinel::GeoApiError),
        (ResolutionError::parse("location missing"), Sentinel::ParseError),
    ];

    for (error, sentinel) in cases {
        let dns = Arc::new(FakeResolver::default());
        let geo = Arc::new(FakeLocator::default().with("1.1.1.1", Err(error)));
        let pipeline = resolver(dns, geo, None);

        let result = pipeline
            .resolve(Some("1.1.1.1"), &CancellationToken::new())
            .await;

        assert_eq!(result, Some(sentinel.record()));
    }
}

#[tokio::test]
async fn test_ipv6_loopback_is_local_but_public_ipv6_needs_dns() {
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(FakeLocator::default());
    let pipeline = resolver(dns.clone(), geo.clone(), None);

    let result = pipeline.resolve(Some("::1"), &CancellationToken::new()).await;
    assert_eq!(result, Some(Sentinel::DnsError.record()));
    assert!(dns.calls().is_empty());

    let result = pipeline
        .resolve(Some("2001:db8::1"), &CancellationToken::new())
        .await;
    assert_eq!(result, Some(Sentinel::DnsError.record()));
    assert_eq!(dns.calls(), vec!["2001:db8::1"]);
}

#[tokio::test]
async fn test_no_address_produces_nothing() {
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(FakeLocator::default());
    let pipeline = resolver(dns.clone(), geo.clone(), Some("db1.example.net"));

    assert_eq!(pipeline.resolve(None, &CancellationToken::new()).await, None);
    assert!(dns.calls().is_empty());
    assert!(geo.calls().is_empty());
}

#[tokio::test]
async fn test_cancelled_run_produces_nothing() {
    let gate = Arc::new(Notify::new());
    let dns = Arc::new(FakeResolver::default());
    let geo = Arc::new(
        FakeLocator::default()
            .with("8.8.8.8", Ok(mountain_view()))
            .gated("8.8.8.8", gate),
    );
    let pipeline = resolver(dns, geo.clone(), None);

    let cancel = CancellationToken::new();
    let run = {
        let pipeline = pipeline.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { pipeline.resolve(Some("8.8.8.8"), &cancel).await })
    };

    while geo.calls().is_empty() {
        tokio::task::yield_now().await;
    }
    cancel.cancel();

    assert_eq!(run.await.unwrap(), None);
}
