// DoH and geo adapters against a local HTTP server

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use srvmon::core::network_identity::{
    DohResolver, GeoLocator, IpApiLocator, LocalIdentityProvider, LocationResolver,
    NameResolver, Sentinel, StaticIdentity,
};
use srvmon::ResolutionError;

use super::support::record;

const TIMEOUT: Duration = Duration::from_secs(5);

type Route = fn(&str) -> (u16, &'static str);

/// Serve one canned response per request until the test ends.
/// `route` receives the request target, path plus query.
async fn serve(route: Route) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::spawn(respond(stream, route));
        }
    });

    (base, handle)
}

async fn respond(mut stream: TcpStream, route: Route) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&request);
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let (status, body) = route(&target);

    let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

/// An address nothing listens on
async fn refused_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

fn daemon(target: &str) -> (u16, &'static str) {
    if target.starts_with("/dns-query") {
        if target.contains("name=play.example.net") {
            return (
                200,
                r#"{"Status":0,"Answer":[{"name":"play.example.net.","type":1,"data":"203.0.113.7"}]}"#,
            );
        }
        return (500, "{}");
    }

    if target.starts_with("/geo") {
        if target.contains("q=203.0.113.7") || target.contains("q=8.8.8.8") {
            return (
                200,
                r#"{"ip":"8.8.8.8","location":{"city":"Mountain View","country":"United States","country_code":"US"}}"#,
            );
        }
        return (200, r#"{"error":"rate limited"}"#);
    }

    (404, "")
}

fn pipeline(base: &str) -> LocationResolver {
    let dns = DohResolver::new(&format!("{}/dns-query", base), TIMEOUT).unwrap();
    let geo = IpApiLocator::new(&format!("{}/geo/", base), TIMEOUT).unwrap();
    let identity: Arc<dyn LocalIdentityProvider> = Arc::new(StaticIdentity(None));
    LocationResolver::new(Arc::new(dns), Arc::new(geo), identity)
}

#[tokio::test]
async fn test_doh_resolves_first_answer() {
    let (base, server) = serve(daemon).await;
    let dns = DohResolver::new(&format!("{}/dns-query", base), TIMEOUT).unwrap();

    let address = dns
        .resolve_host("play.example.net", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(address, "203.0.113.7");

    server.abort();
}

#[tokio::test]
async fn test_doh_server_error_is_dns_failure() {
    let (base, server) = serve(|_| (500, "oops")).await;
    let dns = DohResolver::new(&format!("{}/dns-query", base), TIMEOUT).unwrap();

    match dns
        .resolve_host("play.example.net", &CancellationToken::new())
        .await
    {
        Err(ResolutionError::DnsFailed(msg)) => assert!(msg.starts_with("HTTP 500"), "{}", msg),
        other => panic!("unexpected result: {:?}", other),
    }

    server.abort();
}

#[tokio::test]
async fn test_doh_refused_connection_is_dns_failure() {
    let dns = DohResolver::new(&format!("{}/dns-query", refused_base().await), TIMEOUT).unwrap();

    let result = dns
        .resolve_host("play.example.net", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(ResolutionError::DnsFailed(_))), "{:?}", result);
}

#[tokio::test]
async fn test_geo_body_without_ip_is_lookup_failure() {
    let (base, server) = serve(daemon).await;
    let geo = IpApiLocator::new(&format!("{}/geo/", base), TIMEOUT).unwrap();

    let result = geo.lookup("1.1.1.1", &CancellationToken::new()).await;
    assert!(
        matches!(result, Err(ResolutionError::GeoLookupFailed(_))),
        "{:?}",
        result
    );

    server.abort();
}

#[tokio::test]
async fn test_geo_server_error_is_lookup_failure() {
    let (base, server) = serve(|_| (503, "")).await;
    let geo = IpApiLocator::new(&format!("{}/geo/", base), TIMEOUT).unwrap();

    match geo.lookup("8.8.8.8", &CancellationToken::new()).await {
        Err(ResolutionError::GeoLookupFailed(msg)) => assert!(msg.starts_with("HTTP 503"), "{}", msg),
        other => panic!("unexpected result: {:?}", other),
    }

    server.abort();
}

#[tokio::test]
async fn test_geo_refused_connection_is_lookup_failure() {
    let geo = IpApiLocator::new(&format!("{}/geo/", refused_base().await), TIMEOUT).unwrap();

    let result = geo.lookup("8.8.8.8", &CancellationToken::new()).await;
    assert!(
        matches!(result, Err(ResolutionError::GeoLookupFailed(_))),
        "{:?}",
        result
    );
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let (base, server) = serve(daemon).await;
    let pipeline = pipeline(&base);
    let cancel = CancellationToken::new();
    let mountain_view = record("Mountain View", "United States", "US");

    // Literal goes straight to the geo lookup
    assert_eq!(
        pipeline.resolve(Some("8.8.8.8"), &cancel).await,
        Some(mountain_view.clone())
    );

    // Host name goes through DoH first
    assert_eq!(
        pipeline.resolve(Some("play.example.net"), &cancel).await,
        Some(mountain_view)
    );

    assert_eq!(
        pipeline.resolve(Some("down.example.net"), &cancel).await,
        Some(Sentinel::DnsError.record())
    );

    assert_eq!(
        pipeline.resolve(Some("1.1.1.1"), &cancel).await,
        Some(Sentinel::GeoApiError.record())
    );

    server.abort();
}
