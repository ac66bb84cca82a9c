// HTTP probe tests against a local hyper server standing in for the IP echo endpoint

use crate::connectivity::{HttpIpProbe, IpProbe, ProbeError};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `body` with `status` to every request
async fn serve(status: StatusCode, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let io = TokioIo::new(stream);
            tokio::spawn(async move {
                let service = service_fn(move |_req: Request<Incoming>| async move {
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("content-type", "application/json")
                            .body(Full::new(Bytes::from(body)))
                            .unwrap(),
                    )
                });
                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    addr
}

/// Accept connections but never answer
async fn serve_silently() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}

fn probe_for(addr: SocketAddr, timeout: Duration) -> HttpIpProbe {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap();
    HttpIpProbe::with_client(client, format!("http://{}/?format=json", addr))
}

#[tokio::test]
async fn test_probe_returns_ip_from_json() {
    let addr = serve(StatusCode::OK, r#"{"ip":"203.0.113.10"}"#).await;
    let probe = probe_for(addr, Duration::from_secs(5));

    let ip = probe.probe().await.unwrap();

    assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10)));
}

#[tokio::test]
async fn test_probe_reports_parse_error_for_garbage() {
    let addr = serve(StatusCode::OK, "<html>captive portal</html>").await;
    let probe = probe_for(addr, Duration::from_secs(5));

    let result = probe.probe().await;

    assert!(matches!(result, Err(ProbeError::Parse(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_probe_reports_network_error_for_server_error() {
    let addr = serve(StatusCode::SERVICE_UNAVAILABLE, r#"{"ip":"203.0.113.10"}"#).await;
    let probe = probe_for(addr, Duration::from_secs(5));

    let result = probe.probe().await;

    assert!(matches!(result, Err(ProbeError::Network(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_probe_reports_network_error_for_closed_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let probe = probe_for(addr, Duration::from_secs(5));
    let result = probe.probe().await;

    assert!(matches!(result, Err(ProbeError::Network(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_probe_reports_network_error_on_timeout() {
    let addr = serve_silently().await;
    let probe = probe_for(addr, Duration::from_millis(200));

    let result = probe.probe().await;

    assert!(matches!(result, Err(ProbeError::Network(_))), "got {:?}", result);
}

#[test]
fn test_probe_from_config_uses_endpoint() {
    let config = crate::storage::MonitorConfig::default();
    let probe = HttpIpProbe::from_config(&config).unwrap();

    assert_eq!(probe.endpoint(), "https://api64.ipify.org?format=json");
}
