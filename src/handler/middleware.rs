use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    middleware::Next,
    response::Response,
};
use http::Request;
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tracing::info;

const CLIENT_IP_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Plivo and browsers both arrive through the tunnel, so proxy headers are
/// checked before the socket address.
fn client_ip(req: &Request<Body>) -> String {
    for header in CLIENT_IP_HEADERS {
        if let Some(value) = req.headers().get(header) {
            if let Ok(ip) = value.to_str() {
                // X-Forwarded-For may carry a comma-separated chain
                let first_ip = ip.split(',').next().unwrap_or(ip).trim();
                return first_ip.to_string();
            }
        }
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    "-".to_string()
}

fn should_skip_logging(path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(prefix) = pattern.strip_suffix('*') {
            path.starts_with(prefix)
        } else {
            path == pattern
        }
    })
}

/// Logs request metadata once the downstream handler returns.
pub async fn log_requests(
    State(skip_paths): State<Arc<Vec<String>>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().to_string();
    let request_path = req.uri().path().to_string();
    let client_ip = client_ip(&req);

    let response = next.run(req).await;

    let status = response.status();
    let cost_ms = started_at.elapsed().as_secs_f64() * 1_000.0;

    if !should_skip_logging(&request_path, skip_paths.as_slice()) {
        info!(
            target: "http.access",
            method = method.as_str(),
            status = status.as_u16(),
            cost_ms = cost_ms,
            uri = uri.as_str(),
            client_ip = client_ip.as_str(),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_skip_logging() {
        let patterns = vec!["/static*".to_string(), "/health".to_string()];
        assert!(should_skip_logging("/health", &patterns));
        assert!(should_skip_logging("/static/index.html", &patterns));
        assert!(should_skip_logging("/static", &patterns));
        assert!(!should_skip_logging("/make-call", &patterns));
        assert!(!should_skip_logging("/ivr/welcome", &patterns));
        assert!(!should_skip_logging("/healthz", &patterns));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let req = Request::builder()
            .uri("/ivr/welcome")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_connect_info() {
        let mut req = Request::builder()
            .uri("/ivr/welcome")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 8080))));
        assert_eq!(client_ip(&req), "127.0.0.1");

        let bare = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_ip(&bare), "-");
    }
}
