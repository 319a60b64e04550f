//! Client metadata extraction from HTTP requests.

use axum::http::{HeaderMap, header};
use std::net::{IpAddr, SocketAddr};

/// Resolves the client IP address for visit analytics.
///
/// When `behind_proxy` is set, the first valid address in `X-Forwarded-For`
/// wins, then `X-Real-IP`; otherwise (or if neither header parses) the socket
/// peer address is used. Proxy headers are ignored when not behind a proxy
/// because any client can forge them.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
/// let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
///
/// assert_eq!(client_ip(&headers, peer, true), "203.0.113.7");
/// assert_eq!(client_ip(&headers, peer, false), "10.0.0.1");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .and_then(parse_ip);

        if let Some(ip) = forwarded.or_else(|| header_str(headers, "x-real-ip").and_then(parse_ip))
        {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Returns the `User-Agent` header if present and valid UTF-8.
pub fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok())
}

/// Returns the `Referer` header if present and valid UTF-8.
pub fn referrer(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::REFERER).and_then(|v| v.to_str().ok())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.trim().parse().ok()
}
