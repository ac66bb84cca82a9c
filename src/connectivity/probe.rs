//! HTTP-based public IP probe
//!
//! Queries an "echo my IP" endpoint returning `{"ip": "..."}` to learn the
//! address the rest of the internet sees for this machine.

use super::types::{ProbeError, ProbeResult};
use crate::storage::MonitorConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One attempt to determine the current public IP address
///
/// Implementations never panic or return early through other channels:
/// every failure is represented in the returned [`ProbeResult`].
#[async_trait]
pub trait IpProbe: Send + Sync {
    /// Perform a single lookup
    async fn probe(&self) -> ProbeResult;
}

/// Body returned by the IP echo endpoint
#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: String,
}

/// Decode an IP echo response body
///
/// # Errors
///
/// Returns `ProbeError::Parse` if the body is not JSON with an `ip` string
/// field, or if that field is not a valid IPv4/IPv6 address.
pub fn parse_ip_response(body: &str) -> Result<IpAddr, ProbeError> {
    let echo: IpEcho = serde_json::from_str(body)
        .map_err(|e| ProbeError::Parse(format!("Invalid JSON body: {}", e)))?;

    let ip_str = echo.ip.trim();
    ip_str
        .parse::<IpAddr>()
        .map_err(|_| ProbeError::Parse(format!("Not an IP address: {:?}", ip_str)))
}

/// Probe backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpIpProbe {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIpProbe {
    /// Create a probe for `endpoint` with the given transport timeout
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Network` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                ProbeError::Network(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a probe around an already configured client
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Create a probe from monitor configuration
    pub fn from_config(config: &MonitorConfig) -> Result<Self, ProbeError> {
        Self::new(config.endpoint_url.clone(), config.request_timeout)
    }

    /// Endpoint this probe queries
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IpProbe for HttpIpProbe {
    async fn probe(&self) -> ProbeResult {
        debug!("Probing public IP via {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                debug!("Failed to query {}: {}", self.endpoint, e);
                ProbeError::Network(e.to_string())
            })?;

        let body = response.text().await.map_err(|e| {
            debug!("Failed to read response from {}: {}", self.endpoint, e);
            ProbeError::Network(format!("Failed to read body: {}", e))
        })?;

        match parse_ip_response(&body) {
            Ok(ip) => {
                info!("Public IP detected: {} (from {})", ip, self.endpoint);
                Ok(ip)
            }
            Err(e) => {
                debug!("Invalid IP response from {}: {}", self.endpoint, body.trim());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_ipv4_response() {
        let ip = parse_ip_response(r#"{"ip":"203.0.113.7"}"#).unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)));
    }

    #[test]
    fn test_parse_ipv6_response() {
        let ip = parse_ip_response(r#"{"ip": "2001:db8::1"}"#).unwrap();
        assert!(ip.is_ipv6());
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        // Plain-text services like icanhazip are not JSON
        let result = parse_ip_response("203.0.113.7\n");
        assert!(matches!(result, Err(ProbeError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_non_ip_field() {
        let result = parse_ip_response(r#"{"ip":"not-an-ip"}"#);
        assert!(matches!(result, Err(ProbeError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let result = parse_ip_response(r#"{"address":"203.0.113.7"}"#);
        assert!(matches!(result, Err(ProbeError::Parse(_))));
    }
}
