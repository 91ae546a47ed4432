//! HTTP reachability probe
//!
//! Any HTTP response, whatever its status, means the network is up.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use crate::error::{ConnectivityError, ProbeErrorKind};
use crate::status::{NetworkState, NetworkStatus};
use crate::Result;

pub struct HttpProbe {
    client: reqwest::Client,
    target: Url,
    /// Budget for the whole check, fallback request included
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(target: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let target = Self::parse_target(target)?;

        let client = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConnectivityError::Client(e.to_string()))?;

        Ok(Self {
            client,
            target,
            timeout,
        })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    async fn send(&self) -> reqwest::Result<reqwest::Response> {
        // Some servers reject HEAD, retry with a one-byte GET
        match self.client.head(self.target.clone()).send().await {
            Ok(resp) => Ok(resp),
            Err(_) => {
                self.client
                    .get(self.target.clone())
                    .header(reqwest::header::RANGE, "bytes=0-0")
                    .send()
                    .await
            }
        }
    }

    fn parse_target(target: &str) -> Result<Url> {
        let parsed = Url::parse(target.trim())
            .map_err(|e| ConnectivityError::InvalidUrl(format!("{}: {}", target, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConnectivityError::InvalidUrl(format!(
                "{}: probe target must be http(s)",
                target
            )));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl NetworkStatus for HttpProbe {
    async fn network_state(&self) -> Result<NetworkState> {
        let response = match tokio::time::timeout(self.timeout, self.send()).await {
            Ok(response) => response,
            Err(_) => {
                return Err(ConnectivityError::Probe {
                    kind: ProbeErrorKind::Timeout,
                    message: format!("no answer within {}ms", self.timeout.as_millis()),
                })
            }
        };

        match response {
            Ok(resp) => {
                tracing::trace!(status = resp.status().as_u16(), url = %resp.url(), "Probe answered");
                Ok(NetworkState::connected())
            }
            Err(e) => {
                let message = e.to_string();
                let kind = classify(e.is_timeout(), e.is_connect(), e.is_request(), &message);
                Err(ConnectivityError::Probe { kind, message })
            }
        }
    }
}

fn classify(is_timeout: bool, is_connect: bool, is_request: bool, message: &str) -> ProbeErrorKind {
    if is_timeout {
        return ProbeErrorKind::Timeout;
    }

    if is_connect {
        let lowered = message.to_lowercase();
        if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("name") {
            return ProbeErrorKind::Dns;
        }
        if lowered.contains("tls")
            || lowered.contains("certificate")
            || lowered.contains("handshake")
        {
            return ProbeErrorKind::Tls;
        }
        return ProbeErrorKind::Connect;
    }

    if is_request {
        ProbeErrorKind::Request
    } else {
        ProbeErrorKind::Unknown
    }
}
