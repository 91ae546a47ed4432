//! Home URL and home-domain checks

use url::Url;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct HomeScope {
    /// Home URL exactly as configured
    raw: String,
    parsed: Url,
    /// Lowercased host of the home URL
    host: String,
}

impl HomeScope {
    pub fn new(home_url: &str) -> Result<Self> {
        let raw = home_url.trim().to_string();
        let parsed =
            Url::parse(&raw).map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", raw, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NavigationError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let host = parsed
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .ok_or_else(|| NavigationError::InvalidUrl(format!("{}: missing host", raw)))?;

        Ok(Self { raw, parsed, host })
    }

    pub fn home_url(&self) -> &str {
        &self.raw
    }

    pub fn home_host(&self) -> &str {
        &self.host
    }

    /// Whether `url` is the home resource.
    ///
    /// `https://site.app` and `https://site.app/` are the same page; surfaces
    /// usually report the latter.
    pub fn is_home(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(parsed) => parsed == self.parsed,
            Err(_) => url.trim() == self.raw,
        }
    }

    /// Host is the home host or one of its subdomains
    pub fn is_on_home_domain(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => {
                    let host = host.to_ascii_lowercase();
                    host == self.host || host.ends_with(&format!(".{}", self.host))
                }
                None => false,
            },
            Err(_) => url.contains(&self.host),
        }
    }

    pub fn is_blank(url: &str) -> bool {
        url.trim_start().starts_with("about:blank")
    }

    /// Left the home domain for something other than a blank placeholder
    pub fn is_drift(&self, url: &str) -> bool {
        !url.trim().is_empty() && !Self::is_blank(url) && !self.is_on_home_domain(url)
    }
}
