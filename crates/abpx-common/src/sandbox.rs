use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::AbpxError;

/// An HTTP client capped to an allowlist of hosts.
/// Requests to any other host are refused before touching the network.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client that may only reach `hosts` (and their subdomains).
    pub fn new<S: AsRef<str>>(hosts: &[S], timeout: Duration) -> Result<Self, AbpxError> {
        let allowlist = hosts.iter().map(|h| h.as_ref().to_ascii_lowercase()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| AbpxError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Exposes the inner `reqwest::Client` builder for POST requests.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, AbpxError> {
        if !self.is_allowed(url) {
            return Err(AbpxError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SandboxClient {
        SandboxClient::new(&["api.esmatlas.com", "127.0.0.1"], Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_allowlisted_host_and_subdomain() {
        let c = client();
        assert!(c.is_allowed("https://api.esmatlas.com/foldSequence/v1/pdb/"));
        assert!(c.is_allowed("http://127.0.0.1:4000/fold"));
        assert!(!c.is_allowed("https://esmatlas.com.evil.example/"));
        assert!(!c.is_allowed("https://example.org/"));
        assert!(!c.is_allowed("not a url"));
    }

    #[test]
    fn test_refused_request_is_security_error() {
        let c = client();
        let err = c.post("https://example.org/fold").unwrap_err();
        assert!(matches!(err, AbpxError::Security(_)));
    }
}
