//! HTTP fetcher over a blocking reqwest client

use crate::{Fetcher, Method, NetError, Request, Response};
use std::time::Duration;

/// Fetcher that talks to the network
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a client sending `user_agent` and giving up after `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            timeout,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, e: reqwest::Error) -> NetError {
        if e.is_timeout() {
            NetError::Timeout(self.timeout)
        } else {
            NetError::Network(e.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        tracing::debug!(method = %request.method, url = %request.url, "fetching from network");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.user, Some(&credentials.password));
        }

        let response = builder.send().map_err(|e| self.map_error(e))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().map_err(|e| self.map_error(e))?.to_vec();

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpFetcher::new("dd-test/1.0", Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.user_agent(), "dd-test/1.0");
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(Method::Options), reqwest::Method::OPTIONS);
    }
}
