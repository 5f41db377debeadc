//! The request a link map is being built for
//!
//! Links are made absolute against the current request, so a
//! [`RequestContext`] carries the request host (used to pick the virtual
//! host) and the full request URL (used as the join base).

use crate::config::HypermediaConfig;
use crate::core::error::LinkError;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, Uri, header};
use url::Url;

/// Host and absolute URL of the request being handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    host: String,
    full_url: Url,
}

impl RequestContext {
    /// Build from the request scheme, `Host` value, and request target
    ///
    /// ```rust
    /// use hypermedia::server::RequestContext;
    ///
    /// let request = RequestContext::new("http", "10.0.0.1:8080", "/movie/1").unwrap();
    /// assert_eq!(request.host(), "10.0.0.1:8080");
    /// assert_eq!(request.full_url().as_str(), "http://10.0.0.1:8080/movie/1");
    /// ```
    pub fn new(scheme: &str, host: &str, uri: &str) -> Result<Self, LinkError> {
        let raw = format!("{scheme}://{host}{uri}");
        let full_url = Url::parse(&raw).map_err(|e| LinkError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            host: host.to_string(),
            full_url,
        })
    }

    /// Build from an absolute URL; the host includes an explicit port
    pub fn from_url(full_url: Url) -> Result<Self, LinkError> {
        let host = match (full_url.host_str(), full_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(LinkError::InvalidUrl {
                    url: full_url.to_string(),
                    message: "URL has no host".to_string(),
                });
            }
        };
        Ok(Self { host, full_url })
    }

    /// Build from the head of an incoming HTTP request
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority. The scheme comes from the URI, falling back to
    /// `config.default_scheme`.
    pub fn from_request_parts(parts: &Parts, config: &HypermediaConfig) -> Result<Self, LinkError> {
        Self::from_head(&parts.headers, &parts.uri, config)
    }

    /// Same as [`RequestContext::from_request_parts`] for a whole request
    pub fn from_request<B>(request: &Request<B>, config: &HypermediaConfig) -> Result<Self, LinkError> {
        Self::from_head(request.headers(), request.uri(), config)
    }

    fn from_head(headers: &HeaderMap, uri: &Uri, config: &HypermediaConfig) -> Result<Self, LinkError> {
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
            .ok_or_else(|| LinkError::InvalidUrl {
                url: uri.to_string(),
                message: "request has no host".to_string(),
            })?;
        let scheme = uri.scheme_str().unwrap_or(&config.default_scheme);
        let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

        Self::new(scheme, &host, target)
    }

    /// Request host, including the port when one was sent
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Absolute request URL
    pub fn full_url(&self) -> &Url {
        &self.full_url
    }
}
