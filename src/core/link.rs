//! Link values stored in the registries

use crate::core::method;
use crate::core::route::RouteEntry;
use axum::http::Method;
use serde::Serialize;

/// A route advertised through a [`LinkMap`](crate::links::LinkMap)
///
/// Serializes as `{"method": "GET", "route": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvertisedLink {
    /// The HTTP method the action is advertised with
    #[serde(serialize_with = "method::serialize")]
    pub method: Method,

    /// The route the action resolves to
    pub route: RouteEntry,
}

/// A fully built link produced by a [`Linker`](crate::links::Linker)
///
/// Serializes as `{"method": "GET", "url": "http://..."}`, the shape a
/// response body embeds directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    /// The HTTP method for the link
    #[serde(serialize_with = "method::serialize")]
    pub method: Method,

    /// Absolute URL
    pub url: String,
}

impl ResolvedLink {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }
}
