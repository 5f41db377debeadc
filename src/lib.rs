//! # Hypermedia
//!
//! Named hypermedia links for HTTP APIs. A link map pairs an action name
//! with the HTTP method and URL a client uses to perform it:
//!
//! ```json
//! {
//!     "relationships": {
//!         "method": "GET",
//!         "url": "http://example.com:8080/42/relationships"
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Route Advertisement**: advertise a route under a name while registering it
//! - **Method Inference**: the single non-meta method of a route is picked automatically
//! - **Reverse Resolution**: turn a handler plus path parameters back into a URL
//! - **Virtual Hosts**: links resolve against the routes of the current host
//! - **Query Rewriting**: replace the query string of any link
//!
//! ## Quick Start
//!
//! ```rust
//! use hypermedia::prelude::*;
//! use std::sync::Arc;
//!
//! struct PersonHandler;
//! struct SiblingHandler;
//!
//! let app = Arc::new(Application::new(vec![
//!     UrlSpec::to::<PersonHandler>(r"/(?P<uid>\d+)").unwrap(),
//!     UrlSpec::to::<SiblingHandler>(r"/(?P<uid>\d+)/siblings/(?P<relation>\w+)").unwrap(),
//! ]));
//!
//! // One linker per request
//! let request = RequestContext::new("http", "example.com", "/42").unwrap();
//! let mut linker = Linker::new(app, request);
//!
//! linker
//!     .add_link(
//!         "sisters",
//!         HandlerRef::of::<SiblingHandler>(),
//!         Method::GET,
//!         None,
//!         PathParams::new().with("uid", 42).with("relation", "sister"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     linker.get("sisters").unwrap().url,
//!     "http://example.com/42/siblings/sister"
//! );
//! ```

pub mod config;
pub mod core;
pub mod links;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        error::{
            AdvertisementError, ConfigError, ErrorResponse, HypermediaError, LinkError,
            PatternError,
        },
        handler::HandlerRef,
        link::{AdvertisedLink, ResolvedLink},
        query::{Query, QueryValue},
        route::{RouteEntry, RouteRule},
    };

    // === Link Registries ===
    pub use crate::links::{LinkMap, Linker, PathParams};

    // === Config ===
    pub use crate::config::HypermediaConfig;

    // === Server ===
    pub use crate::server::{
        Application, HandlerTable, HostGroup, HostPattern, RequestContext, RouteMap,
        RouteRegistrar, UrlPattern, UrlSpec,
    };

    // === External dependencies ===
    pub use axum::http::Method;
    pub use indexmap::IndexMap;
}
