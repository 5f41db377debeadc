//! Typed error handling for the hypermedia link registries
//!
//! Every failure is reported synchronously to the immediate caller. Nothing
//! is retried, and a failed advertisement never rolls back the route
//! registration that preceded it.
//!
//! # Error Categories
//!
//! - [`AdvertisementError`]: advertising a route through a `LinkMap`
//! - [`LinkError`]: building a link with a `Linker`
//! - [`PatternError`]: compiling or reversing URL patterns
//! - [`ConfigError`]: loading and validating configuration
//!
//! # Example
//!
//! ```rust,ignore
//! match link_map.add_url_rule(rule) {
//!     Ok(entry) => println!("registered {}", entry),
//!     Err(AdvertisementError::CannotDetermineMethod { route, candidates }) => {
//!         eprintln!("{} needs an explicit advertise_method ({:?})", route, candidates);
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use crate::core::handler::HandlerRef;
use crate::core::method;
use crate::core::route::RouteEntry;
use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Root error type of the crate
///
/// Wraps the category errors so callers that do not care about the exact
/// failure can funnel everything through one type.
#[derive(Debug, Error)]
pub enum HypermediaError {
    /// Route advertisement failed
    #[error(transparent)]
    Advertisement(#[from] AdvertisementError),

    /// Link building failed
    #[error(transparent)]
    Link(#[from] LinkError),

    /// URL or host pattern failure
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HypermediaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HypermediaError::Advertisement(e) => e.status_code(),
            HypermediaError::Link(e) => e.status_code(),
            HypermediaError::Pattern(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HypermediaError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            HypermediaError::Advertisement(e) => e.error_code(),
            HypermediaError::Link(e) => e.error_code(),
            HypermediaError::Pattern(e) => e.error_code(),
            HypermediaError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            HypermediaError::Advertisement(AdvertisementError::AlreadyAdvertised {
                failed_route,
                existing_route,
                link_name,
            }) => Some(serde_json::json!({
                "link_name": link_name,
                "failed_route": failed_route,
                "existing_route": existing_route,
            })),
            HypermediaError::Link(LinkError::MissingPathParameter { parameter, handler }) => {
                Some(serde_json::json!({
                    "parameter": parameter,
                    "handler": handler,
                }))
            }
            HypermediaError::Link(LinkError::HandlerNotFound { handler, host }) => {
                Some(serde_json::json!({
                    "handler": handler,
                    "host": host,
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for HypermediaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Advertisement Errors
// =============================================================================

/// A route could not be advertised
///
/// Raised by [`LinkMap`](crate::links::LinkMap). The route involved has
/// already been registered with the underlying registrar when any of these
/// is returned; only the advertisement is rejected.
#[derive(Debug, Clone, Error)]
pub enum AdvertisementError {
    /// No single method can be inferred for the route
    ///
    /// Supply `advertise_method` explicitly.
    #[error(
        "cannot determine which method to advertise for {route} (candidates: [{}])",
        method::join(.candidates)
    )]
    CannotDetermineMethod {
        route: RouteEntry,
        candidates: Vec<Method>,
    },

    /// The requested method is not allowed on the route
    #[error("method {method} is not allowed on {route}")]
    MethodDoesNotExist { route: RouteEntry, method: Method },

    /// The link name is already taken
    #[error("cannot advertise {failed_route} as '{link_name}': already advertised by {existing_route}")]
    AlreadyAdvertised {
        failed_route: RouteEntry,
        existing_route: RouteEntry,
        link_name: String,
    },

    /// No registered route matches the registration that was just made
    #[error(
        "no registered route matches (path: {}, endpoint: {}, handler: {})",
        .path.as_deref().unwrap_or("-"),
        .endpoint.as_deref().unwrap_or("-"),
        .handler.map(|h| h.type_name()).unwrap_or("-")
    )]
    RouteNotRegistered {
        path: Option<String>,
        endpoint: Option<String>,
        handler: Option<HandlerRef>,
    },

    /// Lookup of a name that was never advertised
    #[error("no link advertised as '{link_name}'")]
    NotAdvertised { link_name: String },
}

impl AdvertisementError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdvertisementError::NotAdvertised { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AdvertisementError::CannotDetermineMethod { .. } => "CANNOT_DETERMINE_METHOD",
            AdvertisementError::MethodDoesNotExist { .. } => "METHOD_DOES_NOT_EXIST",
            AdvertisementError::AlreadyAdvertised { .. } => "ALREADY_ADVERTISED",
            AdvertisementError::RouteNotRegistered { .. } => "ROUTE_NOT_REGISTERED",
            AdvertisementError::NotAdvertised { .. } => "LINK_NOT_ADVERTISED",
        }
    }

    /// The route whose advertisement failed, when there is one
    pub fn failed_route(&self) -> Option<&RouteEntry> {
        match self {
            AdvertisementError::CannotDetermineMethod { route, .. }
            | AdvertisementError::MethodDoesNotExist { route, .. } => Some(route),
            AdvertisementError::AlreadyAdvertised { failed_route, .. } => Some(failed_route),
            _ => None,
        }
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// A link could not be built
///
/// These are programmer errors inside a request handler and surface as
/// `500 Internal Server Error`.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// The target handler is not registered for the current host
    #[error("failed to locate handler for {handler} on host '{host}'")]
    HandlerNotFound { handler: HandlerRef, host: String },

    /// A named path parameter of the target pattern was not supplied
    #[error("path parameter '{parameter}' omitted for {handler}")]
    MissingPathParameter {
        parameter: String,
        handler: HandlerRef,
    },

    /// The target pattern cannot be reversed
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A URL could not be parsed or joined
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A link name was reused while unique link names are enforced
    #[error("link '{link_name}' already exists")]
    DuplicateLink { link_name: String },
}

impl LinkError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LinkError::HandlerNotFound { .. } => "HANDLER_NOT_FOUND",
            LinkError::MissingPathParameter { .. } => "MISSING_PATH_PARAMETER",
            LinkError::Pattern(e) => e.error_code(),
            LinkError::InvalidUrl { .. } => "INVALID_URL",
            LinkError::DuplicateLink { .. } => "DUPLICATE_LINK",
        }
    }
}

// =============================================================================
// Pattern Errors
// =============================================================================

/// URL and host pattern failures
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The pattern is not a valid regular expression
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// The pattern is too complex to build a path from
    #[error("pattern '{pattern}' cannot be reversed")]
    NotReversible { pattern: String },

    /// Wrong number of positional arguments for reversing
    #[error("pattern '{pattern}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        pattern: String,
        expected: usize,
        actual: usize,
    },

    /// A capture group had no value when reversing
    #[error("pattern '{pattern}' has no value for group {index}")]
    MissingArgument { pattern: String, index: usize },
}

impl PatternError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PatternError::InvalidRegex { .. } => "INVALID_PATTERN",
            PatternError::NotReversible { .. } => "PATTERN_NOT_REVERSIBLE",
            PatternError::ArgumentCount { .. } => "PATTERN_ARGUMENT_COUNT",
            PatternError::MissingArgument { .. } => "PATTERN_MISSING_ARGUMENT",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error while reading configuration
    #[error("failed to read config file '{path}': {message}")]
    Io { path: String, message: String },

    /// Failed to parse configuration
    #[error("failed to parse config: {message}")]
    Parse { message: String },

    /// A method name in the configuration is not a valid HTTP method
    #[error("invalid HTTP method '{method}' in config")]
    InvalidMethod { method: String },

    /// The default scheme is not usable in a URL
    #[error("invalid default scheme '{scheme}' in config")]
    InvalidScheme { scheme: String },
}
