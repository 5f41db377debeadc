//! Route registration values
//!
//! [`RouteRule`] is what a caller asks a registrar to add; [`RouteEntry`] is
//! what the registrar's route table holds afterwards.

use crate::core::handler::HandlerRef;
use crate::core::method;
use axum::http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A route registration request
///
/// Besides the usual registration fields, a rule may carry the two
/// advertisement fields `advertise_as` and `advertise_method`. They are
/// consumed by [`LinkMap`](crate::links::LinkMap) and never reach the
/// underlying registrar.
///
/// # Example
///
/// ```rust
/// use hypermedia::core::{HandlerRef, RouteRule};
/// use axum::http::Method;
///
/// fn update_movie() {}
///
/// let rule = RouteRule::new("/movie/<int:uid>")
///     .handler(HandlerRef::of_val(&update_movie))
///     .methods([Method::PUT])
///     .advertise_as("update-movie");
///
/// assert_eq!(rule.advertise_as.as_deref(), Some("update-movie"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteRule {
    /// Path pattern in the registrar's own syntax
    pub path: String,

    /// Symbolic endpoint name; the registrar picks one when omitted
    pub endpoint: Option<String>,

    /// Handler serving the route
    pub handler: Option<HandlerRef>,

    /// Allowed methods; the registrar applies its default when omitted
    pub methods: Option<Vec<Method>>,

    /// Registrar specific options, forwarded untouched
    pub options: Map<String, Value>,

    /// Name to advertise the route as
    pub advertise_as: Option<String>,

    /// Method to advertise, when it cannot be inferred
    pub advertise_method: Option<Method>,
}

impl RouteRule {
    /// Create a rule for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn advertise_as(mut self, name: impl Into<String>) -> Self {
        self.advertise_as = Some(name.into());
        self
    }

    pub fn advertise_method(mut self, method: Method) -> Self {
        self.advertise_method = Some(method);
        self
    }
}

/// A route as recorded in a registrar's route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Path pattern
    pub path: String,

    /// Endpoint name
    pub endpoint: String,

    /// Handler bound to the route, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<HandlerRef>,

    /// Allowed methods, including the meta methods the registrar added
    #[serde(serialize_with = "method::serialize_all")]
    pub methods: Vec<Method>,
}

impl RouteEntry {
    /// Whether `method` is allowed on this route
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Allowed methods minus `excluded`
    pub fn methods_except(&self, excluded: &[Method]) -> Vec<Method> {
        self.methods
            .iter()
            .filter(|m| !excluded.contains(m))
            .cloned()
            .collect()
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Route '{}' ({}) -> {}>",
            self.path,
            method::join(&self.methods),
            self.endpoint
        )
    }
}
