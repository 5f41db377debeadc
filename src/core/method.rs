//! HTTP method helpers shared by both link registries

use axum::http::Method;
use serde::Serializer;
use serde::ser::SerializeSeq;

/// Methods that never take part in automatic method inference
///
/// `HEAD` and `OPTIONS` are answered by the framework on behalf of a route,
/// so they are not the action a link advertises.
pub const META_METHODS: [Method; 2] = [Method::HEAD, Method::OPTIONS];

/// Parse a method name, normalizing it to upper case
///
/// Returns `None` when the name is not a valid HTTP token.
pub fn parse(name: &str) -> Option<Method> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Method::from_bytes(name.to_ascii_uppercase().as_bytes()).ok()
}

/// Serialize a [`Method`] as its verb string
pub fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// Serialize a list of methods as verb strings
pub fn serialize_all<S: Serializer>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(methods.len()))?;
    for method in methods {
        seq.serialize_element(method.as_str())?;
    }
    seq.end()
}

/// Comma separated verb list, used in diagnostics
pub fn join(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
