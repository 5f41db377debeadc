//! Route registration seam
//!
//! [`RouteRegistrar`] is the one capability a [`LinkMap`](crate::links::LinkMap)
//! needs from an application: a way to add routes and a read-only view of
//! the routes added so far. [`RouteMap`] is an in-memory registrar with the
//! conventions of Flask's `url_map`.

use crate::core::route::{RouteEntry, RouteRule};
use axum::http::Method;

/// Something routes can be registered with
pub trait RouteRegistrar {
    /// Whatever the registration call returns to its caller
    type Output;

    /// Register a route
    fn add_url_rule(&mut self, rule: RouteRule) -> Self::Output;

    /// Registered routes, oldest first
    fn routes(&self) -> &[RouteEntry];
}

impl<R: RouteRegistrar + ?Sized> RouteRegistrar for Box<R> {
    type Output = R::Output;

    fn add_url_rule(&mut self, rule: RouteRule) -> Self::Output {
        (**self).add_url_rule(rule)
    }

    fn routes(&self) -> &[RouteEntry] {
        (**self).routes()
    }
}

/// In-memory route table
///
/// Registration follows Flask's defaults:
/// - methods default to `GET`
/// - `HEAD` is allowed whenever `GET` is
/// - `OPTIONS` is allowed on every route unless the rule sets the
///   `provide_automatic_options` option to `false`
/// - the endpoint defaults to the handler's short name, then to the path
#[derive(Debug, Default)]
pub struct RouteMap {
    routes: Vec<RouteEntry>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteRegistrar for RouteMap {
    type Output = RouteEntry;

    fn add_url_rule(&mut self, rule: RouteRule) -> RouteEntry {
        let endpoint = rule
            .endpoint
            .or_else(|| rule.handler.map(|h| h.short_name().to_string()))
            .unwrap_or_else(|| rule.path.clone());

        let mut methods: Vec<Method> = Vec::new();
        for method in rule.methods.unwrap_or_else(|| vec![Method::GET]) {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
        let automatic_options = rule
            .options
            .get("provide_automatic_options")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if automatic_options && !methods.contains(&Method::OPTIONS) {
            methods.push(Method::OPTIONS);
        }

        let entry = RouteEntry {
            path: rule.path,
            endpoint,
            handler: rule.handler,
            methods,
        };
        tracing::debug!(route = %entry, "registered route");

        self.routes.push(entry.clone());
        entry
    }

    fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handler::HandlerRef;

    fn simple() {}

    #[test]
    fn test_defaults_to_get_with_meta_methods() {
        let mut map = RouteMap::new();
        let entry = map.add_url_rule(RouteRule::new("/simple").handler(HandlerRef::of_val(&simple)));

        assert_eq!(entry.endpoint, "simple");
        assert_eq!(entry.methods, vec![Method::GET, Method::HEAD, Method::OPTIONS]);
        assert_eq!(map.routes(), &[entry]);
    }

    #[test]
    fn test_explicit_methods() {
        let mut map = RouteMap::new();
        let entry = map.add_url_rule(
            RouteRule::new("/simple")
                .endpoint("make_it_simple")
                .methods([Method::PUT, Method::PUT]),
        );

        assert_eq!(entry.methods, vec![Method::PUT, Method::OPTIONS]);
    }

    #[test]
    fn test_automatic_options_can_be_disabled() {
        let mut map = RouteMap::new();
        let entry = map.add_url_rule(
            RouteRule::new("/raw")
                .methods([Method::POST])
                .option("provide_automatic_options", false),
        );

        assert_eq!(entry.methods, vec![Method::POST]);
    }

    #[test]
    fn test_endpoint_falls_back_to_path() {
        let mut map = RouteMap::new();
        let entry = map.add_url_rule(RouteRule::new("/anonymous"));
        assert_eq!(entry.endpoint, "/anonymous");
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }
}
