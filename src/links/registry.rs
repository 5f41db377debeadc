//! Route advertisement registry
//!
//! [`LinkMap`] wraps an application's route registration so a route can be
//! advertised under a name in the same call that registers it. Names are
//! unique for the lifetime of the map.

use crate::config::HypermediaConfig;
use crate::core::error::{AdvertisementError, ConfigError};
use crate::core::handler::HandlerRef;
use crate::core::link::AdvertisedLink;
use crate::core::method;
use crate::core::route::{RouteEntry, RouteRule};
use crate::server::route_map::RouteRegistrar;
use axum::http::Method;
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Maps hypermedia action names to registered routes
///
/// Every registration goes through [`LinkMap::add_url_rule`], which
/// forwards it to the wrapped registrar unchanged and then, when the rule
/// carries `advertise_as`, records the route under that name.
///
/// # Example
///
/// ```rust
/// use hypermedia::prelude::*;
///
/// fn simple() {}
///
/// let mut links = LinkMap::new(RouteMap::new());
/// links
///     .add_url_rule(
///         RouteRule::new("/simple")
///             .handler(HandlerRef::of_val(&simple))
///             .advertise_as("get-simple"),
///     )
///     .unwrap();
///
/// let link = links.lookup("get-simple").unwrap();
/// assert_eq!(link.method, Method::GET);
/// assert_eq!(link.route.endpoint, "simple");
/// ```
#[derive(Debug)]
pub struct LinkMap<A> {
    app: A,
    links: IndexMap<String, AdvertisedLink>,
    meta_methods: Vec<Method>,
}

impl<A: RouteRegistrar> LinkMap<A> {
    /// Wrap `app` with the default meta methods (`HEAD`, `OPTIONS`)
    pub fn new(app: A) -> Self {
        Self {
            app,
            links: IndexMap::new(),
            meta_methods: method::META_METHODS.to_vec(),
        }
    }

    /// Wrap `app` using the meta methods from `config`
    pub fn with_config(app: A, config: &HypermediaConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            app,
            links: IndexMap::new(),
            meta_methods: config.meta_methods()?,
        })
    }

    /// Register a route, advertising it when `advertise_as` is set
    ///
    /// The registrar's output is returned unchanged. When advertising
    /// fails the route stays registered; only the advertisement is
    /// rejected.
    pub fn add_url_rule(&mut self, mut rule: RouteRule) -> Result<A::Output, AdvertisementError> {
        let advertise_as = rule.advertise_as.take();
        let advertise_method = rule.advertise_method.take();
        let path = rule.path.clone();
        let endpoint = rule.endpoint.clone();
        let handler = rule.handler;

        let output = self.app.add_url_rule(rule);

        let Some(link_name) = advertise_as else {
            return Ok(output);
        };

        let route = self
            .find_registered(&path, endpoint.as_deref(), handler.as_ref())
            .cloned()
            .ok_or(AdvertisementError::RouteNotRegistered {
                path: Some(path),
                endpoint,
                handler,
            })?;

        let method = match advertise_method {
            Some(method) => method,
            None => self.infer_method(&route)?,
        };
        self.link_route(link_name, method, route)?;

        Ok(output)
    }

    /// Alias of [`LinkMap::add_url_rule`]
    pub fn route(&mut self, rule: RouteRule) -> Result<A::Output, AdvertisementError> {
        self.add_url_rule(rule)
    }

    /// Explicitly advertise one method of an already registered handler
    ///
    /// Intended for handlers serving several methods, where inference
    /// cannot pick one. The newest route bound to `handler` (and to
    /// `endpoint`, when given) is advertised with `method`.
    pub fn advertise(
        &mut self,
        link_name: impl Into<String>,
        method: Method,
        handler: HandlerRef,
        endpoint: Option<&str>,
    ) -> Result<&AdvertisedLink, AdvertisementError> {
        let route = self
            .app
            .routes()
            .iter()
            .rev()
            .find(|r| r.handler == Some(handler) && endpoint.is_none_or(|e| r.endpoint == e))
            .cloned()
            .ok_or_else(|| AdvertisementError::RouteNotRegistered {
                path: None,
                endpoint: endpoint.map(str::to_string),
                handler: Some(handler),
            })?;

        self.link_route(link_name.into(), method, route)
    }

    /// The link advertised as `link_name`
    pub fn lookup(&self, link_name: &str) -> Result<&AdvertisedLink, AdvertisementError> {
        self.links
            .get(link_name)
            .ok_or_else(|| AdvertisementError::NotAdvertised {
                link_name: link_name.to_string(),
            })
    }

    pub fn get(&self, link_name: &str) -> Option<&AdvertisedLink> {
        self.links.get(link_name)
    }

    pub fn contains(&self, link_name: &str) -> bool {
        self.links.contains_key(link_name)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Advertised links in advertisement order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdvertisedLink)> {
        self.links.iter().map(|(name, link)| (name.as_str(), link))
    }

    /// All advertised links
    pub fn links(&self) -> &IndexMap<String, AdvertisedLink> {
        &self.links
    }

    /// The wrapped application
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Mutable access to the wrapped application
    ///
    /// Routes registered directly through this reference are not
    /// advertised.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Unwrap the application, discarding the advertised links
    pub fn into_inner(self) -> A {
        self.app
    }

    /// Newest route matching the registration that was just made
    ///
    /// The endpoint decides when given, preferring a route whose handler
    /// also matches; otherwise the handler decides; otherwise the path.
    fn find_registered(
        &self,
        path: &str,
        endpoint: Option<&str>,
        handler: Option<&HandlerRef>,
    ) -> Option<&RouteEntry> {
        let routes = self.app.routes();
        let newest = |pred: &dyn Fn(&RouteEntry) -> bool| {
            let mut matching = routes.iter().rev().filter(|&r| pred(r));
            let first = matching.clone().find(|r| r.path == path);
            first.or_else(|| matching.next())
        };

        match (endpoint, handler) {
            (Some(endpoint), Some(handler)) => newest(&|r: &RouteEntry| {
                r.endpoint == endpoint && r.handler.as_ref() == Some(handler)
            })
            .or_else(|| newest(&|r: &RouteEntry| r.endpoint == endpoint)),
            (Some(endpoint), None) => newest(&|r: &RouteEntry| r.endpoint == endpoint),
            (None, Some(handler)) => newest(&|r: &RouteEntry| r.handler.as_ref() == Some(handler)),
            (None, None) => newest(&|r: &RouteEntry| r.path == path),
        }
    }

    /// The only non-meta method allowed on `route`
    fn infer_method(&self, route: &RouteEntry) -> Result<Method, AdvertisementError> {
        let mut candidates = route.methods_except(&self.meta_methods);
        if candidates.len() == 1 {
            Ok(candidates.remove(0))
        } else {
            Err(AdvertisementError::CannotDetermineMethod {
                route: route.clone(),
                candidates,
            })
        }
    }

    /// Validate `method` against `route` and record the link
    fn link_route(
        &mut self,
        link_name: String,
        method: Method,
        route: RouteEntry,
    ) -> Result<&AdvertisedLink, AdvertisementError> {
        if !route.allows(&method) {
            tracing::error!(
                link = %link_name,
                method = %method,
                route = %route,
                "cannot advertise a method the route does not allow"
            );
            return Err(AdvertisementError::MethodDoesNotExist { route, method });
        }

        match self.links.entry(link_name) {
            Entry::Occupied(existing) => Err(AdvertisementError::AlreadyAdvertised {
                failed_route: route,
                existing_route: existing.get().route.clone(),
                link_name: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    link = %slot.key(),
                    method = %method,
                    route = %route,
                    "advertised route"
                );
                Ok(slot.insert(AdvertisedLink { method, route }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::route_map::RouteMap;

    fn simple() {}
    fn make_it_simple() {}

    struct ItemView;

    fn link_map() -> LinkMap<RouteMap> {
        LinkMap::new(RouteMap::new())
    }

    #[test]
    fn test_rule_without_advertisement_is_only_registered() {
        let mut links = link_map();
        let entry = links.add_url_rule(RouteRule::new("/quiet")).unwrap();

        assert_eq!(entry.path, "/quiet");
        assert!(links.is_empty());
        assert_eq!(links.app().len(), 1);
    }

    #[test]
    fn test_advertisement_fields_are_not_forwarded() {
        struct Recorder {
            rules: Vec<RouteRule>,
            routes: Vec<RouteEntry>,
        }

        impl RouteRegistrar for Recorder {
            type Output = usize;

            fn add_url_rule(&mut self, rule: RouteRule) -> usize {
                self.routes.push(RouteEntry {
                    path: rule.path.clone(),
                    endpoint: rule.endpoint.clone().unwrap_or_default(),
                    handler: rule.handler,
                    methods: rule.methods.clone().unwrap_or_default(),
                });
                self.rules.push(rule);
                self.rules.len()
            }

            fn routes(&self) -> &[RouteEntry] {
                &self.routes
            }
        }

        let mut links = LinkMap::new(Recorder {
            rules: Vec::new(),
            routes: Vec::new(),
        });
        let output = links
            .add_url_rule(
                RouteRule::new("/recorded")
                    .endpoint("recorded")
                    .methods([Method::POST])
                    .option("strict_slashes", true)
                    .advertise_as("create"),
            )
            .unwrap();

        assert_eq!(output, 1);
        let forwarded = &links.app().rules[0];
        assert!(forwarded.advertise_as.is_none());
        assert!(forwarded.advertise_method.is_none());
        assert_eq!(forwarded.options.len(), 1);
        assert_eq!(links.lookup("create").unwrap().method, Method::POST);
    }

    #[test]
    fn test_handler_match_when_endpoint_omitted() {
        let mut links = link_map();
        links
            .add_url_rule(
                RouteRule::new("/simple")
                    .handler(HandlerRef::of_val(&simple))
                    .advertise_as("get-simple"),
            )
            .unwrap();
        links
            .add_url_rule(
                RouteRule::new("/simple")
                    .handler(HandlerRef::of_val(&make_it_simple))
                    .methods([Method::PUT])
                    .advertise_as("put-simple"),
            )
            .unwrap();

        assert_eq!(links.lookup("get-simple").unwrap().route.endpoint, "simple");
        let put = links.lookup("put-simple").unwrap();
        assert_eq!(put.method, Method::PUT);
        assert_eq!(put.route.endpoint, "make_it_simple");
    }

    #[test]
    fn test_endpoint_match_prefers_newest_route() {
        let mut links = link_map();
        links
            .add_url_rule(RouteRule::new("/v1/items").endpoint("items"))
            .unwrap();
        links
            .add_url_rule(
                RouteRule::new("/v2/items")
                    .endpoint("items")
                    .advertise_as("items"),
            )
            .unwrap();

        assert_eq!(links.lookup("items").unwrap().route.path, "/v2/items");
    }

    #[test]
    fn test_custom_meta_methods() {
        let config = HypermediaConfig {
            meta_methods: vec!["HEAD".to_string()],
            ..HypermediaConfig::default()
        };
        let mut links = LinkMap::with_config(RouteMap::new(), &config).unwrap();

        let err = links
            .add_url_rule(RouteRule::new("/x").advertise_as("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            AdvertisementError::CannotDetermineMethod { ref candidates, .. }
                if candidates == &vec![Method::GET, Method::OPTIONS]
        ));
    }

    #[test]
    fn test_advertise_class_based_view() {
        let mut links = link_map();
        links
            .add_url_rule(
                RouteRule::new("/items/<id>")
                    .handler(HandlerRef::of::<ItemView>())
                    .methods([Method::GET, Method::PUT, Method::DELETE]),
            )
            .unwrap();

        let link = links
            .advertise("delete-item", Method::DELETE, HandlerRef::of::<ItemView>(), None)
            .unwrap();
        assert_eq!(link.method, Method::DELETE);
        assert_eq!(link.route.endpoint, "ItemView");

        let err = links
            .advertise("patch-item", Method::PATCH, HandlerRef::of::<ItemView>(), None)
            .unwrap_err();
        assert!(matches!(err, AdvertisementError::MethodDoesNotExist { .. }));

        let err = links
            .advertise("delete-again", Method::DELETE, HandlerRef::of::<ItemView>(), Some("other"))
            .unwrap_err();
        match err {
            AdvertisementError::RouteNotRegistered {
                path,
                endpoint,
                handler,
            } => {
                assert_eq!(path, None);
                assert_eq!(endpoint.as_deref(), Some("other"));
                assert_eq!(handler, Some(HandlerRef::of::<ItemView>()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_advertise_rejects_duplicate_names() {
        let mut links = link_map();
        links
            .add_url_rule(
                RouteRule::new("/items")
                    .handler(HandlerRef::of::<ItemView>())
                    .methods([Method::GET, Method::POST])
                    .advertise_as("list-items")
                    .advertise_method(Method::GET),
            )
            .unwrap();

        let err = links
            .advertise("list-items", Method::POST, HandlerRef::of::<ItemView>(), None)
            .unwrap_err();
        assert!(matches!(err, AdvertisementError::AlreadyAdvertised { .. }));
        assert_eq!(links.lookup("list-items").unwrap().method, Method::GET);
    }

    #[test]
    fn test_lookup_unknown_name() {
        let links = link_map();
        let err = links.lookup("nope").unwrap_err();
        assert!(matches!(err, AdvertisementError::NotAdvertised { ref link_name } if link_name == "nope"));
        assert!(links.get("nope").is_none());
    }
}
