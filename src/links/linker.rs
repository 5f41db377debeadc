//! Per-request link builder
//!
//! A [`Linker`] lives as long as the handling of one request. It turns
//! handler references into absolute URLs on the current request's host and
//! collects them into a link map the response can embed.

use crate::config::HypermediaConfig;
use crate::core::error::LinkError;
use crate::core::handler::HandlerRef;
use crate::core::link::ResolvedLink;
use crate::core::query::Query;
use crate::server::application::{HandlerTable, UrlSpec};
use crate::server::request::RequestContext;
use axum::http::Method;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Named values for the path parameters of a target pattern
///
/// Values are consumed by name; entries the pattern does not use are
/// ignored.
///
/// ```rust
/// use hypermedia::links::PathParams;
///
/// let params = PathParams::new().with("uid", 42).with("relation", "sister");
/// assert_eq!(params.get("uid"), Some("42"));
///
/// let same: PathParams = [("uid", "42"), ("relation", "sister")].into();
/// assert_eq!(params, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) -> Option<String> {
        self.values.insert(name.into(), value.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Remove and return the value for `name`
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for PathParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Builds and keeps the named links of one request
///
/// A request handler holds a `Linker` as a field, created from the shared
/// handler table and the context of the request it serves.
///
/// # Example
///
/// ```rust
/// use hypermedia::prelude::*;
/// use std::sync::Arc;
///
/// struct CommentHandler;
///
/// let app = Arc::new(Application::new(vec![
///     UrlSpec::to::<CommentHandler>(r"/comments/(?P<uid>\d+)").unwrap(),
/// ]));
/// let request = RequestContext::new("http", "10.0.0.1:8080", "/movie/1").unwrap();
///
/// let mut linker = Linker::new(app, request);
/// linker
///     .add_link(
///         "comments",
///         HandlerRef::of::<CommentHandler>(),
///         Method::GET,
///         None,
///         [("uid", 1)],
///     )
///     .unwrap();
///
/// assert_eq!(
///     linker.get_link_map()["comments"].url,
///     "http://10.0.0.1:8080/comments/1"
/// );
/// ```
#[derive(Debug)]
pub struct Linker<T: ?Sized> {
    table: Arc<T>,
    request: RequestContext,
    links: IndexMap<String, ResolvedLink>,
    unique_names: bool,
}

impl<T: HandlerTable + ?Sized> Linker<T> {
    pub fn new(table: Arc<T>, request: RequestContext) -> Self {
        Self {
            table,
            request,
            links: IndexMap::new(),
            unique_names: false,
        }
    }

    /// Like [`Linker::new`], honoring `config.unique_link_names`
    pub fn with_config(table: Arc<T>, request: RequestContext, config: &HypermediaConfig) -> Self {
        Self {
            unique_names: config.unique_link_names,
            ..Self::new(table, request)
        }
    }

    /// Add a link to the handler registered for the current host
    ///
    /// The URL takes the scheme, host, and port of the current request.
    /// When `query` is given it replaces the query string of the URL.
    ///
    /// # Errors
    ///
    /// - [`LinkError::HandlerNotFound`] when `handler` is not registered for
    ///   the current host
    /// - [`LinkError::MissingPathParameter`] when `params` lacks a named
    ///   parameter of the matched pattern
    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        handler: HandlerRef,
        method: Method,
        query: Option<&Query>,
        params: impl Into<PathParams>,
    ) -> Result<&ResolvedLink, LinkError> {
        let spec = self
            .table
            .find_spec(self.request.host(), &handler)
            .ok_or_else(|| LinkError::HandlerNotFound {
                handler,
                host: self.request.host().to_string(),
            })?;
        let path = build_path(spec, params.into())?;

        let base = self.request.full_url();
        let mut url = base.join(&path).map_err(|e| LinkError::InvalidUrl {
            url: path.clone(),
            message: e.to_string(),
        })?;
        if let Some(query) = query {
            rewrite_query(&mut url, query);
        }

        self.store(name.into(), ResolvedLink::new(method, url))
    }

    /// Add a link to an arbitrary URL
    ///
    /// The URL is stored as given unless `query` is supplied, in which case
    /// its query string is replaced.
    pub fn add_external_link(
        &mut self,
        name: impl Into<String>,
        method: Method,
        url: &str,
        query: Option<&Query>,
    ) -> Result<&ResolvedLink, LinkError> {
        let url = match query {
            Some(query) => {
                let mut parsed = Url::parse(url).map_err(|e| LinkError::InvalidUrl {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                rewrite_query(&mut parsed, query);
                String::from(parsed)
            }
            None => url.to_string(),
        };

        self.store(name.into(), ResolvedLink::new(method, url))
    }

    /// The links added so far
    pub fn get_link_map(&self) -> &IndexMap<String, ResolvedLink> {
        &self.links
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedLink> {
        self.links.get(name)
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Consume the linker, keeping its link map
    pub fn into_link_map(self) -> IndexMap<String, ResolvedLink> {
        self.links
    }

    fn store(&mut self, name: String, link: ResolvedLink) -> Result<&ResolvedLink, LinkError> {
        if self.links.contains_key(&name) {
            if self.unique_names {
                return Err(LinkError::DuplicateLink { link_name: name });
            }
            tracing::debug!(link = %name, "replacing existing link");
        }
        tracing::debug!(link = %name, method = %link.method, url = %link.url, "added link");

        let (index, _) = self.links.insert_full(name, link);
        Ok(&self.links[index])
    }
}

/// Fill the named groups of the spec's pattern from `params`
fn build_path(spec: &UrlSpec, mut params: PathParams) -> Result<String, LinkError> {
    let pattern = spec.pattern();
    let mut args: Vec<Option<String>> = vec![None; pattern.group_count()];

    for (name, index) in pattern.named_groups() {
        let value = params
            .take(name)
            .ok_or_else(|| LinkError::MissingPathParameter {
                parameter: name.to_string(),
                handler: spec.handler(),
            })?;
        args[index - 1] = Some(value);
    }

    Ok(pattern.reverse(&args)?)
}

/// Replace the query string of `url` and drop its fragment
fn rewrite_query(url: &mut Url, query: &Query) {
    let encoded = query.encode();
    url.set_fragment(None);
    url.set_query(if encoded.is_empty() {
        None
    } else {
        Some(&encoded)
    });
}
