//! Handler tables grouped by virtual host
//!
//! A [`HandlerTable`] is what a [`Linker`](crate::links::Linker) searches to
//! turn a handler into a URL. [`Application`] is the in-memory table,
//! arranged the way Tornado's `web.Application` arranges its handlers.

use crate::core::error::PatternError;
use crate::core::handler::HandlerRef;
use crate::server::pattern::{HostPattern, UrlPattern};

/// A URL pattern bound to the handler that serves it
#[derive(Debug, Clone)]
pub struct UrlSpec {
    pattern: UrlPattern,
    handler: HandlerRef,
}

impl UrlSpec {
    pub fn new(pattern: &str, handler: HandlerRef) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: UrlPattern::new(pattern)?,
            handler,
        })
    }

    /// Bind handler type `H` to `pattern`
    pub fn to<H: ?Sized + 'static>(pattern: &str) -> Result<Self, PatternError> {
        Self::new(pattern, HandlerRef::of::<H>())
    }

    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    pub fn handler(&self) -> HandlerRef {
        self.handler
    }
}

/// The URL specs that apply to hosts matching one pattern
#[derive(Debug, Clone)]
pub struct HostGroup {
    pub host: HostPattern,
    pub specs: Vec<UrlSpec>,
}

/// Read access to URL specs grouped by virtual host
pub trait HandlerTable {
    /// Host groups in the order they are consulted
    fn host_groups(&self) -> &[HostGroup];

    /// First spec for `handler` among the groups matching `host`
    ///
    /// Groups are visited in order and skipped when their host pattern does
    /// not match; within a group the first spec bound to `handler` wins. A
    /// handler registered only under non-matching hosts is not found.
    fn find_spec(&self, host: &str, handler: &HandlerRef) -> Option<&UrlSpec> {
        self.host_groups()
            .iter()
            .filter(|group| group.host.matches(host))
            .flat_map(|group| group.specs.iter())
            .find(|spec| spec.handler == *handler)
    }
}

/// In-memory handler table
///
/// Specs passed to [`Application::new`] form the catch-all host group.
/// Groups added later with [`Application::add_handlers`] are consulted in
/// the order they were added, but always ahead of a trailing catch-all
/// group, so a virtual host can take precedence over the defaults.
///
/// # Example
///
/// ```rust
/// use hypermedia::server::{Application, HandlerTable, UrlSpec};
/// use hypermedia::core::HandlerRef;
///
/// struct CommentHandler;
///
/// let mut app = Application::new(vec![
///     UrlSpec::to::<CommentHandler>(r"/comments/(?P<uid>\d+)").unwrap(),
/// ]);
/// app.add_handlers(
///     r"65\.199\.32\.155",
///     vec![UrlSpec::to::<CommentHandler>(r"/google/(?P<uid>\d+)").unwrap()],
/// )
/// .unwrap();
///
/// let handler = HandlerRef::of::<CommentHandler>();
/// let spec = app.find_spec("65.199.32.155", &handler).unwrap();
/// assert_eq!(spec.pattern().as_str(), r"/google/(?P<uid>\d+)$");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Application {
    groups: Vec<HostGroup>,
}

impl Application {
    pub fn new(specs: Vec<UrlSpec>) -> Self {
        let mut groups = Vec::new();
        if !specs.is_empty() {
            groups.push(HostGroup {
                host: HostPattern::any(),
                specs,
            });
        }
        Self { groups }
    }

    /// Register `specs` for hosts matching `host_pattern`
    pub fn add_handlers(
        &mut self,
        host_pattern: &str,
        specs: Vec<UrlSpec>,
    ) -> Result<&mut Self, PatternError> {
        let group = HostGroup {
            host: HostPattern::new(host_pattern)?,
            specs,
        };

        let catch_all_last = self
            .groups
            .last()
            .is_some_and(|last| last.host.is_catch_all());
        if catch_all_last {
            let at = self.groups.len() - 1;
            self.groups.insert(at, group);
        } else {
            self.groups.push(group);
        }
        Ok(self)
    }
}

impl HandlerTable for Application {
    fn host_groups(&self) -> &[HostGroup] {
        &self.groups
    }
}
