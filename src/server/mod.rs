//! Host framework seams
//!
//! This module provides the capability traits the link registries consume,
//! along with in-memory implementations:
//! - [`RouteRegistrar`] / [`RouteMap`] for route advertisement
//! - [`HandlerTable`] / [`Application`] for per-request link building
//! - [`RequestContext`] describing the request being handled

pub mod application;
pub mod pattern;
pub mod request;
pub mod route_map;

pub use application::{Application, HandlerTable, HostGroup, UrlSpec};
pub use pattern::{HostPattern, UrlPattern};
pub use request::RequestContext;
pub use route_map::{RouteMap, RouteRegistrar};
