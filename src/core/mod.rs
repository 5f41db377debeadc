//! Core module containing the value types shared by both link registries

pub mod error;
pub mod handler;
pub mod link;
pub mod method;
pub mod query;
pub mod route;

pub use error::{AdvertisementError, HypermediaError, LinkError, PatternError};
pub use handler::HandlerRef;
pub use link::{AdvertisedLink, ResolvedLink};
pub use query::{Query, QueryValue};
pub use route::{RouteEntry, RouteRule};
