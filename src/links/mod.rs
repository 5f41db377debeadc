//! Link management module
//!
//! Two registries for named hypermedia links:
//! - [`LinkMap`] advertises routes as they are registered with an application
//! - [`Linker`] builds absolute links while a single request is handled

pub mod linker;
pub mod registry;

pub use linker::{Linker, PathParams};
pub use registry::LinkMap;
