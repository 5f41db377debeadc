//! Handler identity
//!
//! Route tables refer to the code that serves a route (a view function or
//! a handler type). [`HandlerRef`] gives those a comparable identity without
//! requiring the handler itself to be stored.

use serde::{Serialize, Serializer};
use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a request handler
///
/// Two references are equal when they were created from the same Rust type.
/// Function items have a unique type each, so `HandlerRef::of_val(&my_view)`
/// identifies a single view function.
///
/// # Example
///
/// ```rust
/// use hypermedia::core::HandlerRef;
///
/// struct CommentHandler;
/// fn list_comments() {}
///
/// let handler = HandlerRef::of::<CommentHandler>();
/// assert_eq!(handler.short_name(), "CommentHandler");
///
/// let view = HandlerRef::of_val(&list_comments);
/// assert_eq!(view.short_name(), "list_comments");
/// assert_ne!(handler, view);
/// ```
#[derive(Clone, Copy)]
pub struct HandlerRef {
    id: TypeId,
    type_name: &'static str,
}

impl HandlerRef {
    /// Reference the handler type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Reference the type of `value`, typically a function item
    pub fn of_val<T: 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Fully qualified Rust type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, without generic arguments
    ///
    /// This is the name a route registrar falls back to when a route is
    /// registered without an explicit endpoint.
    pub fn short_name(&self) -> &'static str {
        let base = match self.type_name.find('<') {
            Some(pos) => &self.type_name[..pos],
            None => self.type_name,
        };
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandlerRef {}

impl Hash for HandlerRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRef({})", self.type_name)
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

impl Serialize for HandlerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name)
    }
}
