//! Notification value object.
//!
//! A notification carries a topic name, an optional kind tag and an opaque
//! body from a publisher to every subscriber of that topic. Subscribers only
//! ever see `&Notification`, so a notification cannot change while it is
//! being dispatched.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque payload carried by a notification.
///
/// The dispatch engine never inspects or owns the payload beyond the shared
/// reference; subscribers downcast it with [`Notification::body_as`].
pub type Body = Arc<dyn Any + Send + Sync>;

/// A named event published through the bus.
#[derive(Clone)]
pub struct Notification {
    name: String,
    kind: Option<String>,
    body: Option<Body>,
}

impl Notification {
    /// Create a bare notification with no body or kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            body: None,
        }
    }

    /// Attach a body.
    pub fn with_body<T: Any + Send + Sync>(mut self, body: T) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    /// Attach a kind tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Topic this notification is published under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = Some(kind.into());
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = Some(body);
    }

    /// Downcast the body to a concrete type.
    ///
    /// Returns `None` when there is no body or it holds a different type.
    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.as_ref().and_then(|b| b.downcast_ref::<T>())
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notification Name: {}\nType:{}",
            self.name,
            self.kind.as_deref().unwrap_or("")
        )
    }
}

impl From<&str> for Notification {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Notification {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
