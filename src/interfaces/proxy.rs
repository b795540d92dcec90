//! Proxy interface.

/// Named model object held by the proxy store.
pub trait Proxy: Send + Sync {
    /// Store key.
    fn name(&self) -> &str;

    /// Called after the proxy is stored.
    fn on_register(&self) {}

    /// Called after the proxy is removed from the store.
    fn on_remove(&self) {}
}
