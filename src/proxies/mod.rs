//! Named proxy store.
//!
//! Plain name -> proxy CRUD. The dispatch core never calls into this store;
//! only the facade forwards to it.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::interfaces::Proxy;

/// Name used when a proxy is created with an empty name.
pub const DEFAULT_PROXY_NAME: &str = "Proxy";

/// Name -> proxy map with lifecycle hooks.
#[derive(Default)]
pub struct ProxyStore {
    proxies: RwLock<HashMap<String, Arc<dyn Proxy>>>,
}

impl ProxyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a proxy under its name, replacing any previous one.
    ///
    /// Returns the replaced proxy. `on_register` runs after the store lock
    /// is released.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> Option<Arc<dyn Proxy>> {
        let name = proxy.name().to_string();
        let previous = self.proxies.write().insert(name.clone(), Arc::clone(&proxy));

        info!(
            proxy.name = %name,
            replaced = previous.is_some(),
            "Registered proxy"
        );

        proxy.on_register();
        previous
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxies.read().get(name).cloned()
    }

    /// Remove a proxy. `on_remove` runs on the removed instance.
    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        let removed = self.proxies.write().remove(name)?;

        info!(proxy.name = %name, "Removed proxy");

        removed.on_remove();
        Some(removed)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxies.read().contains_key(name)
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.read().len()
    }
}

/// General-purpose proxy holding a named opaque data slot.
pub struct DataProxy {
    name: String,
    data: RwLock<Option<Arc<dyn Any + Send + Sync>>>,
}

impl DataProxy {
    /// Create an empty proxy. An empty name falls back to [`DEFAULT_PROXY_NAME`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                DEFAULT_PROXY_NAME.to_string()
            } else {
                name
            },
            data: RwLock::new(None),
        }
    }

    pub fn with_data<T: Any + Send + Sync>(self, data: T) -> Self {
        self.set_data(data);
        self
    }

    pub fn set_data<T: Any + Send + Sync>(&self, data: T) {
        *self.data.write() = Some(Arc::new(data));
    }

    pub fn data(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.data.read().clone()
    }

    /// Typed view of the data slot.
    pub fn data_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.data().and_then(|data| data.downcast::<T>().ok())
    }
}

impl Proxy for DataProxy {
    fn name(&self) -> &str {
        &self.name
    }
}
