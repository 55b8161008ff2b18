//! Resolution registry
//!
//! Process-wide mapping from a component kind (a Rust type) to a
//! zero-argument factory. Kinds register once during startup, as
//! component types are defined; steady-state operation only reads.
//! Re-registration overwrites, so test code can swap a kind for a mock.
//!
//! Every [`resolve`] call invokes the factory fresh. The registry never
//! caches instances: a resolved repository carries no state from a
//! previous unit of work, and discovers its session lazily from whichever
//! unit invokes it. Factories therefore must not capture a session.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use tracing::debug;
use uwk_domain::error::{Error, Result};

struct RegistryEntry {
    kind_name: &'static str,
    factory: Box<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>,
}

static PROVIDERS: LazyLock<RwLock<HashMap<TypeId, Arc<RegistryEntry>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Register a factory for the component kind `T`
///
/// Last registration for a kind wins. Factories must be stateless: they
/// run once per [`resolve`] call and must not register further kinds.
pub fn register<T, F>(factory: F)
where
    T: Any + Send,
    F: Fn() -> T + Send + Sync + 'static,
{
    let entry = RegistryEntry {
        kind_name: type_name::<T>(),
        factory: Box::new(move || Box::new(factory())),
    };
    PROVIDERS
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(TypeId::of::<T>(), Arc::new(entry));
    debug!(kind = type_name::<T>(), "component kind registered");
}

/// Resolve a fresh instance of the component kind `T`
///
/// Fails with `UnregisteredKind` naming `T` when no factory exists.
pub fn resolve<T: Any + Send>() -> Result<T> {
    let entry = PROVIDERS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(&TypeId::of::<T>())
        .cloned()
        .ok_or_else(|| Error::unregistered_kind(type_name::<T>()))?;
    // The factory runs outside the lock, so resolving is reentrant.
    let instance = (entry.factory)();
    instance
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::unregistered_kind(entry.kind_name))
}

/// Whether a factory is registered for `T`
pub fn is_registered<T: Any>() -> bool {
    PROVIDERS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(&TypeId::of::<T>())
}
