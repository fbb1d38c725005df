//! The registry itself: a name-to-entry mapping plus a resolution cache.
//!
//! Resolution follows three rules, decided per entry:
//!
//! - default: the resolver runs once, the produced value is cached and every
//!   later `get` returns the same instance (lazy singleton)
//! - `factory`: the resolver runs on every `get`, nothing is cached
//! - `protected`: the resolver never runs; `get` hands out the closure itself
//!
//! Plain values are returned as stored and never cached. The cache is
//! consulted before the entries map, so re-adding an entry under an
//! already-cached name has no visible effect until [`Registry::clear_cache`]
//! is called.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::entry::{Entry, EntryValue, Resolver, Shared};
use crate::registry_error::RegistryError;
use crate::registry_event::RegistryEvent;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a [`RegistryEvent`] every time the
/// registry is interacted with. It must be thread-safe because the registry
/// may be shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent<'_>) + Send + Sync + 'static;

/// A name-keyed service registry with lazy resolution.
///
/// Each instance owns its entries, its resolution cache and its optional
/// trace callback; instances are completely independent of each other. All
/// operations take `&self`, so a registry can be shared behind an `Arc` and
/// used from multiple threads.
///
/// # Examples
///
/// ```rust
/// use lazy_registry::{Entry, Registry};
/// use std::sync::Arc;
///
/// let registry = Registry::new();
/// registry
///     .add(Entry::value("url", "postgres://localhost".to_string()))
///     .add(Entry::resolver("connection", |registry: &Registry| {
///         let url: Arc<String> = registry.get_as("url").unwrap();
///         format!("connected to {url}")
///     }));
///
/// let conn: Arc<String> = registry.get_as("connection").unwrap();
/// assert_eq!(&*conn, "connected to postgres://localhost");
/// ```
#[derive(Default)]
pub struct Registry {
    /// Name-to-entry mapping; the last `add` for a name wins.
    entries: Mutex<HashMap<String, Entry>>,
    /// Memoized results of non-factory, non-protected resolver invocations.
    cache: Mutex<HashMap<String, Shared>>,
    /// Optional per-instance tracing callback.
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous entry under the same name.
    ///
    /// No duplicate validation is performed. Returns `&Self` so calls can be
    /// chained. The resolution cache is NOT touched: a value already cached
    /// under this name keeps being returned by [`get`](Registry::get) until
    /// [`clear_cache`](Registry::clear_cache) is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Entry, Registry};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// let port: Arc<u16> = registry
    ///     .add(Entry::value("host", "localhost".to_string()))
    ///     .add(Entry::value("port", 5432u16))
    ///     .get_as("port")
    ///     .unwrap();
    /// assert_eq!(*port, 5432);
    /// ```
    pub fn add(&self, entry: Entry) -> &Self {
        log::trace!("add `{}`", entry.name);
        self.emit_event(&RegistryEvent::Add { name: &entry.name });

        self.entries
            .lock()
            // Poisoning only occurs if a thread panicked while holding the
            // lock; the insert is safe to perform on the recovered map.
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(entry.name.clone(), entry);

        self
    }

    /// Resolves a name to its type-erased value.
    ///
    /// Resolution order:
    ///
    /// 1. A cached value is returned immediately, without consulting the
    ///    entry or its current flags.
    /// 2. An unknown name fails with [`RegistryError::NotFound`].
    /// 3. A plain value is returned as stored, never cached.
    /// 4. A non-protected resolver is invoked with this registry as its sole
    ///    argument; unless the entry is a factory, the produced value is
    ///    cached first.
    /// 5. A protected resolver is returned as a first-class value without
    ///    being invoked (see [`get_resolver`](Registry::get_resolver)).
    ///
    /// No lock is held while a resolver runs, so resolvers may call
    /// [`get`](Registry::get) or [`add`](Registry::add) on this registry
    /// recursively. A panic inside a resolver propagates to the caller.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if the name is absent from both the cache
    /// and the entries map.
    pub fn get(&self, name: &str) -> Result<Shared, RegistryError> {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned();

        if let Some(hit) = cached {
            log::trace!("get `{name}`: cache hit");
            self.emit_event(&RegistryEvent::Get {
                name,
                found: true,
                cached: true,
            });
            return Ok(hit);
        }

        // Snapshot the entry so the lock is released before a resolver runs.
        let snapshot = {
            let entries = self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            entries
                .get(name)
                .map(|entry| (entry.value.clone(), entry.factory, entry.protected))
        };

        let Some((value, factory, protected)) = snapshot else {
            log::debug!("get `{name}`: no such entry");
            self.emit_event(&RegistryEvent::Get {
                name,
                found: false,
                cached: false,
            });
            return Err(RegistryError::NotFound {
                name: name.to_string(),
            });
        };

        let resolved = match value {
            EntryValue::Resolver(resolve) if !protected => {
                let produced = resolve(self);
                if !factory {
                    self.cache
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(name.to_string(), produced.clone());
                }
                produced
            }
            // Protected: the closure itself is the value.
            EntryValue::Resolver(resolve) => Arc::new(resolve) as Shared,
            EntryValue::Raw(raw) => raw,
        };

        self.emit_event(&RegistryEvent::Get {
            name,
            found: true,
            cached: false,
        });

        Ok(resolved)
    }

    /// Resolves a name and downcasts the value to `Arc<T>`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if the name is unknown
    /// - [`RegistryError::TypeMismatch`] if the resolved value is not a `T`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Entry, Registry, RegistryError};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry.add(Entry::value("answer", 42i32));
    ///
    /// let answer: Arc<i32> = registry.get_as("answer").unwrap();
    /// assert_eq!(*answer, 42);
    ///
    /// // Asking for the wrong type is a type error, not a missing entry.
    /// let err = registry.get_as::<String>("answer").unwrap_err();
    /// assert!(matches!(err, RegistryError::TypeMismatch { .. }));
    /// ```
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.get(name)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolves a name and returns an owned clone of the value.
    ///
    /// Useful when you need to own the value rather than share it through an
    /// `Arc<T>`.
    ///
    /// # Errors
    ///
    /// Same as [`get_as`](Registry::get_as).
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(
        &self,
        name: &str,
    ) -> Result<T, RegistryError> {
        let arc = self.get_as::<T>(name)?;
        Ok((*arc).clone())
    }

    /// Resolves a protected entry to the stored closure itself.
    ///
    /// The same closure instance is returned on every call, never invoked by
    /// the registry. The caller decides when (and whether) to run it.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if the name is unknown
    /// - [`RegistryError::TypeMismatch`] if the entry did not resolve to a
    ///   protected closure
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Entry, Registry};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry.add(Entry::resolver("greet", |_: &Registry| "hi".to_string()).protected(true));
    ///
    /// let greet = registry.get_resolver("greet").unwrap();
    /// // Invoked by the caller, not by the registry.
    /// let greeting: Arc<String> = greet(&registry).downcast().unwrap();
    /// assert_eq!(&*greeting, "hi");
    /// ```
    pub fn get_resolver(&self, name: &str) -> Result<Arc<Resolver>, RegistryError> {
        let arc = self.get(name)?.downcast::<Arc<Resolver>>().map_err(|_| {
            RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<Arc<Resolver>>(),
            }
        })?;
        Ok((*arc).clone())
    }

    /// Checks whether a name is known to the registry.
    ///
    /// True if the name is present in either the resolution cache or the
    /// entries map.
    pub fn contains(&self, name: &str) -> bool {
        let in_cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(name);

        let found = in_cache
            || self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .contains_key(name);

        self.emit_event(&RegistryEvent::Contains { name, found });

        found
    }

    /// Clears the resolution cache, leaving the entries map intact.
    ///
    /// After this, the next [`get`](Registry::get) for each name takes the
    /// full resolution path again. This is the escape hatch for the stale
    /// value left behind when an entry is re-added under an already-cached
    /// name.
    pub fn clear_cache(&self) {
        log::debug!("clearing the resolution cache");
        self.emit_event(&RegistryEvent::ClearCache);

        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing callback support
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback invoked on every registry interaction.
    ///
    /// The callback must not call back into the same registry: the trace lock
    /// is held while it runs, so any operation that emits an event would
    /// deadlock. Observe and forward, nothing more.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lazy_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables tracing for this registry).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Convenience wrapper to emit a registry event using the current callback.
    fn emit_event(&self, event: &RegistryEvent<'_>) {
        let guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len();
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len();
        f.debug_struct("Registry")
            .field("entries", &entries)
            .field("cached", &cached)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
