//! Registered entries and their stored values.
//!
//! An [`Entry`] couples a unique name with either a plain value or a resolver
//! closure, plus the two flags (`factory`, `protected`) that drive the
//! resolution rules in [`Registry::get`](crate::Registry::get).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Registry;

/// Type-erased shared value handed out by the registry.
pub type Shared = Arc<dyn Any + Send + Sync>;

/// A callable stored in an entry.
///
/// The registry passes itself as the sole argument, so a resolver can look up
/// other names recursively while building its value.
pub type Resolver = dyn Fn(&Registry) -> Shared + Send + Sync + 'static;

/// What an entry stores: a plain value or a resolver closure.
///
/// The distinction is fixed when the entry is constructed; the `factory` and
/// `protected` flags are read later, at resolution time.
#[derive(Clone)]
pub enum EntryValue {
    /// A plain value, returned as-is on every resolution.
    Raw(Shared),
    /// A closure invoked with the owning registry to produce the value.
    Resolver(Arc<Resolver>),
}

impl fmt::Debug for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValue::Raw(_) => f.write_str("Raw(..)"),
            EntryValue::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// One registered name: its stored value and resolution flags.
///
/// Entries are built with [`Entry::value`], [`Entry::value_arc`] or
/// [`Entry::resolver`] and configured through the consuming builder setters
/// [`factory`](Entry::factory) and [`protected`](Entry::protected), then
/// handed to [`Registry::add`](crate::Registry::add).
///
/// # Examples
///
/// ```rust
/// use lazy_registry::Entry;
///
/// let entry = Entry::value("answer", 42i32).factory(false);
/// assert_eq!(entry.name(), "answer");
/// assert!(!entry.is_factory());
/// assert!(!entry.is_protected());
/// ```
#[derive(Clone)]
pub struct Entry {
    pub(crate) name: String,
    pub(crate) value: EntryValue,
    pub(crate) factory: bool,
    pub(crate) protected: bool,
}

impl Entry {
    /// Creates an entry holding a plain value.
    ///
    /// The value is wrapped in an `Arc` automatically. Plain values are never
    /// cached: every `get` reads them straight from the entries map, so
    /// re-adding under the same name takes effect immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Entry, Registry};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry.add(Entry::value("greeting", "hello".to_string()));
    ///
    /// let greeting: Arc<String> = registry.get_as("greeting").unwrap();
    /// assert_eq!(&*greeting, "hello");
    /// ```
    pub fn value<T: Send + Sync + 'static>(name: impl Into<String>, value: T) -> Self {
        Self::value_arc(name, Arc::new(value))
    }

    /// Creates an entry holding a plain value the caller already has in an `Arc`.
    ///
    /// More efficient than [`Entry::value`] when you already hold an `Arc`, as
    /// it avoids wrapping it a second time.
    pub fn value_arc<T: Send + Sync + 'static>(name: impl Into<String>, value: Arc<T>) -> Self {
        Self {
            name: name.into(),
            value: EntryValue::Raw(value),
            factory: false,
            protected: false,
        }
    }

    /// Creates an entry holding a resolver closure.
    ///
    /// The closure receives the owning [`Registry`] on invocation and may
    /// resolve other names through it. Its result is wrapped in an `Arc` each
    /// time it runs. With default flags the closure runs at most once and the
    /// produced value is cached; see [`factory`](Entry::factory) and
    /// [`protected`](Entry::protected) for the other two behaviors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_registry::{Entry, Registry};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .add(Entry::value("base", 40i32))
    ///     .add(Entry::resolver("answer", |registry: &Registry| {
    ///         let base: Arc<i32> = registry.get_as("base").unwrap();
    ///         *base + 2
    ///     }));
    ///
    /// let answer: Arc<i32> = registry.get_as("answer").unwrap();
    /// assert_eq!(*answer, 42);
    /// ```
    pub fn resolver<T, F>(name: impl Into<String>, resolve: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> T + Send + Sync + 'static,
    {
        let resolve: Arc<Resolver> =
            Arc::new(move |registry: &Registry| Arc::new(resolve(registry)) as Shared);

        Self {
            name: name.into(),
            value: EntryValue::Resolver(resolve),
            factory: false,
            protected: false,
        }
    }

    /// Returns the entry's immutable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the factory flag and returns the entry for chaining.
    ///
    /// A factory resolver is invoked on every `get` and its results are never
    /// cached. Has no effect on plain values, and is overridden by
    /// [`protected`](Entry::protected).
    pub fn factory(mut self, factory: bool) -> Self {
        self.factory = factory;
        self
    }

    /// Sets the protected flag and returns the entry for chaining.
    ///
    /// A protected resolver is never invoked: `get` hands out the closure
    /// itself as a first-class value (see
    /// [`Registry::get_resolver`](crate::Registry::get_resolver)). Takes
    /// precedence over the factory flag.
    pub fn protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    /// Returns whether the factory flag is set.
    pub fn is_factory(&self) -> bool {
        self.factory
    }

    /// Returns whether the protected flag is set.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Returns the stored value variant.
    pub fn stored(&self) -> &EntryValue {
        &self.value
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("factory", &self.factory)
            .field("protected", &self.protected)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_default_to_false() {
        let entry = Entry::value("plain", 1i32);
        assert!(!entry.is_factory());
        assert!(!entry.is_protected());
    }

    #[test]
    fn test_builder_setters_chain() {
        let entry = Entry::resolver("svc", |_: &Registry| 0i32)
            .factory(true)
            .protected(true);

        assert_eq!(entry.name(), "svc");
        assert!(entry.is_factory());
        assert!(entry.is_protected());

        // Setters also turn flags back off.
        let entry = entry.factory(false).protected(false);
        assert!(!entry.is_factory());
        assert!(!entry.is_protected());
    }

    #[test]
    fn test_value_arc_reuses_the_arc() {
        let value = Arc::new("shared".to_string());
        let entry = Entry::value_arc("shared", value.clone());

        // entry + local clone, no extra wrap
        assert_eq!(Arc::strong_count(&value), 2);
        match entry.stored() {
            EntryValue::Raw(_) => {}
            EntryValue::Resolver(_) => panic!("expected a raw value"),
        }
    }

    #[test]
    fn test_stored_variant_is_fixed_at_construction() {
        let raw = Entry::value("raw", 1u8);
        let resolved = Entry::resolver("resolved", |_: &Registry| 1u8);

        assert!(matches!(raw.stored(), EntryValue::Raw(_)));
        assert!(matches!(resolved.stored(), EntryValue::Resolver(_)));
    }

    #[test]
    fn test_debug_format_hides_payload() {
        let entry = Entry::resolver("db", |_: &Registry| 0i32).factory(true);
        let rendered = format!("{entry:?}");
        assert!(rendered.contains("name: \"db\""));
        assert!(rendered.contains("Resolver(..)"));
        assert!(rendered.contains("factory: true"));
    }
}
