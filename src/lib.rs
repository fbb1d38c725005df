//! # Lazy Registry
//!
//! A name-keyed service registry with lazy resolution: a minimal
//! dependency-injection container in the keyed-entries style.
//!
//! Each registered [`Entry`] holds either a plain value or a resolver closure
//! that receives the owning [`Registry`] and produces the real value. Two
//! flags choose among three behaviors for a resolver entry:
//!
//! - **singleton** (default): the closure runs on first `get`, the result is
//!   cached, and every later `get` returns the same instance
//! - **factory**: the closure runs on every `get`, nothing is cached
//! - **protected**: the closure is never run; `get` hands it out as a
//!   first-class value for the caller to invoke
//!
//! ## Quick Start
//!
//! ```rust
//! use lazy_registry::{Entry, Registry};
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! registry
//!     .add(Entry::value("url", "postgres://localhost".to_string()))
//!     .add(Entry::resolver("pool", |registry: &Registry| {
//!         let url: Arc<String> = registry.get_as("url").unwrap();
//!         format!("pool for {url}")
//!     }));
//!
//! let a: Arc<String> = registry.get_as("pool").unwrap();
//! let b: Arc<String> = registry.get_as("pool").unwrap();
//!
//! // Lazy singleton: resolved once, same instance thereafter.
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: every operation takes `&self`; share a registry behind
//!   an `Arc` across threads
//! - **Recursive resolution**: resolvers receive the registry and may look up
//!   other names while building their value
//! - **Per-instance state**: each registry owns its entries and cache; no
//!   globals
//! - **Tracing support**: optional per-registry callback observing every
//!   operation, plus `log` statements at trace/debug level
//!
//! ## Main Types
//!
//! - [`Registry`] - the container: `add`, `get`, typed getters, `contains`,
//!   `clear_cache`
//! - [`Entry`] - one registered name with its value and resolution flags
//! - [`RegistryError`] - `NotFound` and `TypeMismatch`
//! - [`RegistryEvent`] - events delivered to the tracing callback

mod entry;
mod registry;
mod registry_error;
mod registry_event;

// Re-export the main public API
pub use entry::{Entry, EntryValue, Resolver, Shared};
pub use registry::{Registry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
