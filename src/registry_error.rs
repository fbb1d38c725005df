use thiserror::Error;

/// Errors returned by the registry's resolution operations.
///
/// Resolving a name that was never added is the only domain error. A failed
/// downcast in the typed getters is reported as `TypeMismatch`; panics inside
/// a user-supplied resolver are not caught and propagate to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// The requested name is absent from both the cache and the entries map.
    #[error("no entry named `{name}` in the registry")]
    NotFound {
        /// The name that was requested.
        name: String,
    },

    /// The resolved value could not be downcast to the requested type.
    #[error("type mismatch for entry `{name}`: expected {expected}")]
    TypeMismatch {
        /// The name that was requested.
        name: String,
        /// The type the caller asked for.
        expected: &'static str,
    },
}
