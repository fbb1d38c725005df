/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback).
/// Event fields borrow the entry name for the duration of the callback; store
/// an owned copy if you need to keep it.
///
/// # Examples
///
/// ```rust
/// use lazy_registry::RegistryEvent;
///
/// let event = RegistryEvent::Add { name: "db" };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent<'a> {
    /// An entry was added to the registry.
    Add {
        /// The entry's name
        name: &'a str,
    },

    /// A value was requested from the registry.
    Get {
        /// The name that was requested
        name: &'a str,
        /// Whether the name resolved to a value
        found: bool,
        /// Whether the value came from the resolution cache
        cached: bool,
    },

    /// A name existence check was performed.
    Contains {
        /// The name that was checked
        name: &'a str,
        /// Whether the name exists in the registry
        found: bool,
    },

    /// The resolution cache was cleared.
    ClearCache,
}

impl std::fmt::Display for RegistryEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Add { name } => write!(f, "add {{ name: {} }}", name),
            RegistryEvent::Get {
                name,
                found,
                cached,
            } => write!(
                f,
                "get {{ name: {}, found: {}, cached: {} }}",
                name, found, cached
            ),
            RegistryEvent::Contains { name, found } => {
                write!(f, "contains {{ name: {}, found: {} }}", name, found)
            }
            RegistryEvent::ClearCache => write!(f, "clearing the resolution cache"),
        }
    }
}
