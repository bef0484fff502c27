use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use crate::{
    resolver::error::{ResolveError, unknown_named_object},
    types::Resolved,
};

pub type Factory = Arc<dyn Fn() -> Resolved + Send + Sync>;

/// Either an already-built object or a factory, never both.
#[derive(Clone)]
pub enum NamedEntry {
    /// Every resolution hands out a clone of the same value.
    Shared(Resolved),
    /// Invoked on every resolution; nothing is cached.
    Factory(Factory),
}

impl NamedEntry {
    pub fn shared(value: impl Into<Resolved>) -> Self {
        Self::Shared(value.into())
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Resolved + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    fn produce(&self) -> Resolved {
        match self {
            Self::Shared(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for NamedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(value) => f.debug_tuple("Shared").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Parameter name → object name → entry.
#[derive(Debug, Clone, Default)]
pub struct NamedObjectRegistry {
    by_parameter: BTreeMap<String, BTreeMap<String, NamedEntry>>,
}

impl NamedObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        parameter: impl Into<String>,
        object_name: impl Into<String>,
        entry: NamedEntry,
    ) -> Option<NamedEntry> {
        self.by_parameter
            .entry(parameter.into())
            .or_default()
            .insert(object_name.into(), entry)
    }

    pub fn register_shared<T: Any + Send + Sync>(
        &mut self,
        parameter: impl Into<String>,
        object_name: impl Into<String>,
        object: T,
    ) -> Option<NamedEntry> {
        self.register(parameter, object_name, NamedEntry::shared(Resolved::object(object)))
    }

    pub fn register_factory<T, F>(
        &mut self,
        parameter: impl Into<String>,
        object_name: impl Into<String>,
        factory: F,
    ) -> Option<NamedEntry>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(
            parameter,
            object_name,
            NamedEntry::factory(move || Resolved::object(factory())),
        )
    }

    /// Whether string values of `parameter` are treated as object names.
    pub fn has_entries(&self, parameter: &str) -> bool {
        self.by_parameter
            .get(parameter)
            .is_some_and(|entries| !entries.is_empty())
    }

    pub fn object_names(&self, parameter: &str) -> Vec<&str> {
        self.by_parameter
            .get(parameter)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn resolve(&self, parameter: &str, object_name: &str) -> Result<Resolved, ResolveError> {
        self.by_parameter
            .get(parameter)
            .and_then(|entries| entries.get(object_name))
            .map(NamedEntry::produce)
            .ok_or_else(|| {
                unknown_named_object(format!(
                    "can't find named object '{object_name}' for parameter '{parameter}'"
                ))
                .with_parameter(parameter)
            })
    }
}
