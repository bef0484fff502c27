use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use thiserror::Error;

use crate::types::{FromArgument, Instance, Resolved};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The supplied arguments do not fit the constructor signature.
    #[error("argument mismatch: {0}")]
    Mismatch(String),
    #[error("construction failed: {0}")]
    Failed(String),
}

impl ConstructionError {
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::Mismatch(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

/// Positional and keyed arguments handed to a constructor.
///
/// Constructors consume what they accept through [`Arguments::take`] and its
/// typed wrappers; [`Arguments::finish`] rejects whatever is left over.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    positional: Vec<Option<Resolved>>,
    keyed: BTreeMap<String, Resolved>,
}

impl Arguments {
    pub fn new(positional: Vec<Resolved>, keyed: BTreeMap<String, Resolved>) -> Self {
        Self {
            positional: positional.into_iter().map(Some).collect(),
            keyed,
        }
    }

    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    pub fn keyed(&self) -> &BTreeMap<String, Resolved> {
        &self.keyed
    }

    /// Takes the argument at `index`, or the keyed field `name`. Supplying
    /// both is a mismatch.
    pub fn take(&mut self, index: usize, name: &str) -> Result<Option<Resolved>, ConstructionError> {
        let by_position = self.positional.get_mut(index).and_then(Option::take);
        let by_name = self.keyed.remove(name);
        match (by_position, by_name) {
            (Some(_), Some(_)) => Err(ConstructionError::mismatch(format!(
                "got multiple values for argument '{name}'"
            ))),
            (Some(value), None) | (None, Some(value)) => Ok(Some(value)),
            (None, None) => Ok(None),
        }
    }

    pub fn required<T: FromArgument>(
        &mut self,
        index: usize,
        name: &str,
    ) -> Result<T, ConstructionError> {
        let value = self.take(index, name)?.ok_or_else(|| {
            ConstructionError::mismatch(format!("missing required argument '{name}'"))
        })?;
        convert(name, &value)
    }

    pub fn optional<T: FromArgument>(
        &mut self,
        index: usize,
        name: &str,
    ) -> Result<Option<T>, ConstructionError> {
        match self.take(index, name)? {
            Some(value) => convert(name, &value).map(Some),
            None => Ok(None),
        }
    }

    /// Drains every positional argument from `index` on.
    pub fn rest(&mut self, index: usize) -> Vec<Resolved> {
        self.positional
            .iter_mut()
            .skip(index)
            .filter_map(Option::take)
            .collect()
    }

    pub fn finish(self) -> Result<(), ConstructionError> {
        let consumed = self.positional.iter().filter(|slot| slot.is_none()).count();
        let leftover = self.positional.len() - consumed;
        if leftover > 0 {
            return Err(ConstructionError::mismatch(format!(
                "takes {consumed} positional arguments but {} were given",
                self.positional.len()
            )));
        }
        if let Some(name) = self.keyed.keys().next() {
            return Err(ConstructionError::mismatch(format!(
                "got an unexpected keyword argument '{name}'"
            )));
        }
        Ok(())
    }
}

fn convert<T: FromArgument>(name: &str, value: &Resolved) -> Result<T, ConstructionError> {
    T::from_argument(value).ok_or_else(|| {
        ConstructionError::mismatch(format!(
            "argument '{name}' expects {}, got {}",
            T::expected(),
            value.type_name()
        ))
    })
}

type BuildFn = dyn Fn(Arguments) -> Result<Instance, ConstructionError> + Send + Sync;

/// A registered way of building one class from [`Arguments`].
#[derive(Clone)]
pub struct Constructor {
    build: Arc<BuildFn>,
}

impl Constructor {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(Arguments) -> Result<Instance, ConstructionError> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }

    /// Wraps a typed builder; leftover arguments after `build` returns are a
    /// mismatch.
    pub fn of<T, F>(build: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&mut Arguments) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        Self::new(move |mut arguments| {
            let value = build(&mut arguments)?;
            arguments.finish()?;
            Ok(Instance::new(value))
        })
    }

    pub fn construct(&self, arguments: Arguments) -> Result<Instance, ConstructionError> {
        (self.build)(arguments)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").finish_non_exhaustive()
    }
}

/// A constructor bound with some keyed fields, completed later with the rest.
#[derive(Debug, Clone)]
pub struct PartialConstruct {
    class_name: String,
    constructor: Constructor,
    bound: BTreeMap<String, Resolved>,
}

impl PartialConstruct {
    pub fn new(
        class_name: impl Into<String>,
        constructor: Constructor,
        bound: BTreeMap<String, Resolved>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            constructor,
            bound,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn bound(&self) -> &BTreeMap<String, Resolved> {
        &self.bound
    }

    /// Later keyed fields override bound ones with the same name.
    pub fn complete(
        &self,
        positional: Vec<Resolved>,
        keyed: BTreeMap<String, Resolved>,
    ) -> Result<Instance, ConstructionError> {
        let mut merged = self.bound.clone();
        merged.extend(keyed);
        self.constructor.construct(Arguments::new(positional, merged))
    }
}
