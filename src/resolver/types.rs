use std::{any::Any, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    resolver::error::{ResolveError, ResolveErrorKind, invalid_declaration},
    types::Resolved,
};

pub const CLASS_KEY: &str = "class";
pub const ARGS_KEY: &str = "args";
pub const REFERENCE_PREFIX: char = '$';

/// Ordered parameter name → raw declaration mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationBatch {
    entries: Map<String, Value>,
}

impl DeclarationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, ResolveError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(invalid_declaration(format!(
                "declaration batch must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Replaces an existing declaration of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for DeclarationBatch {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Declarative recipe standing in for a constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedObject {
    pub class_name: String,
    pub args: Vec<Value>,
    pub fields: Map<String, Value>,
}

impl PackedObject {
    pub fn is_packed(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| object.contains_key(CLASS_KEY))
    }

    /// Returns `None` for anything that is not a packed-object spec.
    pub fn parse(parameter: &str, value: &Value) -> Result<Option<Self>, ResolveError> {
        let Some(object) = value.as_object().filter(|_| Self::is_packed(value)) else {
            return Ok(None);
        };

        let mut fields = object.clone();
        let class_name = match fields.remove(CLASS_KEY) {
            Some(Value::String(class_name)) => class_name,
            Some(other) => {
                return Err(invalid_declaration(format!(
                    "'{CLASS_KEY}' must be a string, got {}",
                    json_kind(&other)
                ))
                .with_parameter(parameter));
            }
            None => return Ok(None),
        };
        let args = match fields.remove(ARGS_KEY) {
            Some(Value::Array(args)) => args,
            None => Vec::new(),
            Some(other) => {
                return Err(invalid_declaration(format!(
                    "'{ARGS_KEY}' of class '{class_name}' must be an array, got {}",
                    json_kind(&other)
                ))
                .with_parameter(parameter));
            }
        };

        Ok(Some(Self {
            class_name,
            args,
            fields,
        }))
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A parameter that was skipped instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedParameter {
    pub parameter: String,
    pub kind: ResolveErrorKind,
    pub message: String,
}

/// Resolved values in processing order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParameters {
    order: Vec<String>,
    values: BTreeMap<String, Resolved>,
    degraded: Vec<DegradedParameter>,
}

impl ResolvedParameters {
    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.values.get(name)
    }

    pub fn get_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(Resolved::downcast_ref::<T>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolved)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|value| (name.as_str(), value)))
    }

    pub fn degraded(&self) -> &[DegradedParameter] {
        &self.degraded
    }

    pub(crate) fn insert(&mut self, name: String, value: Resolved) {
        if self.values.insert(name.clone(), value).is_none() {
            self.order.push(name);
        }
    }

    pub(crate) fn degrade(&mut self, parameter: String, error: &ResolveError) {
        self.degraded.push(DegradedParameter {
            parameter,
            kind: error.kind,
            message: error.message.clone(),
        });
    }
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOrder {
    /// Topologically sorted by cross-references, ties in declaration order.
    #[default]
    Dependency,
    /// Exactly as declared; forward references fail.
    Declaration,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveOptions {
    #[serde(default = "default_enabled_true")]
    pub return_partial: bool,
    #[serde(default = "default_enabled_true")]
    pub raise_on_missing_class: bool,
    #[serde(default = "default_enabled_true")]
    pub raise_on_unknown_named_object: bool,
    #[serde(default)]
    pub passthrough_unclassified: bool,
    #[serde(default)]
    pub order: ResolutionOrder,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            return_partial: true,
            raise_on_missing_class: true,
            raise_on_unknown_named_object: true,
            passthrough_unclassified: false,
            order: ResolutionOrder::Dependency,
        }
    }
}

impl ResolveOptions {
    pub fn with_return_partial(mut self, enabled: bool) -> Self {
        self.return_partial = enabled;
        self
    }

    pub fn with_raise_on_missing_class(mut self, enabled: bool) -> Self {
        self.raise_on_missing_class = enabled;
        self
    }

    pub fn with_raise_on_unknown_named_object(mut self, enabled: bool) -> Self {
        self.raise_on_unknown_named_object = enabled;
        self
    }

    pub fn with_passthrough_unclassified(mut self, enabled: bool) -> Self {
        self.passthrough_unclassified = enabled;
        self
    }

    pub fn with_order(mut self, order: ResolutionOrder) -> Self {
        self.order = order;
        self
    }
}
