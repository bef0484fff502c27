use std::{any::Any, fmt, sync::Arc};

use serde_json::Value;

use crate::registry::constructor::PartialConstruct;

/// A constructed object with its concrete type erased.
///
/// Cloning an `Instance` shares the underlying allocation, so two clones of
/// the same instance are `ptr_eq`.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// The value a parameter resolves to.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A raw declaration value kept as-is.
    Literal(Value),
    /// A fully constructed object.
    Object(Instance),
    /// A constructor bound with the keyed fields it was declared with, still
    /// awaiting the arguments it rejected as missing.
    Partial(PartialConstruct),
}

impl Resolved {
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Instance::new(value))
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_partial(&self) -> Option<&PartialConstruct> {
        match self {
            Self::Partial(partial) => Some(partial),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_instance()
            .and_then(|instance| instance.downcast_ref::<T>())
    }

    /// Runtime type name with module paths stripped, e.g. `Vec<f64>`.
    pub fn type_name(&self) -> String {
        match self {
            Self::Literal(value) => literal_type_name(value).to_string(),
            Self::Object(instance) => short_type_name(instance.type_name()),
            Self::Partial(partial) => format!("Partial<{}>", partial.class_name()),
        }
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<Instance> for Resolved {
    fn from(instance: Instance) -> Self {
        Self::Object(instance)
    }
}

impl From<PartialConstruct> for Resolved {
    fn from(partial: PartialConstruct) -> Self {
        Self::Partial(partial)
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Object(instance) => write!(f, "<{}>", short_type_name(instance.type_name())),
            Self::Partial(partial) => {
                let bound: Vec<&str> = partial.bound().keys().map(String::as_str).collect();
                write!(f, "partial({}, bound=[{}])", partial.class_name(), bound.join(", "))
            }
        }
    }
}

fn literal_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "()",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_i64() => "i64",
        Value::Number(number) if number.is_u64() => "u64",
        Value::Number(_) => "f64",
        Value::String(_) => "String",
        Value::Array(_) => "Vec<Value>",
        Value::Object(_) => "Map<String, Value>",
    }
}

pub fn short_type_name(full: &str) -> String {
    let is_delimiter =
        |c: char| matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&');
    let mut short = String::with_capacity(full.len());
    for part in full.split_inclusive(is_delimiter) {
        let (path, delimiter) = match part.char_indices().last() {
            Some((index, c)) if is_delimiter(c) => (&part[..index], &part[index..]),
            _ => (part, ""),
        };
        short.push_str(path.rsplit("::").next().unwrap_or(path));
        short.push_str(delimiter);
    }
    short
}

/// Typed extraction of a constructor argument.
pub trait FromArgument: Sized {
    fn expected() -> &'static str;

    fn from_argument(value: &Resolved) -> Option<Self>;
}

impl FromArgument for i64 {
    fn expected() -> &'static str {
        "integer"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal()?.as_i64()
    }
}

impl FromArgument for u64 {
    fn expected() -> &'static str {
        "unsigned integer"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal()?.as_u64()
    }
}

impl FromArgument for usize {
    fn expected() -> &'static str {
        "unsigned integer"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        usize::try_from(value.as_literal()?.as_u64()?).ok()
    }
}

impl FromArgument for f64 {
    fn expected() -> &'static str {
        "number"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal()?.as_f64()
    }
}

impl FromArgument for bool {
    fn expected() -> &'static str {
        "boolean"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal()?.as_bool()
    }
}

impl FromArgument for String {
    fn expected() -> &'static str {
        "string"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal()?.as_str().map(str::to_string)
    }
}

impl FromArgument for Value {
    fn expected() -> &'static str {
        "literal"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_literal().cloned()
    }
}

impl FromArgument for Resolved {
    fn expected() -> &'static str {
        "any value"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromArgument for Instance {
    fn expected() -> &'static str {
        "object"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_instance().cloned()
    }
}

impl<T: Any + Send + Sync> FromArgument for Arc<T> {
    fn expected() -> &'static str {
        std::any::type_name::<T>()
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value.as_instance()?.downcast::<T>()
    }
}

impl<T: FromArgument> FromArgument for Vec<T> {
    fn expected() -> &'static str {
        "array"
    }

    fn from_argument(value: &Resolved) -> Option<Self> {
        value
            .as_literal()?
            .as_array()?
            .iter()
            .map(|item| T::from_argument(&Resolved::Literal(item.clone())))
            .collect()
    }
}
