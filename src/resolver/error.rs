use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveErrorKind {
    ClassNotFound,
    ConstructionMismatch,
    ConstructionFailed,
    UnknownNamedObject,
    UnresolvedReference,
    CyclicDependency,
    MissingTypeRegistry,
    InvalidDeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub message: String,
    pub parameters: Vec<String>,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        let parameter = parameter.into();
        if !self.parameters.contains(&parameter) {
            self.parameters.push(parameter);
        }
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for parameter in parameters {
            self = self.with_parameter(parameter);
        }
        self
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(
                f,
                "{} (parameters: {})",
                self.message,
                self.parameters.join(", ")
            )
        }
    }
}

impl std::error::Error for ResolveError {}

pub fn class_not_found(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::ClassNotFound, message)
}

pub fn construction_mismatch(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::ConstructionMismatch, message)
}

pub fn construction_failed(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::ConstructionFailed, message)
}

pub fn unknown_named_object(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::UnknownNamedObject, message)
}

pub fn unresolved_reference(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::UnresolvedReference, message)
}

pub fn cyclic_dependency(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::CyclicDependency, message)
}

pub fn missing_type_registry(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::MissingTypeRegistry, message)
}

pub fn invalid_declaration(message: impl Into<String>) -> ResolveError {
    ResolveError::new(ResolveErrorKind::InvalidDeclaration, message)
}
