//! Turns a flat batch of parameter declarations into resolved values.
//!
//! Each declaration is a literal, a packed-object spec (`{"class": ..,
//! "args": [..], ..fields}`) or a named reference into the
//! [`NamedObjectRegistry`](crate::registry::NamedObjectRegistry). Packed
//! specs may point at other parameters with `"$name"` markers; the batch is
//! processed in dependency order so markers always see their target.

pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod ports;
pub mod references;
pub mod types;

pub use diagnostics::describe_types;
pub use error::{ResolveError, ResolveErrorKind};
pub use graph::{DependencyGraph, build_order};
pub use orchestrator::ObjectResolver;
pub use ports::SettableRecord;
pub use references::{reference_target, references, substitute};
pub use types::{
    ARGS_KEY, CLASS_KEY, DeclarationBatch, DegradedParameter, PackedObject, REFERENCE_PREFIX,
    ResolutionOrder, ResolveOptions, ResolvedParameters,
};
