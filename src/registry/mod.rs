pub mod constructor;
pub mod named;
pub mod types;

pub use constructor::{Arguments, ConstructionError, Constructor, PartialConstruct};
pub use named::{Factory, NamedEntry, NamedObjectRegistry};
pub use types::TypeRegistry;
