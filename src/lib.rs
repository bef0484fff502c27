//! Declarative parameter resolution: literals, packed-object specs with
//! `$name` cross-references, and named shared objects, turned into one
//! resolved record per batch.

pub mod builtins;
pub mod cli;
pub mod config;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod types;
