use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::types::Resolved;

/// Caller-owned record that receives every resolved parameter.
pub trait SettableRecord {
    fn set(&mut self, name: &str, value: Resolved);
}

impl SettableRecord for BTreeMap<String, Resolved> {
    fn set(&mut self, name: &str, value: Resolved) {
        self.insert(name.to_string(), value);
    }
}

impl<S: BuildHasher> SettableRecord for HashMap<String, Resolved, S> {
    fn set(&mut self, name: &str, value: Resolved) {
        self.insert(name.to_string(), value);
    }
}
