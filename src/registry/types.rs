use std::{collections::BTreeMap, fmt};

use crate::{
    registry::constructor::Constructor,
    resolver::error::{ResolveError, class_not_found},
};

/// Class name → constructor table with single-step nickname aliasing.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    constructors: BTreeMap<String, Constructor>,
    nicknames: BTreeMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_constructors<I, K>(constructors: I) -> Self
    where
        I: IntoIterator<Item = (K, Constructor)>,
        K: Into<String>,
    {
        constructors.into_iter().collect()
    }

    pub fn register(
        &mut self,
        class_name: impl Into<String>,
        constructor: Constructor,
    ) -> Option<Constructor> {
        self.constructors.insert(class_name.into(), constructor)
    }

    /// Last write wins when `nickname` was already an alias.
    pub fn register_nickname(&mut self, class_name: impl Into<String>, nickname: impl Into<String>) {
        let class_name = class_name.into();
        let nickname = nickname.into();
        if let Some(previous) = self.nicknames.insert(nickname.clone(), class_name.clone())
            && previous != class_name
        {
            tracing::warn!(
                target: "registry",
                nickname = %nickname,
                previous = %previous,
                class_name = %class_name,
                "nickname_overwritten"
            );
        }
    }

    /// Applies the nickname map once; aliases are never chained.
    pub fn canonical_name<'a>(&'a self, class_name: &'a str) -> &'a str {
        self.nicknames
            .get(class_name)
            .map(String::as_str)
            .unwrap_or(class_name)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors
            .contains_key(self.canonical_name(class_name))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn nicknames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nicknames
            .iter()
            .map(|(nickname, class_name)| (nickname.as_str(), class_name.as_str()))
    }

    pub fn resolve(&self, class_name: &str) -> Result<&Constructor, ResolveError> {
        let canonical = self.canonical_name(class_name);
        self.constructors.get(canonical).ok_or_else(|| {
            if canonical == class_name {
                class_not_found(format!("class '{class_name}' is not registered"))
            } else {
                class_not_found(format!(
                    "class '{canonical}' (nickname '{class_name}') is not registered"
                ))
            }
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Constructor)> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = (K, Constructor)>>(iter: I) -> Self {
        Self {
            constructors: iter
                .into_iter()
                .map(|(class_name, constructor)| (class_name.into(), constructor))
                .collect(),
            nicknames: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &self.constructors.keys().collect::<Vec<_>>())
            .field("nicknames", &self.nicknames)
            .finish()
    }
}
