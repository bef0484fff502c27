use serde_json::Value;

use crate::{
    registry::{
        constructor::{ConstructionError, PartialConstruct},
        named::NamedObjectRegistry,
        types::TypeRegistry,
    },
    resolver::{
        error::{
            ResolveError, construction_failed, construction_mismatch, missing_type_registry,
        },
        graph::build_order,
        ports::SettableRecord,
        references::substitute,
        types::{DeclarationBatch, PackedObject, ResolutionOrder, ResolveOptions, ResolvedParameters},
    },
    types::Resolved,
};

enum EntryOutcome {
    Resolved(Resolved),
    Degraded(ResolveError),
    Omitted,
}

/// Resolves a declaration batch against a type registry and a named-object
/// registry. Both registries are only read.
#[derive(Debug, Clone)]
pub struct ObjectResolver<'a> {
    types: Option<&'a TypeRegistry>,
    named: &'a NamedObjectRegistry,
    options: ResolveOptions,
}

impl<'a> ObjectResolver<'a> {
    pub fn new(
        types: Option<&'a TypeRegistry>,
        named: &'a NamedObjectRegistry,
        options: ResolveOptions,
    ) -> Self {
        Self {
            types,
            named,
            options,
        }
    }

    pub fn resolve(&self, batch: &DeclarationBatch) -> Result<ResolvedParameters, ResolveError> {
        self.resolve_with_target(batch, None)
    }

    /// Like [`Self::resolve`], also writing each resolved parameter onto `target`.
    pub fn resolve_into(
        &self,
        batch: &DeclarationBatch,
        target: &mut dyn SettableRecord,
    ) -> Result<ResolvedParameters, ResolveError> {
        self.resolve_with_target(batch, Some(target))
    }

    #[tracing::instrument(
        name = "resolve_batch",
        target = "resolver",
        skip_all,
        fields(parameters = batch.len(), order = ?self.options.order)
    )]
    pub fn resolve_with_target(
        &self,
        batch: &DeclarationBatch,
        mut target: Option<&mut dyn SettableRecord>,
    ) -> Result<ResolvedParameters, ResolveError> {
        let order = self.processing_order(batch)?;
        let mut resolved = ResolvedParameters::default();

        for name in order {
            let Some(raw) = batch.get(&name) else {
                continue;
            };
            match self.resolve_entry(&resolved, &name, raw)? {
                EntryOutcome::Resolved(value) => {
                    tracing::debug!(
                        target: "resolver",
                        parameter = %name,
                        value_type = %value.type_name(),
                        "parameter_resolved"
                    );
                    if let Some(target) = target.as_deref_mut() {
                        target.set(&name, value.clone());
                    }
                    resolved.insert(name, value);
                }
                EntryOutcome::Degraded(err) => {
                    tracing::warn!(
                        target: "resolver",
                        parameter = %name,
                        kind = ?err.kind,
                        error = %err,
                        "parameter_skipped"
                    );
                    resolved.degrade(name, &err);
                }
                EntryOutcome::Omitted => {
                    tracing::debug!(target: "resolver", parameter = %name, "parameter_unclassified");
                }
            }
        }

        Ok(resolved)
    }

    fn processing_order(&self, batch: &DeclarationBatch) -> Result<Vec<String>, ResolveError> {
        match self.options.order {
            ResolutionOrder::Dependency => build_order(batch),
            ResolutionOrder::Declaration => Ok(batch.names().map(str::to_string).collect()),
        }
    }

    fn resolve_entry(
        &self,
        resolved: &ResolvedParameters,
        name: &str,
        raw: &Value,
    ) -> Result<EntryOutcome, ResolveError> {
        if let Some(packed) = PackedObject::parse(name, raw)? {
            return self.resolve_packed(resolved, name, &packed);
        }
        if let Value::String(object_name) = raw
            && self.named.has_entries(name)
        {
            return self.resolve_named(name, object_name);
        }
        if raw.is_null() || !self.options.passthrough_unclassified {
            return Ok(EntryOutcome::Omitted);
        }
        Ok(EntryOutcome::Resolved(Resolved::Literal(raw.clone())))
    }

    fn resolve_packed(
        &self,
        resolved: &ResolvedParameters,
        name: &str,
        packed: &PackedObject,
    ) -> Result<EntryOutcome, ResolveError> {
        let types = self.types.ok_or_else(|| {
            missing_type_registry(format!(
                "class '{}' cannot be constructed without a type registry",
                packed.class_name
            ))
            .with_parameter(name)
        })?;
        let arguments = substitute(name, resolved, packed)?;

        let constructor = match types.resolve(&packed.class_name) {
            Ok(constructor) => constructor,
            Err(err) if self.options.raise_on_missing_class => {
                return Err(err.with_parameter(name));
            }
            Err(err) => return Ok(EntryOutcome::Degraded(err.with_parameter(name))),
        };
        let class_name = types.canonical_name(&packed.class_name);
        let bound = arguments.keyed().clone();

        match constructor.construct(arguments) {
            Ok(instance) => Ok(EntryOutcome::Resolved(Resolved::Object(instance))),
            Err(ConstructionError::Mismatch(reason)) if self.options.return_partial => {
                tracing::debug!(
                    target: "resolver",
                    parameter = %name,
                    class_name = %class_name,
                    reason = %reason,
                    "construction_deferred_as_partial"
                );
                Ok(EntryOutcome::Resolved(Resolved::Partial(PartialConstruct::new(
                    class_name,
                    constructor.clone(),
                    bound,
                ))))
            }
            Err(ConstructionError::Mismatch(reason)) => Err(construction_mismatch(format!(
                "arguments do not fit class '{class_name}': {reason}"
            ))
            .with_parameter(name)),
            Err(ConstructionError::Failed(reason)) => Err(construction_failed(format!(
                "class '{class_name}' failed to construct: {reason}"
            ))
            .with_parameter(name)),
        }
    }

    fn resolve_named(&self, name: &str, object_name: &str) -> Result<EntryOutcome, ResolveError> {
        match self.named.resolve(name, object_name) {
            Ok(value) => Ok(EntryOutcome::Resolved(value)),
            Err(err) if self.options.raise_on_unknown_named_object => Err(err),
            Err(err) => Ok(EntryOutcome::Degraded(err)),
        }
    }
}
