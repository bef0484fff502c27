use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    registry::constructor::Arguments,
    resolver::{
        error::{ResolveError, unresolved_reference},
        types::{PackedObject, REFERENCE_PREFIX, ResolvedParameters},
    },
    types::Resolved,
};

/// Name of the parameter a `$name` marker points at. A bare `$` is not a marker.
pub fn reference_target(value: &Value) -> Option<&str> {
    value
        .as_str()?
        .strip_prefix(REFERENCE_PREFIX)
        .filter(|name| !name.is_empty())
}

/// Referenced parameter names in appearance order: positional args first,
/// then keyed fields.
pub fn references(packed: &PackedObject) -> Vec<&str> {
    packed
        .args
        .iter()
        .chain(packed.fields.values())
        .filter_map(reference_target)
        .collect()
}

/// Builds constructor arguments for `packed`, replacing every marker with the
/// value already resolved for its target.
pub fn substitute(
    parameter: &str,
    resolved: &ResolvedParameters,
    packed: &PackedObject,
) -> Result<Arguments, ResolveError> {
    let positional = packed
        .args
        .iter()
        .map(|value| substitute_value(parameter, resolved, value))
        .collect::<Result<Vec<_>, _>>()?;
    let keyed = packed
        .fields
        .iter()
        .map(|(field, value)| {
            substitute_value(parameter, resolved, value).map(|value| (field.clone(), value))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(Arguments::new(positional, keyed))
}

fn substitute_value(
    parameter: &str,
    resolved: &ResolvedParameters,
    value: &Value,
) -> Result<Resolved, ResolveError> {
    let Some(target) = reference_target(value) else {
        return Ok(Resolved::Literal(value.clone()));
    };

    resolved.get(target).cloned().ok_or_else(|| {
        unresolved_reference(format!(
            "parameter '{parameter}' references '{target}' before it was resolved"
        ))
        .with_parameters([parameter, target])
    })
}
