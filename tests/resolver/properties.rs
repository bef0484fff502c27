use paramforge::{
    registry::NamedObjectRegistry,
    resolver::{ObjectResolver, ResolveOptions, ResolvedParameters},
    types::Resolved,
};
use serde_json::{Value, json};

use crate::{NeuralNet, batch, model_types};

fn literals(resolved: &ResolvedParameters) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value)> = resolved
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Resolved::Literal(value) => value.clone(),
                other => Value::String(other.type_name()),
            };
            (name.to_string(), value)
        })
        .collect();
    entries.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
    entries
}

#[test]
fn given_only_literals_with_passthrough_then_resolution_is_identity() {
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(
        None,
        &named,
        ResolveOptions::default().with_passthrough_unclassified(true),
    );
    let declarations = json!({
        "kernel_size": 3,
        "lr": 0.01,
        "name": "baseline",
        "layers": [64, 64],
        "schedule": {"warmup": 100},
        "shuffle": true,
    });

    let resolved = resolver
        .resolve(&batch(declarations.clone()))
        .expect("literal batch should resolve");

    let expected: Vec<(String, Value)> = {
        let mut entries: Vec<(String, Value)> = declarations
            .as_object()
            .expect("declarations are an object")
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        entries.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
        entries
    };
    assert_eq!(literals(&resolved), expected);
}

#[test]
fn given_only_literals_without_passthrough_then_nothing_resolves() {
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(None, &named, ResolveOptions::default());

    let resolved = resolver
        .resolve(&batch(json!({"kernel_size": 3, "lr": 0.01})))
        .expect("literal batch should resolve");

    assert!(resolved.is_empty());
    assert!(resolved.degraded().is_empty());
}

#[test]
fn given_permuted_batches_without_references_then_content_is_identical() {
    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(
        Some(&types),
        &named,
        ResolveOptions::default().with_passthrough_unclassified(true),
    );

    let forward = resolver
        .resolve(&batch(json!({
            "epochs": 10,
            "model": {"class": "NeuralNet", "layers": 2, "hidden": 16},
            "grid": {"class": "linspace", "args": [0, 1, 3]},
        })))
        .expect("forward batch should resolve");
    let reversed = resolver
        .resolve(&batch(json!({
            "grid": {"class": "linspace", "args": [0, 1, 3]},
            "model": {"class": "NeuralNet", "layers": 2, "hidden": 16},
            "epochs": 10,
        })))
        .expect("reversed batch should resolve");

    assert_eq!(literals(&forward), literals(&reversed));
    assert_eq!(
        forward.get_as::<NeuralNet>("model"),
        reversed.get_as::<NeuralNet>("model")
    );
    assert_eq!(
        forward.get_as::<Vec<f64>>("grid"),
        reversed.get_as::<Vec<f64>>("grid")
    );
}
