use paramforge::{
    builtins::Range,
    registry::NamedObjectRegistry,
    resolver::{ObjectResolver, ResolutionOrder, ResolveErrorKind, ResolveOptions, build_order},
};
use serde_json::json;

use crate::{batch, model_types};

fn forward_reference() -> serde_json::Value {
    json!({
        "window": {"class": "range", "args": ["$lo"], "stop": "$hi"},
        "lo": 1,
        "hi": 4,
    })
}

#[test]
fn given_forward_reference_when_dependency_order_then_target_resolves_first() {
    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(
        Some(&types),
        &named,
        ResolveOptions::default().with_passthrough_unclassified(true),
    );

    let resolved = resolver
        .resolve(&batch(forward_reference()))
        .expect("dependency order should resolve forward references");

    assert_eq!(resolved.get_as::<Range>("window"), Some(&Range::new(1, 4)));
    assert_eq!(resolved.names().collect::<Vec<_>>(), vec!["lo", "hi", "window"]);
}

#[test]
fn given_forward_reference_when_declaration_order_then_unresolved_reference() {
    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(
        Some(&types),
        &named,
        ResolveOptions::default()
            .with_passthrough_unclassified(true)
            .with_order(ResolutionOrder::Declaration),
    );

    let err = resolver
        .resolve(&batch(forward_reference()))
        .expect_err("declaration order should not reorder");

    assert_eq!(err.kind, ResolveErrorKind::UnresolvedReference);
    assert_eq!(err.parameters, vec!["window".to_string(), "lo".to_string()]);
}

#[test]
fn given_reference_to_dropped_literal_then_unresolved_reference() {
    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(Some(&types), &named, ResolveOptions::default());

    let err = resolver
        .resolve(&batch(json!({"lo": 1, "window": {"class": "range", "args": ["$lo", 3]}})))
        .expect_err("unclassified literals are dropped without passthrough");

    assert_eq!(err.kind, ResolveErrorKind::UnresolvedReference);
}

#[test]
fn given_mutual_references_when_resolving_then_cyclic_dependency() {
    let declarations = batch(json!({
        "a": {"class": "range", "args": ["$b", 1]},
        "b": {"class": "range", "args": ["$a", 1]},
    }));

    let err = build_order(&declarations).expect_err("cycle should fail");
    assert_eq!(err.kind, ResolveErrorKind::CyclicDependency);
    assert_eq!(err.parameters, vec!["a".to_string(), "b".to_string()]);

    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(Some(&types), &named, ResolveOptions::default());
    let err = resolver
        .resolve(&declarations)
        .expect_err("cycle should abort resolution");
    assert_eq!(err.kind, ResolveErrorKind::CyclicDependency);
}

#[test]
fn given_chain_of_packed_objects_when_resolving_then_objects_flow_downstream() {
    let types = model_types();
    let named = NamedObjectRegistry::new();
    let resolver = ObjectResolver::new(
        Some(&types),
        &named,
        ResolveOptions::default().with_passthrough_unclassified(true),
    );

    let resolved = resolver
        .resolve(&batch(json!({
            "model": {"class": "NeuralNet", "layers": "$depth", "hidden": "$width"},
            "width": 32,
            "depth": 2,
        })))
        .expect("resolution should succeed");

    assert_eq!(
        resolved.names().collect::<Vec<_>>(),
        vec!["width", "depth", "model"]
    );
}
