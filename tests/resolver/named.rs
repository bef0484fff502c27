use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use paramforge::{
    registry::{NamedEntry, NamedObjectRegistry},
    resolver::{ObjectResolver, ResolveErrorKind, ResolveOptions},
    types::Resolved,
};
use serde_json::json;

use crate::{Adam, batch, model_types};

fn counting_registry(calls: &Arc<AtomicUsize>) -> NamedObjectRegistry {
    let counter = Arc::clone(calls);
    let mut named = NamedObjectRegistry::new();
    named.register_factory("optimizer", "adam", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Adam { lr: 0.001 }
    });
    named
}

#[test]
fn given_factory_when_resolving_twice_then_instances_are_distinct() {
    let calls = Arc::new(AtomicUsize::new(0));
    let named = counting_registry(&calls);
    let resolver = ObjectResolver::new(None, &named, ResolveOptions::default());
    let declarations = batch(json!({"optimizer": "adam"}));

    let first = resolver.resolve(&declarations).expect("first resolution");
    let second = resolver.resolve(&declarations).expect("second resolution");

    let first = first
        .get("optimizer")
        .and_then(Resolved::as_instance)
        .expect("optimizer is an object");
    let second = second
        .get("optimizer")
        .and_then(Resolved::as_instance)
        .expect("optimizer is an object");
    assert!(!first.ptr_eq(second));
    assert_eq!(first.downcast_ref::<Adam>(), second.downcast_ref::<Adam>());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn given_shared_object_when_resolving_twice_then_instance_is_shared() {
    let mut named = NamedObjectRegistry::new();
    named.register_shared("optimizer", "adam", Adam { lr: 0.01 });
    let resolver = ObjectResolver::new(None, &named, ResolveOptions::default());
    let declarations = batch(json!({"optimizer": "adam"}));

    let first = resolver.resolve(&declarations).expect("first resolution");
    let second = resolver.resolve(&declarations).expect("second resolution");

    let first = first.get("optimizer").and_then(Resolved::as_instance);
    let second = second.get("optimizer").and_then(Resolved::as_instance);
    assert!(matches!((first, second), (Some(a), Some(b)) if a.ptr_eq(b)));
}

#[test]
fn given_string_for_parameter_without_entries_then_it_is_a_literal() {
    let calls = Arc::new(AtomicUsize::new(0));
    let named = counting_registry(&calls);
    let resolver = ObjectResolver::new(
        None,
        &named,
        ResolveOptions::default().with_passthrough_unclassified(true),
    );

    let resolved = resolver
        .resolve(&batch(json!({"activation": "adam"})))
        .expect("resolution should succeed");

    assert!(matches!(
        resolved.get("activation"),
        Some(Resolved::Literal(value)) if value == "adam"
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn given_unknown_object_name_when_raising_then_resolution_fails() {
    let calls = Arc::new(AtomicUsize::new(0));
    let named = counting_registry(&calls);
    let resolver = ObjectResolver::new(None, &named, ResolveOptions::default());

    let err = resolver
        .resolve(&batch(json!({"optimizer": "sgd"})))
        .expect_err("unknown object name should fail");

    assert_eq!(err.kind, ResolveErrorKind::UnknownNamedObject);
    assert_eq!(err.parameters, vec!["optimizer".to_string()]);
}

#[test]
fn given_unknown_object_name_when_degrading_then_parameter_is_skipped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let named = counting_registry(&calls);
    let resolver = ObjectResolver::new(
        None,
        &named,
        ResolveOptions::default()
            .with_raise_on_unknown_named_object(false)
            .with_passthrough_unclassified(true),
    );

    let resolved = resolver
        .resolve(&batch(json!({"optimizer": "sgd", "epochs": 10})))
        .expect("degraded resolution should succeed");

    assert!(!resolved.contains("optimizer"));
    assert!(resolved.contains("epochs"));
    assert_eq!(resolved.degraded()[0].kind, ResolveErrorKind::UnknownNamedObject);
}

#[test]
fn given_named_object_when_referenced_then_packed_object_receives_it() {
    let mut named = NamedObjectRegistry::new();
    named.register("width", "wide", NamedEntry::shared(json!(512)));
    let types = model_types();
    let resolver = ObjectResolver::new(Some(&types), &named, ResolveOptions::default());

    let resolved = resolver
        .resolve(&batch(json!({
            "model": {"class": "NeuralNet", "args": [2, "$width"]},
            "width": "wide",
        })))
        .expect("resolution should succeed");

    assert_eq!(
        resolved.get_as::<crate::NeuralNet>("model").map(|net| net.hidden),
        Some(512)
    );
}
