use std::sync::Arc;

use graft::{
    contract, Aggregate, AggregateKind, Component, Error, Injectable, Instance, Key, Kind, Params,
    Type,
};

trait Clock: Send + Sync {}

contract!(dyn Clock);

#[derive(Clone, Debug, PartialEq, Component)]
struct Unit;

#[derive(Clone, Component)]
struct Named {
    clock: Arc<dyn Clock>,
    #[di(qualifier = "timeout")]
    timeout: u64,
}

#[derive(Clone, Debug, PartialEq, Component)]
struct Tuple(Arc<Unit>, #[di(qualifier = "label")] String);

#[derive(Params)]
struct Bag {
    #[di(qualifier = "retries")]
    retries: u32,
}

#[derive(Clone, Component)]
struct Wrapper<T: Clone>(Arc<T>);

fn kind_of<T: Injectable>() -> AggregateKind {
    match T::ty().kind {
        Kind::Aggregate { kind, .. } => kind,
        kind => panic!("not an aggregate: {:?}", kind),
    }
}

#[test]
fn component_and_params_kinds() {
    assert_eq!(kind_of::<Unit>(), AggregateKind::Named);
    assert_eq!(kind_of::<Named>(), AggregateKind::Named);
    assert_eq!(kind_of::<Tuple>(), AggregateKind::Named);
    assert_eq!(kind_of::<Bag>(), AggregateKind::Anonymous);
}

#[test]
fn named_fields_keep_declaration_order_and_qualifiers() {
    let fields = Named::fields();

    assert_eq!(fields.len(), 2);

    assert_eq!(fields[0].name, "clock");
    assert_eq!(fields[0].ty, Type::of::<Arc<dyn Clock>>());
    assert_eq!(fields[0].qualifier, "");

    assert_eq!(fields[1].name, "timeout");
    assert_eq!(fields[1].ty, Type::of::<u64>());
    assert_eq!(fields[1].qualifier, "timeout");
}

#[test]
fn tuple_fields_are_named_by_index() {
    let names = Tuple::fields()
        .into_iter()
        .map(|field| (field.name, field.qualifier))
        .collect::<Vec<_>>();

    assert_eq!(names, vec![("0", ""), ("1", "label")]);
}

#[test]
fn unit_struct_has_no_fields() {
    assert!(Unit::fields().is_empty());
    assert_eq!(Unit::from_instances(Vec::new()).unwrap(), Unit);
}

#[test]
fn from_instances_builds_in_declaration_order() {
    let instances: Vec<Instance> = vec![Arc::new(Arc::new(Unit)), Arc::new("x".to_string())];

    let tuple = Tuple::from_instances(instances).unwrap();

    assert_eq!(tuple, Tuple(Arc::new(Unit), "x".to_string()));
}

#[test]
fn from_instances_reports_missing_instances() {
    let instances: Vec<Instance> = vec![Arc::new(Arc::new(Unit))];

    match Tuple::from_instances(instances) {
        Err(Error::MissingArgument { key }) => {
            assert_eq!(key, Key::with_qualifier::<String>("label"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn from_instances_reports_mismatched_instances() {
    let instances: Vec<Instance> = vec![Arc::new(7u32)];

    match Bag::from_instances(instances) {
        Ok(bag) => assert_eq!(bag.retries, 7),
        Err(e) => panic!("unexpected error: {}", e),
    }

    let instances: Vec<Instance> = vec![Arc::new(7u64)];

    assert!(matches!(
        Bag::from_instances(instances),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn generic_components_are_distinct_types() {
    #[derive(Clone, Component)]
    struct Other;

    assert_ne!(Type::of::<Wrapper<Unit>>(), Type::of::<Wrapper<Other>>());
    assert_eq!(
        Wrapper::<Unit>::fields()[0].ty,
        Type::of::<Arc<Unit>>()
    );

    let wrapper =
        Wrapper::<Unit>::from_instances(vec![Arc::new(Arc::new(Unit)) as Instance]).unwrap();
    assert_eq!(*wrapper.0, Unit);
}

mod reexport {
    pub(crate) use graft;
}

#[test]
fn custom_graft_path() {
    #[derive(Clone, Component)]
    #[di(graft_path = crate::reexport::graft)]
    struct Renamed;

    assert_eq!(kind_of::<Renamed>(), AggregateKind::Named);
}

#[test]
fn named_component_fields_are_read() {
    struct System;

    impl Clock for System {}

    let named = Named {
        clock: Arc::new(System),
        timeout: 30,
    };

    let fields = Named::fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(named.timeout, 30);
    let _clock: Arc<dyn Clock> = named.clock;
}
