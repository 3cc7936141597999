use std::{
    convert::Infallible,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use graft::{contract, Binder, Binding, Component, Error, Injector, Key, Params, Resolver};

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

contract!(dyn Greeter);

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Clone, Component)]
struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

#[derive(Clone, Component)]
struct A;

#[derive(Clone, Component)]
struct B;

fn create(binder: Binder) -> Result<Injector, Error> {
    Injector::options().create_with(binder)
}

#[test]
fn resolve_singleton_and_constructor() {
    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton(Arc::new(A));
    binder
        .bind::<Arc<B>>()
        .to_constructor(|| Ok::<_, Infallible>(Arc::new(B)));

    let injector = create(binder).unwrap();

    let a1 = injector.resolve::<Arc<A>>().unwrap();
    let a2 = injector.resolve::<Arc<A>>().unwrap();
    assert!(Arc::ptr_eq(&a1, &a2));

    let b1 = injector.resolve::<Arc<B>>().unwrap();
    let b2 = injector.resolve::<Arc<B>>().unwrap();
    assert!(!Arc::ptr_eq(&b1, &b2));
}

#[test]
fn resolve_unbound_key() {
    let injector = create(Binder::new()).unwrap();

    match injector.resolve::<Arc<A>>() {
        Err(Error::NoBinding { key }) => assert_eq!(key, Key::of::<Arc<A>>()),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn qualifiers_separate_bindings() {
    let mut binder = Binder::new();
    binder.bind::<u16>().qualified("http").to_singleton(80u16);
    binder.bind::<u16>().qualified("https").to_singleton(443u16);

    let injector = create(binder).unwrap();

    assert_eq!(injector.resolve_with_qualifier::<u16>("http").unwrap(), 80);
    assert_eq!(injector.resolve_with_qualifier::<u16>("https").unwrap(), 443);
}

#[test]
fn alias_resolves_its_target() {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<A>>()
        .qualified("primary")
        .to_singleton(Arc::new(A));
    binder.bind::<Arc<A>>().to("primary");

    let injector = create(binder).unwrap();

    let aliased = injector.resolve::<Arc<A>>().unwrap();
    let target = injector.resolve_with_qualifier::<Arc<A>>("primary").unwrap();
    assert!(Arc::ptr_eq(&aliased, &target));

    assert!(matches!(
        injector.binding(&Key::of::<Arc<A>>()),
        Some(Binding::Intermediate(key)) if key == &Key::with_qualifier::<Arc<A>>("primary")
    ));
}

#[test]
fn chained_aliases() {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<dyn Greeter>>()
        .qualified("english")
        .to_singleton(Arc::new(English) as Arc<dyn Greeter>);
    binder.bind::<dyn Greeter>().qualified("default").to("english");
    binder.bind::<dyn Greeter>().to("default");

    let injector = create(binder).unwrap();

    let greeter = injector.resolve::<Arc<dyn Greeter>>().unwrap();
    assert_eq!(greeter.greet(), "hello");
}

#[test]
fn dangling_alias_is_reported_at_creation() {
    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to("missing");

    match create(binder) {
        Err(Error::NoBinding { key }) => {
            assert_eq!(key, Key::with_qualifier::<Arc<A>>("missing"))
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_dependency_is_reported_at_creation() {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<B>>()
        .to_constructor(|_: Arc<A>| Ok::<_, Infallible>(Arc::new(B)));

    match create(binder) {
        Err(Error::NoBinding { key }) => assert_eq!(key, Key::of::<Arc<A>>()),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

fn cyclic_binder() -> Binder {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<A>>()
        .to_constructor(|_: Arc<B>| Ok::<_, Infallible>(Arc::new(A)));
    binder
        .bind::<Arc<B>>()
        .to_singleton_constructor(|_: Arc<A>| Ok::<_, Infallible>(Arc::new(B)));
    binder
}

#[test]
fn cycle_is_reported_at_creation() {
    match create(cyclic_binder()) {
        Err(Error::CircularDependency { chain }) => {
            assert_eq!(chain.len(), 3);
            assert_eq!(chain.first(), chain.last());
            assert!(chain.contains(&Key::of::<Arc<A>>()));
            assert!(chain.contains(&Key::of::<Arc<B>>()));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn cycle_is_reported_at_resolution_without_validation() {
    let injector = Injector::options()
        .validate(false)
        .create_with(cyclic_binder())
        .unwrap();

    for _ in 0..2 {
        match injector.resolve::<Arc<A>>() {
            Err(Error::CircularDependency { chain }) => assert_eq!(
                chain,
                vec![Key::of::<Arc<A>>(), Key::of::<Arc<B>>(), Key::of::<Arc<A>>()]
            ),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn self_alias_is_a_cycle() {
    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().qualified("x").to("y");
    binder.bind::<Arc<A>>().qualified("y").to("x");

    assert!(matches!(
        create(binder),
        Err(Error::CircularDependency { .. })
    ));
}

#[test]
fn provider_cycle_is_caught_at_resolution() {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<A>>()
        .to_provider(|r| r.resolve::<Arc<A>>());
    binder.bind::<Arc<B>>().to_singleton(Arc::new(B));

    let injector = create(binder).unwrap();

    match injector.resolve::<Arc<A>>() {
        Err(Error::CircularDependency { chain }) => {
            assert_eq!(chain, vec![Key::of::<Arc<A>>(), Key::of::<Arc<A>>()])
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    // the failed resolution leaves nothing behind on this thread
    assert!(injector.resolve::<Arc<B>>().is_ok());
}

#[test]
fn provider_pulls_dependencies_from_the_resolver() {
    let mut binder = Binder::new();
    binder
        .bind::<String>()
        .qualified("name")
        .to_singleton("graft".to_string());
    binder.bind::<Arc<dyn Greeter>>().to_singleton_provider(|r| {
        let name = r.resolve_with_qualifier::<String>("name")?;

        struct Named(String);

        impl Greeter for Named {
            fn greet(&self) -> String {
                format!("hello, {}", self.0)
            }
        }

        Ok::<_, Error>(Arc::new(Named(name)) as Arc<dyn Greeter>)
    });

    let injector = create(binder).unwrap();

    let greeter = injector.resolve::<Arc<dyn Greeter>>().unwrap();
    assert_eq!(greeter.greet(), "hello, graft");
}

#[test]
fn unsupported_binding_key_is_reported_at_creation() {
    let mut binder = Binder::new();
    binder.bind::<u16>().to_singleton(8080u16);

    assert_eq!(binder.errors().len(), 1);
    assert!(binder.is_empty());

    match create(binder) {
        Err(Error::UnsupportedBindingKey { key }) => assert_eq!(key, Key::of::<u16>()),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn unsupported_parameter_is_reported_at_creation() {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<A>>()
        .to_constructor(|_: u16| Ok::<_, Infallible>(Arc::new(A)));

    assert!(matches!(
        create(binder),
        Err(Error::UnsupportedParameterShape { .. })
    ));
}

#[test]
fn duplicate_key_is_rejected_by_default() {
    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton(Arc::new(A));
    binder.bind::<Arc<A>>().to_singleton(Arc::new(A));

    match create(binder) {
        Err(Error::AlreadyBound { key }) => assert_eq!(key, Key::of::<Arc<A>>()),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn duplicate_key_overrides_when_allowed() {
    let first = Arc::new(A);
    let second = Arc::new(A);

    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton(Arc::clone(&first));
    binder.bind::<Arc<A>>().to_singleton(Arc::clone(&second));

    let injector = Injector::options()
        .allow_override(true)
        .create_with(binder)
        .unwrap();

    assert!(injector.allow_override());
    assert_eq!(injector.len(), 1);

    let resolved = injector.resolve::<Arc<A>>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &second));
    assert!(!Arc::ptr_eq(&resolved, &first));
}

#[test]
fn singletons_are_created_lazily_by_default() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton_constructor(move || {
        c.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>(Arc::new(A))
    });

    let injector = create(binder).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 0);

    injector.resolve::<Arc<A>>().unwrap();
    injector.resolve::<Arc<A>>().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn eager_create_runs_singleton_constructors() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton_constructor(move || {
        c.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>(Arc::new(A))
    });
    binder
        .bind::<Arc<B>>()
        .to_constructor(|| Ok::<_, Infallible>(Arc::new(B)));

    let injector = Injector::options()
        .eager_create(true)
        .create_with(binder)
        .unwrap();

    assert!(injector.eager_create());
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(matches!(
        injector.binding(&Key::of::<Arc<A>>()),
        Some(Binding::SingletonConstructor(singleton)) if singleton.is_constructed()
    ));

    injector.resolve::<Arc<A>>().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn eager_create_surfaces_constructor_errors() {
    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton_constructor(|| {
        Err::<Arc<A>, _>(io::Error::new(io::ErrorKind::Other, "no connection"))
    });

    match Injector::options().eager_create(true).create_with(binder) {
        Err(Error::Constructor(e)) => assert_eq!(e.to_string(), "no connection"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn failed_singleton_is_not_retried() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);

    let mut binder = Binder::new();
    binder.bind::<Arc<A>>().to_singleton_constructor(move || {
        c.fetch_add(1, Ordering::SeqCst);
        Err::<Arc<A>, _>(io::Error::new(io::ErrorKind::Other, "no connection"))
    });

    let injector = create(binder).unwrap();

    assert!(injector.resolve::<Arc<A>>().is_err());
    assert!(injector.resolve::<Arc<A>>().is_err());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[derive(Clone, Component)]
struct Server {
    greeter: Arc<dyn Greeter>,
    #[di(qualifier = "port")]
    port: u16,
}

fn server_binder() -> Binder {
    let mut binder = Binder::new();
    binder
        .bind::<Arc<dyn Greeter>>()
        .to_singleton(Arc::new(English) as Arc<dyn Greeter>);
    binder.bind::<u16>().qualified("port").to_singleton(8080u16);
    binder
}

#[test]
fn populate_resolves_each_field() {
    let injector = create(server_binder()).unwrap();

    let server = injector.populate::<Server>().unwrap();

    assert_eq!(server.port, 8080);
    assert_eq!(server.greeter.greet(), "hello");
}

#[test]
fn populate_rejects_unqualified_constants() {
    #[derive(Clone, Component)]
    struct Unqualified {
        #[allow(dead_code)]
        port: u16,
    }

    let injector = create(server_binder()).unwrap();

    assert!(matches!(
        injector.populate::<Unqualified>(),
        Err(Error::UnsupportedParameterShape { .. })
    ));
}

#[test]
fn bound_component_is_resolved_by_value() {
    let mut binder = server_binder();
    binder
        .bind::<Arc<Server>>()
        .to_singleton_constructor(|greeter: Arc<dyn Greeter>| {
            Ok::<_, Infallible>(Arc::new(Server { greeter, port: 0 }))
        });

    let injector = create(binder).unwrap();

    let server = injector.resolve::<Arc<Server>>().unwrap();
    assert_eq!(server.port, 0);
}

#[test]
fn call_resolves_parameters() {
    let injector = create(server_binder()).unwrap();

    let greeting = injector
        .call(|greeter: Arc<dyn Greeter>| Ok::<_, Infallible>(greeter.greet()))
        .unwrap();

    assert_eq!(greeting, "hello");
}

#[test]
fn call_reports_missing_parameters() {
    let injector = create(server_binder()).unwrap();

    match injector.call(|_: Arc<A>| Ok::<_, Infallible>(())) {
        Err(Error::NoBinding { key }) => assert_eq!(key, Key::of::<Arc<A>>()),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn call_tagged_resolves_the_parameter_bag() {
    #[derive(Params)]
    struct Listen {
        #[di(qualifier = "port")]
        port: u16,
    }

    let injector = create(server_binder()).unwrap();

    let address = injector
        .call_tagged(|listen: Listen| Ok::<_, Infallible>(format!("0.0.0.0:{}", listen.port)))
        .unwrap();

    assert_eq!(address, "0.0.0.0:8080");
}

#[test]
fn injector_is_usable_as_a_resolver() {
    let injector = create(server_binder()).unwrap();
    let resolver: &dyn Resolver = &injector;

    assert_eq!(resolver.resolve_with_qualifier::<u16>("port").unwrap(), 8080);
    assert!(resolver.get(&Key::of::<Arc<A>>()).is_err());
}

#[test]
fn inspect_bindings() {
    let injector = create(server_binder()).unwrap();

    assert_eq!(injector.len(), 2);
    assert!(!injector.is_empty());
    assert!(injector.contains(&Key::of::<dyn Greeter>()));
    assert!(injector.contains(&Key::with_qualifier::<u16>("port")));
    assert!(!injector.contains(&Key::of::<u16>()));

    let mut keys = injector.keys().cloned().collect::<Vec<_>>();
    keys.sort();

    let mut expected = vec![
        Key::of::<Arc<dyn Greeter>>(),
        Key::with_qualifier::<u16>("port"),
    ];
    expected.sort();

    assert_eq!(keys, expected);
}

#[test]
fn contract_points_at_implementation_through_constructor() {
    let mut binder = Binder::new();
    binder.bind::<Arc<French>>().to_singleton(Arc::new(French));
    binder
        .bind::<Arc<dyn Greeter>>()
        .to_singleton_constructor(|french: Arc<French>| Ok::<_, Infallible>(french as Arc<dyn Greeter>));
    binder.bind::<Arc<dyn Greeter>>().qualified("fallback").to("");

    let injector = create(binder).unwrap();

    let greeter = injector.resolve::<Arc<dyn Greeter>>().unwrap();
    let fallback = injector.resolve_with_qualifier::<Arc<dyn Greeter>>("fallback").unwrap();

    assert_eq!(greeter.greet(), "bonjour");
    assert!(Arc::ptr_eq(&greeter, &fallback));
    assert_eq!(
        injector.binding(&Key::with_qualifier::<Arc<dyn Greeter>>("fallback")).map(Binding::kind),
        Some(graft::BindingKind::Intermediate)
    );
}
