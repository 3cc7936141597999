use std::{
    any::{self, Any},
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use crate::{
    registry::BindingRegistry, resolve_guard::ResolveGuard, shape, Aggregate, Binder, Binding,
    Constructor, DynConstructor, Error, Injectable, Instance, Key, ResolveModule, Resolver,
    TaggedConstructor,
};

/// A container that owns the bindings declared by modules and resolves keys into instances.
///
/// Every binding is checked when the injector is created: a key whose
/// dependencies are not all bound, or that depends on itself, is reported
/// before anything is constructed.
///
/// # Example
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
///
/// use graft::{modules, Binder, Component, Injector, Module};
///
/// #[derive(Clone, Component)]
/// struct A;
///
/// #[derive(Clone, Component)]
/// struct B {
///     a: Arc<A>,
/// }
///
/// struct MyModule;
///
/// impl Module for MyModule {
///     fn configure(binder: &mut Binder) {
///         binder
///             .bind::<Arc<A>>()
///             .to_singleton_constructor(|| Ok::<_, Infallible>(Arc::new(A)));
///         binder
///             .bind::<B>()
///             .to_constructor(|a: Arc<A>| Ok::<_, Infallible>(B { a }));
///     }
/// }
///
/// # fn main() {
/// let injector = Injector::create(modules![MyModule]).unwrap();
///
/// let b1 = injector.resolve::<B>().unwrap();
/// let b2 = injector.resolve::<B>().unwrap();
/// assert!(Arc::ptr_eq(&b1.a, &b2.a));
/// # }
/// ```
pub struct Injector {
    allow_override: bool,
    eager_create: bool,
    loaded_modules: Vec<&'static str>,
    registry: BindingRegistry,
}

impl Injector {
    /// Creates a new injector with the given modules, using the default [`InjectorOptions`].
    ///
    /// # Errors
    ///
    /// See [`InjectorOptions::create`].
    pub fn create(modules: Vec<ResolveModule>) -> Result<Injector, Error> {
        InjectorOptions::default().create(modules)
    }

    /// Returns a new [`InjectorOptions`] object.
    ///
    /// This function returns a new `InjectorOptions` object that you can use to create
    /// an injector with specific options if `create()` is not appropriate.
    ///
    /// It is equivalent to `InjectorOptions::default()`, but allows you to write more
    /// readable code. Instead of `InjectorOptions::default().eager_create(true).create(modules)`,
    /// you can write `Injector::options().eager_create(true).create(modules)`.
    pub fn options() -> InjectorOptions {
        InjectorOptions::default()
    }

    /// Returns whether a binding may replace another one with the same key.
    pub fn allow_override(&self) -> bool {
        self.allow_override
    }

    /// Returns whether singleton constructors were run when the injector was created.
    pub fn eager_create(&self) -> bool {
        self.eager_create
    }

    /// Returns the names of the loaded modules, in loading order.
    pub fn loaded_modules(&self) -> &[&'static str] {
        &self.loaded_modules
    }

    /// Returns the untagged instance of type `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graft::{Binder, Component, Injector};
    ///
    /// #[derive(Clone, Component)]
    /// struct A;
    ///
    /// # fn main() {
    /// let mut binder = Binder::new();
    /// binder.bind::<A>().to_singleton(A);
    ///
    /// let injector = Injector::options().create_with(binder).unwrap();
    /// assert!(injector.resolve::<A>().is_ok());
    /// # }
    /// ```
    pub fn resolve<T>(&self) -> Result<T, Error>
    where
        T: Injectable + Clone,
    {
        (self as &dyn Resolver).resolve()
    }

    /// Returns the instance of type `T` bound with `qualifier`.
    pub fn resolve_with_qualifier<T>(
        &self,
        qualifier: impl Into<Cow<'static, str>>,
    ) -> Result<T, Error>
    where
        T: Injectable + Clone,
    {
        (self as &dyn Resolver).resolve_with_qualifier(qualifier)
    }

    /// Builds a struct by resolving each of its fields.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graft::{Binder, Injector, Params};
    ///
    /// #[derive(Params)]
    /// struct Settings {
    ///     #[di(qualifier = "port")]
    ///     port: u16,
    /// }
    ///
    /// # fn main() {
    /// let mut binder = Binder::new();
    /// binder.bind::<u16>().qualified("port").to_singleton(8080u16);
    ///
    /// let injector = Injector::options().create_with(binder).unwrap();
    /// let settings = injector.populate::<Settings>().unwrap();
    /// assert_eq!(settings.port, 8080);
    /// # }
    /// ```
    pub fn populate<P: Aggregate>(&self) -> Result<P, Error> {
        let ty = P::ty();

        shape::verify_aggregate_shape(&ty)?;

        let instances = shape::derive_field_keys(&ty)?
            .iter()
            .map(|key| self.get(key))
            .collect::<Result<Vec<_>, _>>()?;

        P::from_instances(instances)
    }

    /// Invokes a function whose parameters are resolved by type.
    ///
    /// The function is checked and called the way a constructor bound with
    /// [`Bind::to_constructor`](crate::Bind::to_constructor) would be.
    pub fn call<Args, C>(&self, f: C) -> Result<C::Output, Error>
    where
        C: Constructor<Args>,
    {
        let constructor = DynConstructor::new(f)?;
        self.invoke(constructor)
    }

    /// Invokes a function taking a single parameter bag.
    pub fn call_tagged<P, C>(&self, f: C) -> Result<C::Output, Error>
    where
        P: Aggregate,
        C: TaggedConstructor<P>,
    {
        let constructor = DynConstructor::tagged(f)?;
        self.invoke(constructor)
    }

    /// Returns whether a binding is registered for `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.registry.contains(key)
    }

    /// Returns the binding registered for `key`.
    pub fn binding(&self, key: &Key) -> Option<&Binding> {
        self.registry.get(key)
    }

    /// Returns all bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.registry.keys()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns whether no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    fn invoke<T: Any + Send + Sync>(&self, constructor: DynConstructor) -> Result<T, Error> {
        let key = Key::new(*constructor.ty(), "");
        let instance = Binding::constructor(constructor).produce(self)?;

        instance
            .downcast::<T>()
            .ok()
            .and_then(|value| Arc::try_unwrap(value).ok())
            .ok_or(Error::TypeMismatch {
                key,
                expected: any::type_name::<T>(),
            })
    }

    fn create_eager_instances(&self) -> Result<(), Error> {
        let mut keys = self
            .registry
            .iter()
            .filter(|(_, binding)| matches!(binding, Binding::SingletonConstructor(_)))
            .map(|(key, _)| key)
            .collect::<Vec<_>>();

        keys.sort();

        keys.into_iter().try_for_each(|key| {
            #[cfg(feature = "debug-print")]
            tracing::debug!("(+) eager create: {}", key);

            self.get(key).map(|_| ())
        })
    }
}

impl Resolver for Injector {
    fn get(&self, key: &Key) -> Result<Instance, Error> {
        let _guard = ResolveGuard::push(key)?;

        let Some(binding) = self.registry.get(key) else {
            return Err(Error::NoBinding { key: key.clone() });
        };

        let result = match binding {
            Binding::Intermediate(target) => self.get(target),
            _ => binding.produce(self),
        };

        #[cfg(feature = "debug-print")]
        if let Err(e) = &result {
            tracing::debug!("(x) failed to resolve {}: {}", key, e);
        }

        result
    }
}

/// Options and flags which can be used to configure how an injector is created.
///
/// This builder expose the ability to configure how an [`Injector`] is created.
/// The [`Injector::create`] method is an alias for commonly used options using this builder.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
///
/// use graft::{modules, Binder, Component, InjectorOptions, Module};
///
/// #[derive(Clone, Component)]
/// struct A;
///
/// struct Module1;
///
/// impl Module for Module1 {
///     fn configure(binder: &mut Binder) {
///         binder.bind::<A>().to_singleton(A);
///     }
/// }
///
/// struct Module2;
///
/// impl Module for Module2 {
///     fn configure(binder: &mut Binder) {
///         binder
///             .bind::<A>()
///             .to_singleton_constructor(|| Ok::<_, Infallible>(A));
///     }
/// }
///
/// # fn main() {
/// let injector = InjectorOptions::default()
///     .allow_override(true)
///     .eager_create(true)
///     .create(modules![Module1, Module2])
///     .unwrap();
///
/// assert!(injector.resolve::<A>().is_ok());
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InjectorOptions {
    allow_override: bool,
    eager_create: bool,
    validate: bool,
}

impl Default for InjectorOptions {
    fn default() -> Self {
        Self {
            allow_override: false,
            eager_create: false,
            validate: true,
        }
    }
}

impl InjectorOptions {
    /// Sets the option for whether a binding may replace another one with the same key.
    ///
    /// Default is `false`, in which case the second binding is reported as
    /// [`Error::AlreadyBound`].
    pub fn allow_override(mut self, allow_override: bool) -> Self {
        self.allow_override = allow_override;
        self
    }

    /// Sets the option for whether every singleton constructor is run when the injector is created.
    pub fn eager_create(mut self, eager_create: bool) -> Self {
        self.eager_create = eager_create;
        self
    }

    /// Sets the option for whether the dependency graph is checked when the injector is created.
    ///
    /// Default is `true`. When disabled, missing bindings and cycles are only
    /// reported when the offending key is resolved.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Creates an injector with the bindings declared by the given modules and their submodules.
    ///
    /// Submodules are loaded right after the module declaring them.
    ///
    /// # Errors
    ///
    /// - The first error met while declaring a binding, e.g. [`Error::UnsupportedBindingKey`].
    /// - [`Error::AlreadyBound`] if overriding is disabled and a key is bound twice.
    /// - [`Error::NoBinding`] or [`Error::CircularDependency`] if validation is enabled
    ///   and the dependency graph is incomplete or cyclic.
    /// - The first error met while eagerly creating singletons.
    pub fn create(self, modules: Vec<ResolveModule>) -> Result<Injector, Error> {
        let mut binder = Binder::new();
        let mut loaded_modules = Vec::new();

        // A module is configured before its submodules, and those before its next sibling.
        let mut pending = vec![modules.into_iter()];

        while let Some(level) = pending.last_mut() {
            let mut module = match level.next() {
                Some(module) => module,
                None => {
                    pending.pop();
                    continue;
                }
            };

            #[cfg(feature = "debug-print")]
            tracing::debug!("(+) load module: {}", module.name());

            loaded_modules.push(module.name());
            module.configure(&mut binder);

            if let Some(submodules) = module.submodules() {
                pending.push(submodules.into_iter());
            }
        }

        self.build(binder, loaded_modules)
    }

    /// Creates an injector with the bindings declared on `binder`.
    ///
    /// # Errors
    ///
    /// See [`InjectorOptions::create`].
    pub fn create_with(self, binder: Binder) -> Result<Injector, Error> {
        self.build(binder, Vec::new())
    }

    fn build(self, binder: Binder, loaded_modules: Vec<&'static str>) -> Result<Injector, Error> {
        let (bindings, errors) = binder.into_parts();

        if let Some(e) = errors.into_iter().next() {
            return Err(e);
        }

        let mut registry = BindingRegistry::default();

        for (key, binding) in bindings {
            registry.insert(key, binding, self.allow_override)?;
        }

        if self.validate {
            validate(&registry)?;
        }

        #[cfg(feature = "debug-print")]
        tracing::debug!("(+) injector created with {} bindings", registry.len());

        let injector = Injector {
            allow_override: self.allow_override,
            eager_create: self.eager_create,
            loaded_modules,
            registry,
        };

        if injector.eager_create {
            injector.create_eager_instances()?;
        }

        Ok(injector)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

// Depth-first walk over the keys each binding needs before it can produce.
// Providers receiving the resolver have no parameter keys and are left to
// the runtime check.
fn validate(registry: &BindingRegistry) -> Result<(), Error> {
    let graph = registry
        .iter()
        .map(|(key, binding)| (key, dependencies(binding)))
        .collect::<BTreeMap<_, _>>();

    let mut visits = HashMap::with_capacity(graph.len());
    let mut path = Vec::new();

    graph
        .keys()
        .try_for_each(|&key| visit(key, &graph, &mut visits, &mut path))
}

fn dependencies(binding: &Binding) -> &[Key] {
    match binding {
        Binding::Intermediate(target) => std::slice::from_ref(target),
        Binding::Singleton(_) => &[],
        _ => match binding.dyn_constructor() {
            Some(constructor) => constructor.parameters(),
            None => &[],
        },
    }
}

fn visit<'a>(
    key: &'a Key,
    graph: &BTreeMap<&'a Key, &'a [Key]>,
    visits: &mut HashMap<&'a Key, Visit>,
    path: &mut Vec<&'a Key>,
) -> Result<(), Error> {
    match visits.get(key) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            let start = path.iter().position(|k| *k == key).unwrap_or(0);
            let mut chain = path[start..]
                .iter()
                .map(|k| (*k).clone())
                .collect::<Vec<_>>();
            chain.push(key.clone());

            return Err(Error::CircularDependency { chain });
        }
        None => {}
    }

    let Some(&dependencies) = graph.get(key) else {
        return Err(Error::NoBinding { key: key.clone() });
    };

    visits.insert(key, Visit::InProgress);
    path.push(key);

    for dependency in dependencies {
        visit(dependency, graph, visits, path)?;
    }

    path.pop();
    visits.insert(key, Visit::Done);

    Ok(())
}
