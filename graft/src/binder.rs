use std::{borrow::Cow, error::Error as StdError, marker::PhantomData};

use crate::{
    shape, Aggregate, Binding, Constructor, DynConstructor, Error, Injectable, Key, Resolver,
    TaggedConstructor,
};

/// Collects the bindings declared by modules.
///
/// Declaration errors, e.g. a constructor taking an unsupported parameter, do not
/// interrupt the declaration; they are collected and reported when the
/// [`Injector`](crate::Injector) is created.
#[derive(Default)]
pub struct Binder {
    bindings: Vec<(Key, Binding)>,
    errors: Vec<Error>,
}

impl Binder {
    /// Creates an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts declaring a binding for `T`.
    pub fn bind<T: Injectable + ?Sized>(&mut self) -> Bind<'_, T> {
        Bind {
            binder: self,
            qualifier: Cow::Borrowed(""),
            _marker: PhantomData,
        }
    }

    /// Returns the number of declared bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether no binding has been declared.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the declaration errors collected so far.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub(crate) fn into_parts(self) -> (Vec<(Key, Binding)>, Vec<Error>) {
        (self.bindings, self.errors)
    }

    fn insert(&mut self, key: Key, binding: Result<Binding, Error>) {
        match shape::verify_binding_key(&key).and(binding) {
            Ok(binding) => self.bindings.push((key, binding)),
            Err(e) => {
                #[cfg(feature = "debug-print")]
                tracing::debug!("(x) invalid binding for {}: {}", key, e);

                self.errors.push(e);
            }
        }
    }
}

/// A binding being declared for `T`, see [`Binder::bind`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use graft::{Binder, Component, Injector};
///
/// #[derive(Clone, Component)]
/// struct Database {
///     #[di(qualifier = "url")]
///     url: String,
/// }
///
/// # fn main() {
/// let mut binder = Binder::new();
///
/// binder
///     .bind::<String>()
///     .qualified("url")
///     .to_singleton("sqlite::memory:".to_string());
///
/// binder.bind::<Arc<Database>>().to_singleton_provider(|r| {
///     let url = r.resolve_with_qualifier::<String>("url")?;
///     Ok::<_, graft::Error>(Arc::new(Database { url }))
/// });
///
/// let injector = Injector::options().create_with(binder).unwrap();
/// let database = injector.resolve::<Arc<Database>>().unwrap();
/// assert_eq!(database.url, "sqlite::memory:");
/// # }
/// ```
pub struct Bind<'a, T: ?Sized> {
    binder: &'a mut Binder,
    qualifier: Cow<'static, str>,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<'a, T: Injectable + ?Sized> Bind<'a, T> {
    /// Sets the qualifier of the binding.
    pub fn qualified(mut self, qualifier: impl Into<Cow<'static, str>>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Returns the key being bound.
    pub fn key(&self) -> Key {
        Key::with_qualifier::<T>(self.qualifier.clone())
    }

    /// Makes the key an alias of the same type bound with `target`.
    ///
    /// An alias never crosses types. To point a contract at an
    /// implementation, bind the contract to a constructor that takes the
    /// implementation and returns it as `Arc<dyn Trait>`:
    ///
    /// ```rust
    /// use std::{convert::Infallible, sync::Arc};
    ///
    /// use graft::{contract, Binder, Component, Injector};
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// contract!(dyn Greeter);
    ///
    /// #[derive(Clone, Component)]
    /// struct English;
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".to_string()
    ///     }
    /// }
    ///
    /// let mut binder = Binder::new();
    /// binder.bind::<Arc<English>>().to_singleton(Arc::new(English));
    /// binder
    ///     .bind::<Arc<dyn Greeter>>()
    ///     .to_constructor(|english: Arc<English>| Ok::<_, Infallible>(english as Arc<dyn Greeter>));
    /// binder.bind::<Arc<dyn Greeter>>().qualified("default").to("");
    ///
    /// let injector = Injector::options().create_with(binder).unwrap();
    /// let greeter = injector.resolve_with_qualifier::<Arc<dyn Greeter>>("default").unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn to(self, target: impl Into<Cow<'static, str>>) {
        let binding = Binding::intermediate(Key::with_qualifier::<T>(target));
        self.finish(Ok(binding));
    }

    fn finish(self, binding: Result<Binding, Error>) {
        let key = self.key();
        self.binder.insert(key, binding);
    }
}

impl<'a, T: Injectable + Send + Sync> Bind<'a, T> {
    /// Binds a pre-built instance.
    pub fn to_singleton(self, value: T) {
        self.finish(Ok(Binding::singleton(value)));
    }

    /// Binds a constructor run on every resolution.
    pub fn to_constructor<Args, C>(self, constructor: C)
    where
        C: Constructor<Args, Output = T>,
    {
        self.finish(DynConstructor::new(constructor).map(Binding::constructor));
    }

    /// Binds a constructor run at most once.
    pub fn to_singleton_constructor<Args, C>(self, constructor: C)
    where
        C: Constructor<Args, Output = T>,
    {
        self.finish(DynConstructor::new(constructor).map(Binding::singleton_constructor));
    }

    /// Binds a constructor taking a parameter bag, run on every resolution.
    pub fn to_tagged_constructor<P, C>(self, constructor: C)
    where
        P: Aggregate,
        C: TaggedConstructor<P, Output = T>,
    {
        self.finish(DynConstructor::tagged(constructor).map(Binding::constructor));
    }

    /// Binds a constructor taking a parameter bag, run at most once.
    pub fn to_tagged_singleton_constructor<P, C>(self, constructor: C)
    where
        P: Aggregate,
        C: TaggedConstructor<P, Output = T>,
    {
        self.finish(DynConstructor::tagged(constructor).map(Binding::singleton_constructor));
    }

    /// Binds a constructor receiving the resolver, run on every resolution.
    pub fn to_provider<E, F>(self, provider: F)
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T, E> + Send + Sync + 'static,
    {
        self.finish(Ok(Binding::constructor(DynConstructor::with_resolver(
            provider,
        ))));
    }

    /// Binds a constructor receiving the resolver, run at most once.
    pub fn to_singleton_provider<E, F>(self, provider: F)
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T, E> + Send + Sync + 'static,
    {
        self.finish(Ok(Binding::singleton_constructor(
            DynConstructor::with_resolver(provider),
        )));
    }
}
