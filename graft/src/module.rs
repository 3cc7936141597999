use std::any::{self, TypeId};

use crate::Binder;

/// Represents a module.
///
/// # Example
///
/// ```rust
/// use graft::{modules, Binder, Component, Injector, Module};
///
/// #[derive(Clone, Component)]
/// struct Config;
///
/// #[derive(Clone, Component)]
/// struct Cache;
///
/// struct Module1;
///
/// impl Module for Module1 {
///     fn configure(binder: &mut Binder) {
///         binder.bind::<Config>().to_singleton(Config);
///     }
/// }
///
/// struct Module2;
///
/// impl Module for Module2 {
///     fn submodules() -> Option<Vec<graft::ResolveModule>> {
///         Some(modules![Module1])
///     }
///
///     fn configure(binder: &mut Binder) {
///         binder.bind::<Cache>().to_singleton(Cache);
///     }
/// }
///
/// # fn main() {
/// let injector = Injector::create(modules![Module2]).unwrap();
/// assert!(injector.resolve::<Config>().is_ok());
/// assert!(injector.resolve::<Cache>().is_ok());
/// # }
/// ```
pub trait Module {
    /// Included submodules, default is None.
    fn submodules() -> Option<Vec<ResolveModule>> {
        None
    }

    /// Declares the bindings of the module.
    fn configure(binder: &mut Binder);
}

/// A type representing a Module, converted from a type that implements [`Module`].
pub struct ResolveModule {
    id: TypeId,
    name: &'static str,
    submodules: Option<Vec<ResolveModule>>,
    configure: fn(&mut Binder),
}

impl ResolveModule {
    /// Create a [`ResolveModule`] from a type that implements [`Module`].
    pub fn new<T: Module + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            submodules: T::submodules(),
            configure: T::configure,
        }
    }

    /// TypeId of the type that is converted to a ResolveModule.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name of the type that is converted to a ResolveModule.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn submodules(&mut self) -> Option<Vec<ResolveModule>> {
        self.submodules.take()
    }

    pub(crate) fn configure(&self, binder: &mut Binder) {
        (self.configure)(binder)
    }
}
