use std::{any::Any, fmt, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    construction::{self, CellId, Entered},
    DynConstructor, Error, Instance, Key, Resolver,
};

/// Represents the kind of a [`Binding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKind {
    /// forwards to another key, never produces a value.
    Intermediate,
    /// holds a pre-built instance.
    Singleton,
    /// runs its constructor on every resolution.
    Constructor,
    /// runs its constructor at most once, then replays the result.
    SingletonConstructor,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingKind::Intermediate => "intermediate",
            BindingKind::Singleton => "singleton",
            BindingKind::Constructor => "constructor",
            BindingKind::SingletonConstructor => "singleton constructor",
        })
    }
}

/// Represents a rule describing how to obtain the value of a [`Key`].
///
/// Exactly one of [`Binding::produce`] and [`Binding::forwarding_key`] is meaningful
/// for each variant, calling the other one returns an error.
///
/// # Example
///
/// ```rust
/// use graft::{Binding, Component, Error, Key};
///
/// #[derive(Clone, Component)]
/// struct A;
///
/// # fn main() {
/// let alias = Binding::intermediate(Key::with_qualifier::<A>("primary"));
/// assert_eq!(alias.forwarding_key().unwrap(), &Key::with_qualifier::<A>("primary"));
///
/// let singleton = Binding::singleton(A);
/// assert!(matches!(singleton.forwarding_key(), Err(Error::FinalBinding { .. })));
/// # }
/// ```
pub enum Binding {
    /// An alias of another key.
    Intermediate(Key),
    /// A pre-built instance.
    Singleton(Instance),
    /// A constructor run on every resolution.
    Constructor(DynConstructor),
    /// A constructor run at most once.
    SingletonConstructor(SingletonConstructor),
}

impl Binding {
    /// Creates a binding that forwards to `key`.
    pub fn intermediate(key: Key) -> Self {
        Binding::Intermediate(key)
    }

    /// Creates a binding holding `value`.
    pub fn singleton<T: Any + Send + Sync>(value: T) -> Self {
        Binding::Singleton(Arc::new(value))
    }

    /// Creates a binding that runs `constructor` on every resolution.
    pub fn constructor(constructor: DynConstructor) -> Self {
        Binding::Constructor(constructor)
    }

    /// Creates a binding that runs `constructor` at most once.
    pub fn singleton_constructor(constructor: DynConstructor) -> Self {
        Binding::SingletonConstructor(SingletonConstructor::new(constructor))
    }

    /// Returns the kind of the binding.
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Intermediate(_) => BindingKind::Intermediate,
            Binding::Singleton(_) => BindingKind::Singleton,
            Binding::Constructor(_) => BindingKind::Constructor,
            Binding::SingletonConstructor(_) => BindingKind::SingletonConstructor,
        }
    }

    /// Returns the constructor of the binding, if any.
    pub fn dyn_constructor(&self) -> Option<&DynConstructor> {
        match self {
            Binding::Constructor(constructor) => Some(constructor),
            Binding::SingletonConstructor(singleton) => Some(&singleton.constructor),
            Binding::Intermediate(_) | Binding::Singleton(_) => None,
        }
    }

    /// Produces the value of the binding, resolving constructor parameters from `resolver`.
    ///
    /// # Errors
    ///
    /// - [`Error::IntermediateBinding`] for an intermediate binding, which must be
    ///   forwarded with [`Binding::forwarding_key`] instead.
    /// - The first error met while resolving a constructor parameter, in which case
    ///   the constructor is not invoked and later parameters are not resolved.
    /// - The error returned by the constructor.
    pub fn produce(&self, resolver: &dyn Resolver) -> Result<Instance, Error> {
        match self {
            Binding::Intermediate(key) => Err(Error::IntermediateBinding { key: key.clone() }),
            Binding::Singleton(instance) => Ok(Arc::clone(instance)),
            Binding::Constructor(constructor) => construct(constructor, resolver),
            Binding::SingletonConstructor(singleton) => singleton.produce(resolver),
        }
    }

    /// Returns the key an intermediate binding forwards to.
    ///
    /// # Errors
    ///
    /// [`Error::FinalBinding`] for every binding but an intermediate one.
    pub fn forwarding_key(&self) -> Result<&Key, Error> {
        match self {
            Binding::Intermediate(key) => Ok(key),
            _ => Err(Error::FinalBinding { kind: self.kind() }),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Intermediate(key) => f.debug_tuple("Intermediate").field(key).finish(),
            Binding::Singleton(_) => f.write_str("Singleton(..)"),
            Binding::Constructor(constructor) => {
                f.debug_tuple("Constructor").field(constructor).finish()
            }
            Binding::SingletonConstructor(singleton) => f
                .debug_tuple("SingletonConstructor")
                .field(&singleton.constructor)
                .finish(),
        }
    }
}

/// Represents a constructor whose result is cached.
///
/// The constructor runs at most once, no matter how many threads resolve the
/// binding at the same time. Every caller, including those that arrived while
/// the constructor was running, receives the same result. A failure is cached
/// like a success and replayed on every later call.
///
/// A thread never blocks on a singleton whose construction is, through any
/// number of threads, waiting for a singleton that thread is constructing.
/// It fails with [`Error::CircularDependency`] instead.
pub struct SingletonConstructor {
    id: CellId,
    constructor: DynConstructor,
    cell: OnceCell<Result<Instance, Error>>,
}

impl SingletonConstructor {
    fn new(constructor: DynConstructor) -> Self {
        Self {
            id: CellId::next(),
            constructor,
            cell: OnceCell::new(),
        }
    }

    /// Returns whether the constructor has already run.
    pub fn is_constructed(&self) -> bool {
        self.cell.get().is_some()
    }

    fn produce(&self, resolver: &dyn Resolver) -> Result<Instance, Error> {
        loop {
            if let Some(result) = self.cell.get() {
                return result.clone();
            }

            let entered = construction::enter(
                self.id,
                || Key::new(*self.constructor.ty(), ""),
                || self.is_constructed(),
            )?;

            match entered {
                None | Some(Entered::Waited) => continue,
                Some(Entered::Owner(_owner)) => {
                    return self
                        .cell
                        .get_or_init(|| {
                            #[cfg(feature = "debug-print")]
                            tracing::debug!("(+) construct singleton: {}", self.constructor.ty());

                            construct(&self.constructor, resolver)
                        })
                        .clone();
                }
            }
        }
    }
}

fn construct(constructor: &DynConstructor, resolver: &dyn Resolver) -> Result<Instance, Error> {
    let arguments = constructor
        .parameters()
        .iter()
        .map(|key| resolver.get(key))
        .collect::<Result<Vec<_>, _>>()?;

    constructor.call(resolver, arguments)
}
