use std::{any::TypeId, error::Error as StdError, fmt, sync::Arc};

use crate::{
    instance::take_instance, shape, Aggregate, Error, Injectable, Instance, Key, Kind, Resolver,
    Type,
};

/// A function whose parameters are resolved by type.
///
/// Implemented for every `Fn(A1, .., An) -> Result<T, E>` with up to 8 parameters,
/// where each parameter is an [`Injectable`] that can be cloned out of the container.
///
/// # Example
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
///
/// use graft::{Component, Constructor, Type};
///
/// #[derive(Clone, Component)]
/// struct Database;
///
/// struct Service(Arc<Database>);
///
/// fn new_service(database: Arc<Database>) -> Result<Service, Infallible> {
///     Ok(Service(database))
/// }
///
/// fn parameters<Args, C: Constructor<Args>>(_: &C) -> Vec<Type> {
///     C::parameters()
/// }
///
/// fn main() {
///     assert_eq!(parameters(&new_service), vec![Type::of::<Arc<Database>>()]);
/// }
/// ```
pub trait Constructor<Args>: Send + Sync + 'static {
    /// The type of the constructed value.
    type Output: Send + Sync + 'static;

    /// Returns the declared parameter types, in declaration order.
    fn parameters() -> Vec<Type>;

    /// Invokes the function with one instance per parameter, in declaration order.
    fn construct(&self, arguments: Vec<Instance>) -> Result<Self::Output, Error>;
}

macro_rules! impl_constructor {
    ($($arg:ident),*) => {
        impl<F, T, E, $($arg,)*> Constructor<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Result<T, E> + Send + Sync + 'static,
            T: Send + Sync + 'static,
            E: StdError + Send + Sync + 'static,
            $($arg: Injectable + Clone + Send + Sync,)*
        {
            type Output = T;

            fn parameters() -> Vec<Type> {
                vec![$(Type::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn construct(&self, arguments: Vec<Instance>) -> Result<T, Error> {
                let mut arguments = arguments.into_iter();
                $(
                    let $arg = take_instance::<$arg>(&mut arguments, "")?;
                )*
                (self)($($arg),*).map_err(Error::from_constructor)
            }
        }
    };
}

impl_constructor!();
impl_constructor!(A1);
impl_constructor!(A1, A2);
impl_constructor!(A1, A2, A3);
impl_constructor!(A1, A2, A3, A4);
impl_constructor!(A1, A2, A3, A4, A5);
impl_constructor!(A1, A2, A3, A4, A5, A6);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7, A8);

/// A function taking a single parameter bag, whose fields are resolved one by one.
///
/// Implemented for every `Fn(P) -> Result<T, E>` where `P` is an [`Aggregate`].
/// Only parameter bags, i.e. `#[derive(Params)]` structs, pass
/// [`verify_tagged_function_shape`](shape::verify_tagged_function_shape).
pub trait TaggedConstructor<P>: Send + Sync + 'static {
    /// The type of the constructed value.
    type Output: Send + Sync + 'static;

    /// Invokes the function with one instance per field of `P`, in declaration order.
    fn construct(&self, arguments: Vec<Instance>) -> Result<Self::Output, Error>;
}

impl<F, T, E, P> TaggedConstructor<P> for F
where
    F: Fn(P) -> Result<T, E> + Send + Sync + 'static,
    T: Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
    P: Aggregate,
{
    type Output = T;

    fn construct(&self, arguments: Vec<Instance>) -> Result<T, Error> {
        let parameters = P::from_instances(arguments)?;
        (self)(parameters).map_err(Error::from_constructor)
    }
}

type ErasedCall = Arc<dyn Fn(&dyn Resolver, Vec<Instance>) -> Result<Instance, Error> + Send + Sync>;

/// Represents a constructor that erases its generic types.
///
/// It is built from one of three function forms, and records the declared
/// parameter types and the keys that must be resolved before the call:
/// - [`DynConstructor::new`]: plain parameters, resolved by type;
/// - [`DynConstructor::tagged`]: a single parameter bag, resolved field by field;
/// - [`DynConstructor::with_resolver`]: the resolver itself, for dynamic lookups.
#[derive(Clone)]
pub struct DynConstructor {
    ty: Type,
    declared: Vec<Type>,
    parameters: Vec<Key>,
    call: ErasedCall,
}

impl DynConstructor {
    /// Creates a constructor whose parameters are resolved by type.
    pub fn new<Args, C>(constructor: C) -> Result<Self, Error>
    where
        C: Constructor<Args>,
    {
        let ty = Type::new::<C>(Kind::Function {
            parameters: C::parameters,
        });

        shape::verify_function_shape(&ty)?;

        Ok(Self {
            ty,
            declared: C::parameters(),
            parameters: shape::derive_parameter_keys(&ty)?,
            call: Arc::new(move |_: &dyn Resolver, arguments: Vec<Instance>| -> Result<Instance, Error> {
                let value = constructor.construct(arguments)?;
                Ok(Arc::new(value) as Instance)
            }),
        })
    }

    /// Creates a constructor taking a single parameter bag.
    pub fn tagged<P, C>(constructor: C) -> Result<Self, Error>
    where
        P: Aggregate,
        C: TaggedConstructor<P>,
    {
        let ty = Type::new::<C>(Kind::Function {
            parameters: bag_parameters::<P>,
        });

        shape::verify_tagged_function_shape(&ty)?;

        Ok(Self {
            ty,
            declared: bag_parameters::<P>(),
            parameters: shape::derive_tagged_parameter_keys(&ty)?,
            call: Arc::new(move |_: &dyn Resolver, arguments: Vec<Instance>| -> Result<Instance, Error> {
                let value = constructor.construct(arguments)?;
                Ok(Arc::new(value) as Instance)
            }),
        })
    }

    /// Creates a constructor that receives the resolver itself.
    ///
    /// Such a constructor has no parameter keys. Its only declared
    /// parameter is the resolver, from which it pulls whatever it needs
    /// while running.
    pub fn with_resolver<T, E, F>(constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T, E> + Send + Sync + 'static,
    {
        let ty = Type::new::<F>(Kind::Function {
            parameters: resolver_parameters,
        });

        Self {
            ty,
            declared: resolver_parameters(),
            parameters: Vec::new(),
            call: Arc::new(move |resolver: &dyn Resolver, _: Vec<Instance>| -> Result<Instance, Error> {
                let value = constructor(resolver).map_err(Error::from_constructor)?;
                Ok(Arc::new(value) as Instance)
            }),
        }
    }

    /// Returns the type of the function.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the declared parameter types, in declaration order.
    pub fn declared_parameters(&self) -> &[Type] {
        &self.declared
    }

    /// Returns the keys resolved before each call, in declaration order.
    pub fn parameters(&self) -> &[Key] {
        &self.parameters
    }

    /// Returns whether the only declared parameter is the resolver itself.
    pub fn takes_resolver(&self) -> bool {
        matches!(self.declared.as_slice(), [parameter] if parameter.id == TypeId::of::<dyn Resolver>())
    }

    /// Invokes the function with already resolved arguments.
    pub fn call(&self, resolver: &dyn Resolver, arguments: Vec<Instance>) -> Result<Instance, Error> {
        (self.call)(resolver, arguments)
    }
}

impl fmt::Debug for DynConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynConstructor")
            .field("ty", &self.ty)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn bag_parameters<P: Aggregate>() -> Vec<Type> {
    vec![P::ty()]
}

fn resolver_parameters() -> Vec<Type> {
    vec![Type::of::<dyn Resolver>()]
}
