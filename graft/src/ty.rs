use std::{
    any::{self, TypeId},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{AggregateKind, ConstantKind, Error, Instance, Resolver};

/// Represents a type.
#[derive(Clone, Copy, Debug)]
pub struct Type {
    /// The name of the type.
    pub name: &'static str,
    /// The unique identifier of the type.
    pub id: TypeId,
    /// The shape of the type.
    pub kind: Kind,
}

/// Represents the shape of a [`Type`].
#[derive(Clone, Copy, Debug)]
pub enum Kind {
    /// A struct, by value.
    Aggregate {
        /// Whether the struct is a component or a parameter bag.
        kind: AggregateKind,
        /// Returns the fields of the struct, in declaration order.
        fields: fn() -> Vec<Field>,
    },
    /// A bare trait object, e.g. `dyn Greeter`.
    Contract {
        /// Returns the type of `Arc<dyn Trait>`.
        pointer: fn() -> Type,
    },
    /// An `Arc<T>`.
    Pointer(Pointee),
    /// A primitive that can only be bound with a qualifier.
    Constant(ConstantKind),
    /// A constructor.
    Function {
        /// Returns the declared parameter types, in declaration order.
        parameters: fn() -> Vec<Type>,
    },
    /// Anything else.
    Opaque,
}

/// Represents what an `Arc<T>` points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointee {
    /// `T` is a struct.
    Aggregate,
    /// `T` is a trait object.
    Contract,
    /// `T` is anything else.
    Other,
}

impl Type {
    /// Creates a type with the given shape.
    ///
    /// This is mostly used by the code generated by `#[derive(Component)]`,
    /// `#[derive(Params)]` and [`contract!`](crate::contract).
    pub fn new<T: ?Sized + 'static>(kind: Kind) -> Type {
        Type {
            name: any::type_name::<T>(),
            id: TypeId::of::<T>(),
            kind,
        }
    }

    /// Returns the type of an [`Injectable`].
    pub fn of<T: Injectable + ?Sized>() -> Type {
        T::ty()
    }

    /// Returns a type that can never be injected.
    pub fn opaque<T: ?Sized + 'static>() -> Type {
        Type::new::<T>(Kind::Opaque)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Type {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Represents a field of an aggregate.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// The name of the field, or its index for tuple structs.
    pub name: &'static str,
    /// The type of the field.
    pub ty: Type,
    /// The qualifier of the field, empty when untagged.
    pub qualifier: &'static str,
}

impl Field {
    /// Creates a field of type `T`.
    pub fn new<T: Injectable + ?Sized>(name: &'static str, qualifier: &'static str) -> Field {
        Field {
            name,
            ty: T::ty(),
            qualifier,
        }
    }
}

/// A trait for types that have a [`Type`] descriptor.
///
/// Define this trait so that the purpose is not to be implemented manually,
/// but to use `#[derive(Component)]`, `#[derive(Params)]` or the
/// [`contract!`](crate::contract) macro to generate the implementation.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use graft::{contract, Component, Injectable, Kind, Pointee};
///
/// trait Greeter: Send + Sync {}
///
/// contract!(dyn Greeter);
///
/// #[derive(Clone, Component)]
/// struct A;
///
/// fn main() {
///     assert!(matches!(A::ty().kind, Kind::Aggregate { .. }));
///     assert!(matches!(
///         <Arc<dyn Greeter>>::ty().kind,
///         Kind::Pointer(Pointee::Contract)
///     ));
/// }
/// ```
pub trait Injectable: 'static {
    /// Returns the descriptor of the type.
    fn ty() -> Type;
}

/// A trait for structs whose fields are injected one by one.
///
/// Implemented by `#[derive(Component)]` and `#[derive(Params)]`.
pub trait Aggregate: Injectable + Sized {
    /// Returns the fields of the struct, in declaration order.
    fn fields() -> Vec<Field>;

    /// Builds the struct from one instance per field, in declaration order.
    fn from_instances(instances: Vec<Instance>) -> Result<Self, Error>;
}

macro_rules! impl_constant {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Injectable for $ty {
                fn ty() -> Type {
                    Type::new::<$ty>(Kind::Constant(ConstantKind::$kind))
                }
            }
        )+
    };
}

impl_constant! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    &'static str => Str,
}

impl<T: Injectable + ?Sized> Injectable for Arc<T> {
    fn ty() -> Type {
        let pointee = match T::ty().kind {
            Kind::Aggregate { .. } => Pointee::Aggregate,
            Kind::Contract { .. } => Pointee::Contract,
            _ => Pointee::Other,
        };

        Type::new::<Arc<T>>(Kind::Pointer(pointee))
    }
}

impl<T: 'static> Injectable for Vec<T> {
    fn ty() -> Type {
        Type::opaque::<Vec<T>>()
    }
}

impl<T: 'static> Injectable for Option<T> {
    fn ty() -> Type {
        Type::opaque::<Option<T>>()
    }
}

impl Injectable for dyn Resolver {
    fn ty() -> Type {
        Type::new::<dyn Resolver>(Kind::Contract {
            pointer: <Arc<dyn Resolver> as Injectable>::ty,
        })
    }
}
