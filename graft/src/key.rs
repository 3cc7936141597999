use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{shape, Injectable, Type};

/// Represents the identity of a dependency: a type and an optional qualifier.
///
/// Keys are compared structurally, so they can be used as map keys.
/// A key built over a bare trait object, e.g. `dyn Greeter`, is built over
/// `Arc<dyn Greeter>` instead, see [`shape::normalize`].
#[derive(Clone, Debug)]
pub struct Key {
    /// The type of the dependency.
    pub ty: Type,
    /// The qualifier of the dependency, empty when untagged.
    pub qualifier: Cow<'static, str>,
}

impl Key {
    /// Creates a key for the given type and qualifier.
    pub fn new(ty: Type, qualifier: impl Into<Cow<'static, str>>) -> Self {
        Self {
            ty: shape::normalize(ty),
            qualifier: qualifier.into(),
        }
    }

    /// Creates an untagged key for `T`.
    pub fn of<T: Injectable + ?Sized>() -> Self {
        Self::new(T::ty(), "")
    }

    /// Creates a key for `T` with the given qualifier.
    pub fn with_qualifier<T: Injectable + ?Sized>(qualifier: impl Into<Cow<'static, str>>) -> Self {
        Self::new(T::ty(), qualifier)
    }

    /// Returns whether the key carries a qualifier.
    pub fn is_qualified(&self) -> bool {
        !self.qualifier.is_empty()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.qualifier == other.qualifier
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.ty.cmp(&other.ty) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.qualifier.cmp(&other.qualifier)
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_qualified() {
            write!(f, "{} (qualifier = {:?})", self.ty, self.qualifier)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}
