use std::borrow::Cow;

use crate::{instance::downcast, Error, Injectable, Instance, Key};

/// Something that can resolve a [`Key`] into an [`Instance`].
///
/// [`Injector`](crate::Injector) is the resolver of graft. Constructors registered
/// with [`Bind::to_provider`](crate::Bind::to_provider) receive it as `&dyn Resolver`,
/// and use [`resolve`](#method.resolve) or
/// [`resolve_with_qualifier`](#method.resolve_with_qualifier) to pull
/// dependencies they did not declare.
pub trait Resolver {
    /// Returns the instance bound to `key`.
    fn get(&self, key: &Key) -> Result<Instance, Error>;
}

impl dyn Resolver + '_ {
    /// Returns the untagged instance of type `T`.
    pub fn resolve<T>(&self) -> Result<T, Error>
    where
        T: Injectable + Clone,
    {
        self.resolve_with_qualifier("")
    }

    /// Returns the instance of type `T` bound with `qualifier`.
    pub fn resolve_with_qualifier<T>(
        &self,
        qualifier: impl Into<Cow<'static, str>>,
    ) -> Result<T, Error>
    where
        T: Injectable + Clone,
    {
        let key = Key::with_qualifier::<T>(qualifier);
        let instance = self.get(&key)?;
        downcast(&instance, &key)
    }
}
