use std::{
    any::{self, Any},
    sync::Arc,
};

use crate::{Error, Injectable, Key};

/// A resolved value whose type has been erased.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Returns an owned copy of the value held by an [`Instance`].
///
/// The `key` is only used to describe the instance if it is not a `T`.
pub fn downcast<T: Clone + 'static>(instance: &Instance, key: &Key) -> Result<T, Error> {
    instance
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| Error::TypeMismatch {
            key: key.clone(),
            expected: any::type_name::<T>(),
        })
}

#[doc(hidden)]
pub fn take_instance<T>(
    instances: &mut impl Iterator<Item = Instance>,
    qualifier: &'static str,
) -> Result<T, Error>
where
    T: Injectable + Clone,
{
    let key = Key::with_qualifier::<T>(qualifier);

    match instances.next() {
        Some(instance) => downcast(&instance, &key),
        None => Err(Error::MissingArgument { key }),
    }
}
