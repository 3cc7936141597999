use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

use crate::{Binding, Error, Key};

#[derive(Default)]
pub(crate) struct BindingRegistry {
    registry: HashMap<Key, Binding>,
}

impl BindingRegistry {
    pub(crate) fn insert(
        &mut self,
        key: Key,
        binding: Binding,
        allow_override: bool,
    ) -> Result<(), Error> {
        if !self.registry.contains_key(&key) {
            #[cfg(feature = "debug-print")]
            tracing::debug!("(+) insert new: {} => {:?}", key, binding.kind());
        } else if allow_override {
            #[cfg(feature = "debug-print")]
            tracing::warn!("(!) override by `key`: {} => {:?}", key, binding.kind());
        } else {
            return Err(Error::AlreadyBound { key });
        }

        self.registry.insert(key, binding);
        Ok(())
    }

    pub(crate) fn get(&self, key: &Key) -> Option<&Binding> {
        self.registry.get(key)
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.len()
    }

    pub(crate) fn keys(&self) -> Keys<'_, Key, Binding> {
        self.registry.keys()
    }

    pub(crate) fn iter(&self) -> Iter<'_, Key, Binding> {
        self.registry.iter()
    }
}
