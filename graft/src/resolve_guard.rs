use std::cell::RefCell;

use crate::{Error, Key};

thread_local! {
    // Keys being resolved on this thread, outermost first.
    static RESOLVE_CHAIN: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the last pushed key from the thread-local chain on drop.
pub(crate) struct ResolveGuard {
    _private: (),
}

impl ResolveGuard {
    /// Pushes `key` onto the chain of this thread.
    ///
    /// Returns [`Error::CircularDependency`] if `key` is already being resolved.
    pub(crate) fn push(key: &Key) -> Result<Self, Error> {
        RESOLVE_CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();

            if let Some(start) = chain.iter().position(|k| k == key) {
                let mut cycle = chain[start..].to_vec();
                cycle.push(key.clone());
                return Err(Error::CircularDependency { chain: cycle });
            }

            chain.push(key.clone());
            Ok(ResolveGuard { _private: () })
        })
    }
}

/// Returns the key being resolved innermost on this thread.
pub(crate) fn current_key() -> Option<Key> {
    RESOLVE_CHAIN.with(|chain| chain.borrow().last().cloned())
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        RESOLVE_CHAIN.with(|chain| {
            chain.borrow_mut().pop();
        });
    }
}
