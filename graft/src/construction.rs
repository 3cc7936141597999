use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Condvar, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, ThreadId},
};

use once_cell::sync::Lazy;

use crate::{resolve_guard, Error, Key};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

static GRAPH: Lazy<Mutex<WaitGraph>> = Lazy::new(Default::default);

static FINISHED: Condvar = Condvar::new();

/// Identifies one singleton cell across threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CellId(u64);

impl CellId {
    pub(crate) fn next() -> Self {
        CellId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// Which thread constructs each cell, and which cell each blocked thread waits for.
#[derive(Default)]
struct WaitGraph {
    owners: HashMap<CellId, (ThreadId, Key)>,
    waiting: HashMap<ThreadId, CellId>,
}

impl WaitGraph {
    // Follows owner -> awaited cell -> owner from `cell` and returns the keys
    // of the cycle if it leads back to `me`.
    fn cycle(&self, me: ThreadId, cell: CellId) -> Option<Vec<Key>> {
        let mut chain = Vec::new();
        let mut current = cell;

        for _ in 0..=self.waiting.len() {
            let (owner, key) = self.owners.get(&current)?;
            chain.push(key.clone());

            if *owner == me {
                chain.insert(0, key.clone());
                return Some(chain);
            }

            current = *self.waiting.get(owner)?;
        }

        None
    }
}

/// The outcome of [`enter`].
pub(crate) enum Entered {
    /// The calling thread constructs the cell, until the guard is dropped.
    Owner(OwnerGuard),
    /// Another thread finished with the cell, which must be checked again.
    Waited,
}

/// Releases the ownership of a cell on drop, and wakes the waiting threads.
pub(crate) struct OwnerGuard {
    cell: CellId,
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        lock().owners.remove(&self.cell);
        FINISHED.notify_all();
    }
}

fn lock() -> MutexGuard<'static, WaitGraph> {
    GRAPH.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Claims the construction of `cell`, or blocks until its current owner is done.
///
/// `constructed` is checked while holding the graph lock, so a cell finished
/// between the caller's own check and this call is never constructed twice.
///
/// # Errors
///
/// [`Error::CircularDependency`] if blocking would never end: the owner of
/// `cell` is, directly or through other threads, waiting for a cell owned by
/// the calling thread.
pub(crate) fn enter(
    cell: CellId,
    fallback: impl FnOnce() -> Key,
    constructed: impl Fn() -> bool,
) -> Result<Option<Entered>, Error> {
    let me = thread::current().id();
    let key = resolve_guard::current_key().unwrap_or_else(fallback);

    let mut graph = lock();

    if constructed() {
        return Ok(None);
    }

    if !graph.owners.contains_key(&cell) {
        graph.owners.insert(cell, (me, key));
        return Ok(Some(Entered::Owner(OwnerGuard { cell })));
    }

    if let Some(chain) = graph.cycle(me, cell) {
        #[cfg(feature = "debug-print")]
        tracing::warn!("(x) singleton construction would wait for itself: {}", key);

        return Err(Error::CircularDependency { chain });
    }

    graph.waiting.insert(me, cell);

    while graph.owners.contains_key(&cell) {
        graph = FINISHED
            .wait(graph)
            .unwrap_or_else(PoisonError::into_inner);
    }

    graph.waiting.remove(&me);

    Ok(Some(Entered::Waited))
}
