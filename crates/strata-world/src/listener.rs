use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use strata_blocks::Block;
use strata_geom::BlockPos;

/// Observer of committed block changes.
///
/// Called synchronously on the mutating thread while the affected chunks are
/// still locked for writing. Reads through the world are fine; mutating the
/// world or the listener set from a callback deadlocks.
pub trait WorldChangeListener: Send + Sync {
    fn on_block_changed(&self, pos: BlockPos, new: Block, old: Block);
}

struct Entry {
    listener: Arc<dyn WorldChangeListener>,
    count: usize,
}

/// Reference-counted listener set keyed by `Arc` identity.
///
/// Registering the same listener twice keeps one entry with a count of two;
/// it is still notified once per change and stays registered until
/// unregistered as many times.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<Vec<Entry>>,
}

#[inline]
fn same(a: &Arc<dyn WorldChangeListener>, b: &Arc<dyn WorldChangeListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn WorldChangeListener>) {
        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|e| same(&e.listener, &listener)) {
            Some(e) => e.count += 1,
            None => entries.push(Entry { listener, count: 1 }),
        }
    }

    /// Returns false when the listener was not registered.
    pub fn unregister(&self, listener: &Arc<dyn WorldChangeListener>) -> bool {
        let mut entries = self.entries.lock();
        let Some(i) = entries.iter().position(|e| same(&e.listener, listener)) else {
            return false;
        };
        entries[i].count -= 1;
        if entries[i].count == 0 {
            entries.remove(i);
        }
        true
    }

    /// Distinct registered listeners.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Delivers one change to every listener in registration order. A
    /// panicking listener is logged and skipped.
    pub fn notify(&self, pos: BlockPos, new: Block, old: Block) {
        let entries = self.entries.lock();
        for e in entries.iter() {
            let delivered =
                catch_unwind(AssertUnwindSafe(|| e.listener.on_block_changed(pos, new, old)));
            if delivered.is_err() {
                log::error!("world change listener panicked on change at {}", pos);
            }
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
