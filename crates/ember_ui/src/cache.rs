//! Cached derived geometry.
//!
//! Every derived value a widget computes (local transform, final transform,
//! final size) is held in a [`Cached`] entry that is either `Clean` with a
//! value or `Dirty`. [`NodeCache::invalidate`] is the single entry point that
//! dirties all of them.

use std::cell::Cell;
use std::sync::Arc;

use ember_shared::{Matrix3, Vec2};
use parking_lot::Mutex;

/// A cached value and its validity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cached<T> {
    /// Value is current.
    Clean(T),
    /// Value must be recomputed before use.
    #[default]
    Dirty,
}

impl<T: Copy> Cached<T> {
    /// Returns the value if clean.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<T> {
        match self {
            Self::Clean(value) => Some(*value),
            Self::Dirty => None,
        }
    }

    /// Returns true if the value is current.
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean(_))
    }
}

/// Read-only, thread-safe view of a widget's final size cache.
///
/// The tree itself is single-threaded; a watch lets other threads read the
/// size most recently resolved by the owning thread.
#[derive(Debug, Clone)]
pub struct SizeWatch(Arc<Mutex<Cached<Vec2>>>);

impl SizeWatch {
    /// Returns the resolved final size, or `None` if it is stale.
    #[must_use]
    pub fn get(&self) -> Option<Vec2> {
        self.0.lock().get()
    }
}

/// Per-widget derived state.
#[derive(Debug, Default)]
pub(crate) struct NodeCache {
    local_transform: Cell<Cached<Matrix3>>,
    final_transform: Cell<Cached<Matrix3>>,
    final_size: Arc<Mutex<Cached<Vec2>>>,
}

impl NodeCache {
    /// Marks every entry dirty.
    pub(crate) fn invalidate(&self) {
        self.local_transform.set(Cached::Dirty);
        self.final_transform.set(Cached::Dirty);
        *self.final_size.lock() = Cached::Dirty;
    }

    pub(crate) fn local_transform(&self) -> Option<Matrix3> {
        self.local_transform.get().get()
    }

    pub(crate) fn store_local_transform(&self, transform: Matrix3) {
        self.local_transform.set(Cached::Clean(transform));
    }

    pub(crate) fn final_transform(&self) -> Option<Matrix3> {
        self.final_transform.get().get()
    }

    pub(crate) fn store_final_transform(&self, transform: Matrix3) {
        self.final_transform.set(Cached::Clean(transform));
    }

    pub(crate) fn final_size(&self) -> Option<Vec2> {
        self.final_size.lock().get()
    }

    pub(crate) fn store_final_size(&self, size: Vec2) {
        *self.final_size.lock() = Cached::Clean(size);
    }

    pub(crate) fn watch(&self) -> SizeWatch {
        SizeWatch(Arc::clone(&self.final_size))
    }

    #[cfg(test)]
    pub(crate) fn is_clean(&self) -> bool {
        self.local_transform.get().is_clean() && self.final_transform.get().is_clean() && self.final_size.lock().is_clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_dirties_every_entry() {
        let cache = NodeCache::default();
        cache.store_local_transform(Matrix3::IDENTITY);
        cache.store_final_transform(Matrix3::IDENTITY);
        cache.store_final_size(Vec2::new(4.0, 2.0));
        assert!(cache.is_clean());

        cache.invalidate();

        assert!(cache.local_transform().is_none());
        assert!(cache.final_transform().is_none());
        assert!(cache.final_size().is_none());
    }

    #[test]
    fn test_watch_reads_from_other_thread() {
        let cache = NodeCache::default();
        let watch = cache.watch();
        assert_eq!(watch.get(), None);

        cache.store_final_size(Vec2::new(8.0, 6.0));

        let read = std::thread::spawn(move || watch.get()).join().unwrap();
        assert_eq!(read, Some(Vec2::new(8.0, 6.0)));
    }
}
