//! Shared, observable state.
//!
//! An [`Entity`] wraps a value behind a lock and broadcasts a change signal on
//! every update. Components hold entities to share state with each other and
//! with the background tasks that finish navigations.

use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Cloneable handle to a shared value. Clones see each other's updates.
pub struct Entity<T: ?Sized + Send + Sync> {
    value: Arc<RwLock<T>>,
    changed: watch::Sender<()>,
}

impl<T: Send + Sync> Entity<T> {
    pub fn new(value: T) -> Self {
        Self { value: Arc::new(RwLock::new(value)), changed: watch::Sender::new(()) }
    }
}

impl<T: ?Sized + Send + Sync> Entity<T> {
    /// Mutate the value, then signal subscribers.
    pub fn update<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let out = {
            let mut guard = self.value.write().map_err(|_| crate::Error::LockPoisoned)?;
            f(&mut *guard)
        };
        self.changed.send_replace(());
        Ok(out)
    }

    pub fn read<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.value.read().map_err(|_| crate::Error::LockPoisoned)?;
        Ok(f(&*guard))
    }

    /// Receiver that fires after each `update`.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.changed.subscribe()
    }
}

impl<T: ?Sized + Send + Sync> Clone for Entity<T> {
    fn clone(&self) -> Self {
        Self { value: Arc::clone(&self.value), changed: self.changed.clone() }
    }
}

impl<T: ?Sized + Send + Sync> std::fmt::Debug for Entity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("subscribers", &self.changed.receiver_count())
            .finish_non_exhaustive()
    }
}
