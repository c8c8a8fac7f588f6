//! Per-channel mutual exclusion for mutations

use super::types::ChannelId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lazily created mutex per channel.
///
/// Mutations of one channel (metadata and participants) run one at a time;
/// different channels proceed independently.
#[derive(Debug, Default)]
pub(crate) struct ChannelLocks {
    locks: Mutex<HashMap<ChannelId, Arc<Mutex<()>>>>,
}

impl ChannelLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn handle(&self, channel_id: &ChannelId) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(*channel_id)
            .or_default()
            .clone()
    }

    /// Run `f` while holding the channel's lock
    pub(crate) fn with_lock<T>(&self, channel_id: &ChannelId, f: impl FnOnce() -> T) -> T {
        let lock = self.handle(channel_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Drop the table entry of a deleted channel
    pub(crate) fn forget(&self, channel_id: &ChannelId) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel_id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
