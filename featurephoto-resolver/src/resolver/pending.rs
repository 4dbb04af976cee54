//! Single-slot memo of the speculative Mapillary lookup.

use std::sync::{Mutex, MutexGuard, PoisonError};

use featurephoto_core::{PhotoRecord, ShortId};
use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::ResolveError;

pub(super) type LookupTask = JoinHandle<Result<Option<PhotoRecord>, ResolveError>>;

#[derive(Debug)]
struct PendingLookup {
    owner: ShortId,
    task: LookupTask,
}

/// Holds at most one in-flight lookup together with the feature it serves.
///
/// Replacing and claiming happen under one lock, so a skeleton call for one
/// feature can never interleave with another caller's claim.
#[derive(Debug, Default)]
pub(super) struct PendingSlot {
    inner: Mutex<Option<PendingLookup>>,
}

impl PendingSlot {
    /// Remember `task` for `owner`. A displaced lookup keeps running
    /// detached and its result is ignored.
    pub(super) fn replace(&self, owner: ShortId, task: LookupTask) {
        let previous = self.lock().replace(PendingLookup { owner, task });
        if let Some(stale) = previous {
            debug!("superseding pending Mapillary lookup for {}", stale.owner);
        }
    }

    /// Empty the slot, returning the lookup only when it belongs to `id`.
    pub(super) fn claim(&self, id: &ShortId) -> Option<LookupTask> {
        let pending = self.lock().take()?;
        if pending.owner == *id {
            return Some(pending.task);
        }
        warn!(
            "discarding pending Mapillary lookup for {} while resolving {id}",
            pending.owner
        );
        None
    }

    #[cfg(test)]
    pub(super) fn owner(&self) -> Option<ShortId> {
        self.lock().as_ref().map(|pending| pending.owner.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingLookup>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
