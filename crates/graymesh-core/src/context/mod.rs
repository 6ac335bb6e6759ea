//! Worker-local slot holding the active [`TrafficTag`] of the current call chain.
//!
//! The slot is per-worker, not per-request: at most one tag is active on a
//! worker at any instant, and concurrent chains on other workers never see
//! it. Mutation goes through explicit save/restore tokens — [`install`]
//! returns a [`TagScope`] that captures the prior slot value and puts it
//! back when dropped, so every exit path (return, early return, panic)
//! restores the worker to its pre-install state.
use std::cell::RefCell;
use std::marker::PhantomData;

use graymesh_model::TrafficTag;

thread_local! {
    static ACTIVE_TAG: RefCell<Option<TrafficTag>> = const { RefCell::new(None) };
}

/// Snapshot of the tag currently active on this worker, if any.
pub fn current() -> Option<TrafficTag> {
    ACTIVE_TAG.with(|slot| slot.borrow().clone())
}

/// Returns `true` if a tag is active on this worker.
pub fn is_active() -> bool {
    ACTIVE_TAG.with(|slot| slot.borrow().is_some())
}

/// Install `tag` as the active tag of this worker.
///
/// The returned scope holds whatever was active before; dropping it puts
/// that value back (or clears the slot if it was empty). Scopes nest LIFO:
/// a handoff triggered from inside an installed scope captures the
/// innermost ambient tag at its own wrap time.
#[must_use = "dropping the scope immediately restores the previous tag"]
pub fn install(tag: TrafficTag) -> TagScope {
    let prior = ACTIVE_TAG.with(|slot| slot.borrow_mut().replace(tag));
    TagScope {
        prior,
        _worker_bound: PhantomData,
    }
}

/// Clear the active tag of this worker.
///
/// Used when downstream code must run tag-free (pool housekeeping units).
/// Dropping the returned scope restores the cleared value.
#[must_use = "dropping the scope immediately restores the previous tag"]
pub fn suppress() -> TagScope {
    let prior = ACTIVE_TAG.with(|slot| slot.borrow_mut().take());
    TagScope {
        prior,
        _worker_bound: PhantomData,
    }
}

/// Save/restore token for the worker-local tag slot.
///
/// Restoring performs no fallible logic; it is a plain slot write in
/// `Drop`. The token is bound to the worker that created it (`!Send`), so
/// a scope can never restore a slot it did not save.
pub struct TagScope {
    prior: Option<TrafficTag>,
    // Raw pointer keeps the scope off other workers.
    _worker_bound: PhantomData<*const ()>,
}

impl Drop for TagScope {
    fn drop(&mut self) {
        ACTIVE_TAG.with(|slot| *slot.borrow_mut() = self.prior.take());
    }
}
