//! Observation Registry
//!
//! Each container owns one registry. The registry maps observation IDs to
//! `Weak` references to the entries that tokens own, so registering never
//! keeps an observer alive.
//!
//! # Dispatch
//!
//! A dispatch pass:
//!
//! 1. Prunes entries whose token was dropped or invalidated.
//! 2. Snapshots the remaining `Weak`s and releases the map borrow.
//! 3. For each snapshot entry, upgrades it and re-checks validity right
//!    before calling the handler.
//!
//! Because no borrow is held while handlers run, a handler may register new
//! observations, invalidate or drop tokens, or trigger a nested dispatch on
//! the same registry. Observations registered mid-pass are not visited by
//! that pass.
//!
//! Visiting order is not part of the contract.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use super::observation::{Observation, ObservationId, ObservationState, Slot};

/// Handler receiving `(old, new)` on every assignment.
pub(crate) type ChangeHandler<V> = dyn Fn(&V, &V);

/// Handler receiving a single value.
pub(crate) type ValueHandler<V> = dyn Fn(&V);

/// Observer sets are usually tiny; this keeps dispatch allocation-free for them.
const INLINE_SNAPSHOT: usize = 8;

/// A registered handler together with its shared token state.
///
/// The token owns the only strong `Rc` to this entry.
pub(crate) struct Entry<H: ?Sized> {
    state: ObservationState,
    handler: Box<H>,
}

impl<H: ?Sized> Entry<H> {
    fn is_live(&self) -> bool {
        self.state.is_valid()
    }
}

impl<H: ?Sized> Slot for Entry<H> {
    fn state(&self) -> &ObservationState {
        &self.state
    }
}

/// Non-owning collection of observations for one container.
pub(crate) struct Registry<H: ?Sized> {
    entries: RefCell<IndexMap<ObservationId, Weak<Entry<H>>>>,
}

impl<H: ?Sized + 'static> Registry<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(IndexMap::new()),
        }
    }

    /// Store `handler` and return the token that owns it.
    pub(crate) fn register(&self, handler: Box<H>) -> Observation {
        self.prune();

        let entry = Rc::new(Entry {
            state: ObservationState::new(),
            handler,
        });
        let id = entry.state.id();

        self.entries
            .borrow_mut()
            .insert(id, Rc::downgrade(&entry));
        trace!(id = %id, "observation registered");

        Observation::new(entry)
    }

    /// Number of entries, including dead ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Drop entries whose token was reclaimed or invalidated.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn prune(&self) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|_, weak| weak.upgrade().is_some_and(|entry| entry.is_live()));

        let removed = before - entries.len();
        if removed > 0 {
            trace!(removed, remaining = entries.len(), "pruned dead observations");
        }
        removed
    }

    /// Call `deliver` with every live handler.
    ///
    /// Returns how many handlers were invoked.
    pub(crate) fn dispatch<F>(&self, mut deliver: F) -> usize
    where
        F: FnMut(&H),
    {
        self.prune();

        let snapshot: SmallVec<[Weak<Entry<H>>; INLINE_SNAPSHOT]> =
            self.entries.borrow().values().cloned().collect();

        let mut delivered = 0;
        for weak in snapshot {
            // Re-checked per entry: an earlier handler may have dropped or
            // invalidated this one.
            let Some(entry) = weak.upgrade() else {
                continue;
            };
            if !entry.is_live() {
                continue;
            }
            deliver(&*entry.handler);
            delivered += 1;
        }

        trace!(delivered, "dispatch complete");
        delivered
    }
}

impl<H: ?Sized> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.borrow().len())
            .finish()
    }
}
