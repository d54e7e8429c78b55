//! Observation tokens.
//!
//! An [`Observation`] is the caller's half of a subscription. It owns the only
//! strong reference to the registry entry holding the handler, so the handler
//! lives exactly as long as the token does. The registry keeps a `Weak`.
//!
//! A token ends up in one of two terminal states:
//!
//! - **Invalidated**: [`Observation::invalidate`] was called. The entry still
//!   exists while the token lives, but dispatch skips it.
//! - **Reclaimed**: the token was dropped. The registry's `Weak` no longer
//!   upgrades and the handler (with everything it captured) is freed.
//!
//! Containers cannot tell the two apart, and neither state is ever left.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

/// Unique identifier for an observation.
///
/// Used as the registry key. Identifiers are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(u64);

impl ObservationId {
    /// Generate a new unique observation ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obs#{}", self.0)
    }
}

/// Identity and validity shared between a token and its registry entry.
#[derive(Debug)]
pub(crate) struct ObservationState {
    id: ObservationId,
    valid: Cell<bool>,
}

impl ObservationState {
    pub(crate) fn new() -> Self {
        Self {
            id: ObservationId::next(),
            valid: Cell::new(true),
        }
    }

    pub(crate) fn id(&self) -> ObservationId {
        self.id
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.valid.get()
    }

    /// Returns `true` if this call flipped the flag.
    fn invalidate(&self) -> bool {
        self.valid.replace(false)
    }
}

/// Anything a token can own: a registry entry of any handler type.
///
/// Erasing the handler type here is what lets [`Observation`] be a single
/// non-generic type for every container.
pub(crate) trait Slot {
    fn state(&self) -> &ObservationState;
}

/// A live subscription to an [`ObservableValue`](super::ObservableValue) or
/// [`EventStream`](super::EventStream).
///
/// Dropping the token unsubscribes. Keep it for as long as notifications
/// should arrive.
#[must_use = "dropping an Observation immediately unsubscribes its handler"]
pub struct Observation {
    slot: Rc<dyn Slot>,
}

impl Observation {
    pub(crate) fn new(slot: Rc<dyn Slot>) -> Self {
        Self { slot }
    }

    /// The identifier this observation is registered under.
    pub fn id(&self) -> ObservationId {
        self.slot.state().id()
    }

    /// Whether the handler can still be invoked.
    pub fn is_valid(&self) -> bool {
        self.slot.state().is_valid()
    }

    /// Stop all future notifications to this observation's handler.
    ///
    /// Idempotent. Takes effect immediately, even for handlers later in a
    /// dispatch pass that is currently running.
    pub fn invalidate(&self) {
        if self.slot.state().invalidate() {
            debug!(id = %self.id(), "observation invalidated");
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        trace!(id = %self.id(), valid = self.is_valid(), "observation dropped");
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("id", &self.id())
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare(ObservationState);

    impl Slot for Bare {
        fn state(&self) -> &ObservationState {
            &self.0
        }
    }

    fn token() -> Observation {
        Observation::new(Rc::new(Bare(ObservationState::new())))
    }

    #[test]
    fn observation_ids_are_unique() {
        let id1 = ObservationId::next();
        let id2 = ObservationId::next();
        let id3 = ObservationId::next();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
        assert!(id1 < id2 && id2 < id3);
    }

    #[test]
    fn new_observation_is_valid() {
        let obs = token();
        assert!(obs.is_valid());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let obs = token();

        obs.invalidate();
        assert!(!obs.is_valid());

        obs.invalidate();
        assert!(!obs.is_valid());
    }

    #[test]
    fn state_flip_reported_once() {
        let state = ObservationState::new();
        assert!(state.invalidate());
        assert!(!state.invalidate());
        assert!(!state.is_valid());
    }

    #[test]
    fn debug_shows_id_and_validity() {
        let obs = token();
        obs.invalidate();

        let dbg = format!("{:?}", obs);
        assert!(dbg.contains("Observation"));
        assert!(dbg.contains(&obs.id().raw().to_string()));
        assert!(dbg.contains("false"));
    }

    #[test]
    fn display_id() {
        let obs = token();
        assert_eq!(obs.id().to_string(), format!("obs#{}", obs.id().raw()));
    }
}
