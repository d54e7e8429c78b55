//! Reactive Primitives
//!
//! This module implements the two observable containers used by view models,
//! and the observation machinery they share.
//!
//! # Concepts
//!
//! ## Observable Values
//!
//! An [`ObservableValue`] holds mutable state. Every assignment notifies its
//! observers with the previous and the new value. Observers can ask to be
//! called immediately with the current value, and, for `PartialEq` types, to
//! skip assignments that do not change anything.
//!
//! ## Event Streams
//!
//! An [`EventStream`] carries transient events. Nothing is stored, so an
//! observer only ever sees events emitted after it subscribed.
//!
//! ## Observations
//!
//! Subscribing returns an [`Observation`]. The observation owns the handler;
//! the container only keeps a weak reference to it. Dropping the observation
//! or calling [`Observation::invalidate`] ends the subscription.
//!
//! # Implementation Notes
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), so the containers are
//! neither `Send` nor `Sync`. Notification is synchronous: `set` and `emit`
//! return after every live handler has run. Handlers may re-enter the
//! container they observe. The order in which observers are visited is
//! unspecified.

mod observation;
mod registry;
mod stream;
mod value;

pub use observation::{Observation, ObservationId};
pub use stream::EventStream;
pub use value::ObservableValue;
