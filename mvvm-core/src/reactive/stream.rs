//! Event Stream
//!
//! An [`EventStream`] pushes transient values to its observers. Unlike
//! [`ObservableValue`](super::ObservableValue) it stores nothing: a late
//! observer never sees earlier emissions, and there is no replay.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::observation::Observation;
use super::registry::{Registry, ValueHandler};

/// A write-only stream of events of type `V`.
///
/// Cloning yields another handle to the same observers.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use mvvm_core::reactive::EventStream;
///
/// let taps = EventStream::new();
/// let total = Rc::new(Cell::new(0));
///
/// let total_clone = Rc::clone(&total);
/// let observation = taps.observe(move |n: &i32| total_clone.set(total_clone.get() + n));
///
/// taps.emit(2);
/// observation.invalidate();
/// taps.emit(3);
/// assert_eq!(total.get(), 2);
/// ```
pub struct EventStream<V> {
    observations: Rc<Registry<ValueHandler<V>>>,
}

impl<V: 'static> EventStream<V> {
    /// Create a stream with no observers.
    pub fn new() -> Self {
        Self {
            observations: Rc::new(Registry::new()),
        }
    }

    /// Deliver `value` to every live observation.
    ///
    /// Returns once all handlers have run. The value is dropped afterwards.
    pub fn emit(&self, value: V) {
        let delivered = self.observations.dispatch(|handler| handler(&value));
        trace!(delivered, "event emitted");
    }

    /// Register a handler for future emissions.
    pub fn observe<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V) + 'static,
    {
        self.observations.register(Box::new(handler))
    }

    /// Number of registered observations, including dead ones not yet pruned.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

impl<V: 'static> Default for EventStream<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for EventStream<V> {
    fn clone(&self) -> Self {
        Self {
            observations: Rc::clone(&self.observations),
        }
    }
}

impl<V: 'static> fmt::Debug for EventStream<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("observation_count", &self.observation_count())
            .finish()
    }
}
