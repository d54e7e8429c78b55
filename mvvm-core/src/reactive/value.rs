//! Observable Value
//!
//! An [`ObservableValue`] holds one mutable value and notifies observers with
//! `(old, new)` every time it is assigned.
//!
//! # How Notification Works
//!
//! 1. `set(v)` swaps `v` in and keeps the previous value.
//!
//! 2. Every live observation is called with `(&old, &new)`. This happens even
//!    when `new == old`; only the `observe_new*` family filters.
//!
//! 3. Handlers run after the swap, so reading the value from inside a handler
//!    already yields `new`.
//!
//! # Sharing
//!
//! Cloning an `ObservableValue` yields another handle to the same value and
//! the same observations, like a signal. Handlers typically capture a clone
//! when they need to read or write back.
//!
//! # Re-entrancy
//!
//! No internal borrow is held while handlers run. A handler may call
//! [`set`](ObservableValue::set) on the value it observes; the nested
//! notification pass completes before the outer one continues. The one
//! exception is [`with`](ObservableValue::with), whose closure runs under a
//! shared borrow and must not assign.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use tracing::trace;

use super::observation::Observation;
use super::registry::{ChangeHandler, Registry};

struct ValueInner<V> {
    value: RefCell<V>,
    observations: Registry<ChangeHandler<V>>,
}

/// A mutable value that notifies observers on every assignment.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use mvvm_core::reactive::ObservableValue;
///
/// let title = ObservableValue::new(String::from("a"));
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let seen_clone = Rc::clone(&seen);
/// let _observation = title.observe(move |old: &String, new: &String| {
///     seen_clone.borrow_mut().push((old.clone(), new.clone()));
/// });
///
/// title.set(String::from("b"));
/// assert_eq!(*seen.borrow(), vec![(String::from("a"), String::from("b"))]);
/// ```
pub struct ObservableValue<V> {
    inner: Rc<ValueInner<V>>,
}

impl<V: 'static> ObservableValue<V> {
    /// Create a new observable with the given initial value.
    ///
    /// Nobody is notified.
    pub fn new(value: V) -> Self {
        Self {
            inner: Rc::new(ValueInner {
                value: RefCell::new(value),
                observations: Registry::new(),
            }),
        }
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` assigns to this value (directly or through a handler).
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value without notifying anyone.
    ///
    /// Meant for resynchronizing state that observers already reflect.
    pub fn silent_set(&self, value: V) {
        // The old value is dropped after the borrow is released.
        let _previous = self.inner.value.replace(value);
        trace!("value replaced silently");
    }

    /// Register a handler called with `(old, new)` on every future assignment.
    ///
    /// The handler is not called now. It stays registered for as long as the
    /// returned [`Observation`] is alive and valid.
    pub fn observe<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V, &V) + 'static,
    {
        self.inner.observations.register(Box::new(handler))
    }

    /// Register a handler called with the new value on every future assignment.
    pub fn observe_value<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V) + 'static,
    {
        self.observe(move |_, new| handler(new))
    }

    /// Number of registered observations.
    ///
    /// Includes observations dropped or invalidated since the last
    /// notification, which are pruned lazily.
    pub fn observation_count(&self) -> usize {
        self.inner.observations.len()
    }

    fn notify(&self, old: &V, new: &V) {
        let delivered = self
            .inner
            .observations
            .dispatch(|handler| handler(old, new));
        trace!(delivered, "value change delivered");
    }
}

impl<V: Clone + 'static> ObservableValue<V> {
    /// Get a clone of the current value.
    pub fn get(&self) -> V {
        self.inner.value.borrow().clone()
    }

    /// Assign a new value and notify every live observation with `(old, new)`.
    ///
    /// Notifies even if `value` equals the current value.
    pub fn set(&self, value: V) {
        self.replace(value);
    }

    /// Like [`set`](Self::set), returning the previous value.
    pub fn replace(&self, value: V) -> V {
        let new = value.clone();
        let old = self.inner.value.replace(value);
        self.notify(&old, &new);
        old
    }

    /// Assign the result of `f` applied to the current value.
    ///
    /// Notifies like [`set`](Self::set).
    ///
    /// # Panics
    ///
    /// Panics if `f` assigns to this value; it runs inside [`with`](Self::with).
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&V) -> V,
    {
        let next = self.with(f);
        self.set(next);
    }

    /// Call `handler` once with `(current, current)`, then behave like
    /// [`observe`](Self::observe).
    pub fn observe_from_current<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V, &V) + 'static,
    {
        let current = self.get();
        handler(&current, &current);
        self.observe(handler)
    }

    /// Call `handler` once with the current value, then behave like
    /// [`observe_value`](Self::observe_value).
    pub fn observe_value_from_current<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V) + 'static,
    {
        let current = self.get();
        handler(&current);
        self.observe_value(handler)
    }
}

impl<V: Clone + PartialEq + 'static> ObservableValue<V> {
    /// Like [`observe`](Self::observe), but skips assignments where
    /// `new == old`.
    ///
    /// Other observers of the same value still see those assignments.
    pub fn observe_new<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V, &V) + 'static,
    {
        self.observe(move |old, new| {
            if old != new {
                handler(old, new);
            }
        })
    }

    /// Like [`observe_value`](Self::observe_value), but skips assignments
    /// where `new == old`.
    pub fn observe_new_value<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V) + 'static,
    {
        self.observe(move |old, new| {
            if old != new {
                handler(new);
            }
        })
    }

    /// Call `handler` once with `(current, current)`, then behave like
    /// [`observe_new`](Self::observe_new).
    ///
    /// The initial call is never filtered.
    pub fn observe_new_from_current<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V, &V) + 'static,
    {
        let current = self.get();
        handler(&current, &current);
        self.observe_new(handler)
    }

    /// Call `handler` once with the current value, then behave like
    /// [`observe_new_value`](Self::observe_new_value).
    pub fn observe_new_value_from_current<F>(&self, handler: F) -> Observation
    where
        F: Fn(&V) + 'static,
    {
        let current = self.get();
        handler(&current);
        self.observe_new_value(handler)
    }
}

impl<V> Clone for ObservableValue<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Default + 'static> Default for ObservableValue<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: 'static> From<V> for ObservableValue<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V: Debug + 'static> Debug for ObservableValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ObservableValue");
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &"<borrowed>"),
        };
        s.field("observation_count", &self.inner.observations.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
