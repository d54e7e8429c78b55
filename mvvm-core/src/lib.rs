//! MVVM Core
//!
//! This crate provides the observable state primitives that view models use
//! to talk to their views:
//!
//! - [`ObservableValue`]: a mutable value that notifies on every assignment
//! - [`EventStream`]: a stream of one-off events with no stored state
//! - [`Observation`]: the token returned by every subscription
//!
//! Observers are held weakly, so subscribing never keeps a view alive. An
//! observation ends when its token is dropped or invalidated.
//!
//! # Architecture
//!
//! - `reactive`: the containers, the observation tokens and the registry
//!   they share
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use mvvm_core::{EventStream, ObservableValue};
//!
//! struct LoginViewModel {
//!     username: ObservableValue<String>,
//!     submitted: EventStream<String>,
//! }
//!
//! let vm = LoginViewModel {
//!     username: ObservableValue::new(String::new()),
//!     submitted: EventStream::new(),
//! };
//!
//! let label = Rc::new(RefCell::new(String::new()));
//! let label_clone = Rc::clone(&label);
//! let _binding = vm.username.observe_new_value_from_current(move |name: &String| {
//!     *label_clone.borrow_mut() = format!("Hello, {name}");
//! });
//!
//! let _on_submit = vm.submitted.observe(|name: &String| {
//!     assert_eq!(name, "ada");
//! });
//!
//! vm.username.set("ada".to_string());
//! assert_eq!(*label.borrow(), "Hello, ada");
//!
//! vm.submitted.emit(vm.username.get());
//! ```

pub mod reactive;

pub use reactive::{EventStream, Observation, ObservationId, ObservableValue};
