//! # rxlite: a small push-based reactive core
//!
//! Single-threaded observables, subjects and operators, plus a shell glob to
//! regular expression compiler.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//!
//! use rxlite::prelude::*;
//!
//! let seen = RefCell::new(vec![]);
//! let subject: Subject<i32> = Subject::new();
//! let subscription = subject
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .subscribe(|v| seen.borrow_mut().push(v));
//!
//! subject.next(1);
//! subject.next(2);
//! subscription.unsubscribe();
//! subject.next(4);
//! assert_eq!(*seen.borrow(), [20]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A lazy producer, run again for every subscription |
//! | [`Subscribable`] | `subscribe`, `pipe` and the operator methods |
//! | [`Subscriber`] | The live handle of one subscription |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Multicast source that is also an observer |
//!
//! ## Feature Flags
//!
//! - **`glob`** (default): the [`glob`] module and its `fancy-regex` engine
//!
//! [`Observable`]: observable::Observable
//! [`Subscribable`]: observable::Subscribable
//! [`Subscriber`]: subscriber::Subscriber
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject

pub mod factory;
#[cfg(feature = "glob")]
pub mod glob;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
