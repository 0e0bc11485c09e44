//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Glob compiler
#[cfg(feature = "glob")]
pub use crate::glob::{compile_glob, glob_to_regex, GlobError, GlobMatcher, Patterns};
// Core traits and types
pub use crate::observable::{Observable, Subscribable};
pub use crate::observer::Observer;
// Operators (as free functions) and the future adapter
pub use crate::ops::{IntoFutureError, IntoFutureResult, ObservableFuture};
// Subject
pub use crate::subject::{BehaviorSubject, ReplaySubject, Subject};
pub use crate::subscriber::Subscriber;
// Subscription
pub use crate::subscription::{IntoTeardown, Subscription, SubscriptionGuard, Teardown};
pub use crate::{factory, ops, pipe};
