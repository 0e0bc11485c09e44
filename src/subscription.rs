//! Subscription handles and teardown logic
//!
//! A subscription is the control handle returned by `subscribe`. Unsubscribing
//! is idempotent: the teardown attached to a subscription runs at most once no
//! matter how many times `unsubscribe` is called.

use std::fmt::{Debug, Formatter};

mod dynamic;
pub use dynamic::DynamicSubscriptions;

/// Handle that allows cancelling an active observation.
pub trait Subscription {
  /// Stop receiving events and release the resources held by the producer.
  ///
  /// Calling this more than once has the same effect as calling it once.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(self)
  }
}

impl<S: Subscription + ?Sized> Subscription for Box<S> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// Teardown
// ============================================================================

/// The clean-up callback a producer hands back when it starts.
///
/// It runs exactly once, when the owning subscription is unsubscribed (which
/// also happens after `error` or `complete`).
#[derive(Default)]
pub struct Teardown<'a>(Option<Box<dyn FnOnce() + 'a>>);

impl<'a> Teardown<'a> {
  pub fn new(f: impl FnOnce() + 'a) -> Self { Self(Some(Box::new(f))) }

  /// A teardown that does nothing.
  pub fn none() -> Self { Self(None) }

  pub fn is_empty(&self) -> bool { self.0.is_none() }

  /// Runs the callback, consuming the teardown.
  pub fn run(self) {
    if let Some(f) = self.0 {
      f();
    }
  }

  /// Combines two teardowns; `self` runs first.
  pub fn and(self, other: Teardown<'a>) -> Teardown<'a> {
    match (self.0, other.0) {
      (None, None) => Teardown::none(),
      (Some(f), None) | (None, Some(f)) => Teardown(Some(f)),
      (Some(first), Some(second)) => Teardown::new(move || {
        first();
        second();
      }),
    }
  }
}

impl Debug for Teardown<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("Teardown")
      .field(&if self.is_empty() { "none" } else { "callback" })
      .finish()
  }
}

/// Anything a producer may return as its teardown.
///
/// - `()`: nothing to clean up
/// - [`Teardown`]: an explicit callback
/// - `Option<T>`: `None` means nothing to clean up
/// - any [`Subscription`]: unsubscribed on teardown, which is how operators
///   hand back the subscription to their source
pub trait IntoTeardown<'a> {
  fn into_teardown(self) -> Teardown<'a>;
}

impl<'a> IntoTeardown<'a> for () {
  #[inline]
  fn into_teardown(self) -> Teardown<'a> { Teardown::none() }
}

impl<'a> IntoTeardown<'a> for Teardown<'a> {
  #[inline]
  fn into_teardown(self) -> Teardown<'a> { self }
}

impl<'a, T: IntoTeardown<'a>> IntoTeardown<'a> for Option<T> {
  fn into_teardown(self) -> Teardown<'a> { self.map_or_else(Teardown::none, T::into_teardown) }
}

impl<'a, S> IntoTeardown<'a> for S
where
  S: Subscription + 'a,
{
  fn into_teardown(self) -> Teardown<'a> { Teardown::new(move || self.unsubscribe()) }
}

// ============================================================================
// SubscriptionGuard
// ============================================================================

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
