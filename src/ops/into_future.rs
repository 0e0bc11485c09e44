//! IntoFuture operator implementation
//!
//! Converts an Observable into a Future that resolves with the first value
//! emitted by the observable.
//!
//! ## Behavior
//!
//! - **First value**: the future resolves with `Ok(Ok(value))` and the source
//!   is unsubscribed right away.
//! - **Error from observable**: the future resolves with `Ok(Err(error))`.
//! - **Empty observable**: if the observable completes without emitting any
//!   values, the future resolves with `Err(IntoFutureError::Empty)`.
//! - **Released subscription**: if the source drops the subscription without
//!   any terminal event, the future resolves with
//!   `Err(IntoFutureError::Dropped)`.
//!
//! A source that never emits keeps the future pending. Dropping the future
//! unsubscribes from the source.
//!
//! ## Examples
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let value = futures::executor::block_on(Observable::from_iter([42, 43]).into_future());
//! assert_eq!(value, Ok(Ok(42)));
//!
//! let empty = futures::executor::block_on(Observable::<i32>::empty().into_future());
//! assert_eq!(empty, Err(IntoFutureError::Empty));
//! ```

use std::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use futures::channel::oneshot;
use pin_project_lite::pin_project;
use thiserror::Error;

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionGuard},
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can prevent an observable future from resolving with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntoFutureError {
  /// The observable completed without any value.
  #[error("the observable completed without emitting a value")]
  Empty,

  /// The subscription was released without a value or terminal event.
  #[error("the observable dropped its subscription before emitting a value")]
  Dropped,
}

/// The result type for `into_future()`.
pub type IntoFutureResult<Item, Err> = Result<Result<Item, Err>, IntoFutureError>;

// ============================================================================
// Operator
// ============================================================================

/// Subscribes to `source` and returns a future of its first value.
pub fn into_future<'a, Item, Err>(source: Observable<'a, Item, Err>) -> ObservableFuture<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
{
  let (sender, receiver) = oneshot::channel();
  let subscription = source.actual_subscribe(Subscriber::new(FutureObserver { sender: Some(sender) }));
  ObservableFuture { receiver, _subscription: subscription.unsubscribe_when_dropped() }
}

pin_project! {
  /// Future returned by [`into_future`].
  #[must_use = "futures do nothing unless polled"]
  pub struct ObservableFuture<'a, Item, Err> {
    #[pin]
    receiver: oneshot::Receiver<IntoFutureResult<Item, Err>>,
    _subscription: SubscriptionGuard<Subscriber<'a, Item, Err>>,
  }
}

impl<Item, Err> Future for ObservableFuture<'_, Item, Err> {
  type Output = IntoFutureResult<Item, Err>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match self.project().receiver.poll(cx) {
      Poll::Ready(Ok(result)) => Poll::Ready(result),
      Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(IntoFutureError::Dropped)),
      Poll::Pending => Poll::Pending,
    }
  }
}

struct FutureObserver<Item, Err> {
  sender: Option<oneshot::Sender<IntoFutureResult<Item, Err>>>,
}

impl<Item, Err> FutureObserver<Item, Err> {
  fn resolve(&mut self, result: IntoFutureResult<Item, Err>) {
    if let Some(sender) = self.sender.take() {
      // The receiver may already be gone; nothing left to notify then.
      let _ = sender.send(result);
    }
  }
}

impl<Item, Err> Observer<Item, Err> for FutureObserver<Item, Err> {
  fn on_next(&mut self, value: Item) { self.resolve(Ok(Ok(value))) }

  fn on_error(mut self, err: Err) { self.resolve(Ok(Err(err))) }

  fn on_complete(mut self) { self.resolve(Err(IntoFutureError::Empty)) }

  fn is_closed(&self) -> bool { self.sender.is_none() }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use futures::{executor::block_on, FutureExt};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn resolves_with_first_value_and_unsubscribes() {
    let produced = Cell::new(0);
    let source: Observable<i32> = Observable::new(|subscriber| {
      for v in 1..=10 {
        if subscriber.is_closed() {
          break;
        }
        produced.set(produced.get() + 1);
        subscriber.next(v);
      }
    });
    assert_eq!(block_on(source.into_future()), Ok(Ok(1)));
    assert_eq!(produced.get(), 1);
  }

  #[rxlite_macro::test]
  fn resolves_with_error() {
    let fut = factory::throw_err::<i32, _>("boom").into_future();
    assert_eq!(block_on(fut), Ok(Err("boom")));
  }

  #[rxlite_macro::test]
  fn empty_source() {
    let fut = Observable::<i32>::empty().into_future();
    assert_eq!(block_on(fut), Err(IntoFutureError::Empty));
  }

  #[rxlite_macro::test]
  fn resolves_later_from_subject() {
    let subject: Subject<i32> = Subject::new();
    let mut fut = subject.into_future();
    assert!((&mut fut).now_or_never().is_none());
    subject.next(5);
    assert_eq!(block_on(fut), Ok(Ok(5)));
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn released_subscription_is_reported() {
    let source: Observable<i32> = Observable::new(|subscriber| subscriber.unsubscribe());
    assert_eq!(block_on(source.into_future()), Err(IntoFutureError::Dropped));
  }

  #[rxlite_macro::test]
  fn dropping_the_future_unsubscribes() {
    let subject: Subject<i32> = Subject::new();
    let fut = subject.into_future();
    assert_eq!(subject.subscriber_count(), 1);
    drop(fut);
    assert_eq!(subject.subscriber_count(), 0);
  }
}
