//! Cold observables and the `Subscribable` capability trait.
//!
//! An [`Observable`] only stores its producer. Every subscription builds a
//! fresh [`Subscriber`] and runs the producer again, so two subscribers never
//! share an execution.

use std::{
  convert::Infallible,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{
  observer::{FnMutObserver, NextResult, Observer, ObserverAll},
  ops,
  subscriber::Subscriber,
  subscription::{IntoTeardown, Teardown},
};

type Producer<'a, Item, Err> = dyn Fn(Subscriber<'a, Item, Err>) -> Teardown<'a> + 'a;

/// A representation of any set of values over any amount of time.
///
/// Cloning an observable clones the producer handle, not an execution.
pub struct Observable<'a, Item, Err = Infallible> {
  producer: Rc<Producer<'a, Item, Err>>,
}

impl<'a, Item: 'a, Err: 'a> Observable<'a, Item, Err> {
  /// param `producer`: the function that is called each time the Observable
  /// is subscribed to. It is given the new Subscriber, to which values can be
  /// `next`ed, or `error`/`complete` called to terminate. Whatever it returns
  /// becomes the subscription's teardown.
  ///
  /// The producer is stored, not invoked.
  pub fn new<F, T>(producer: F) -> Self
  where
    F: Fn(Subscriber<'a, Item, Err>) -> T + 'a,
    T: IntoTeardown<'a>,
  {
    Self { producer: Rc::new(move |subscriber| producer(subscriber).into_teardown()) }
  }

  /// Runs the producer for an already built subscriber and attaches the
  /// teardown it returns.
  pub fn actual_subscribe(&self, subscriber: Subscriber<'a, Item, Err>) -> Subscriber<'a, Item, Err> {
    let teardown = (self.producer)(subscriber.clone());
    subscriber.add_teardown(teardown);
    subscriber
  }
}

impl<Item, Err> Clone for Observable<'_, Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item, Err> Debug for Observable<'_, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str("Observable") }
}

// ============================================================================
// Subscribable
// ============================================================================

/// Anything that can be subscribed to: observables and every subject kind.
///
/// Implementors only provide [`as_observable`](Subscribable::as_observable);
/// subscribing, `pipe` and the operator methods are built on top of it.
pub trait Subscribable<'a>: Sized {
  type Item: 'a;
  type Err: 'a;

  /// A cold view of this source.
  fn as_observable(&self) -> Observable<'a, Self::Item, Self::Err>;

  /// Subscribes any [`Observer`] implementation.
  fn subscribe_with<O>(&self, observer: O) -> Subscriber<'a, Self::Item, Self::Err>
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    self.as_observable().actual_subscribe(Subscriber::new(observer))
  }

  /// Subscribes a `next` handler. The handler may return `()` or
  /// `Result<(), Err>`; an `Err` becomes this subscription's error.
  fn subscribe<F, R>(&self, next: F) -> Subscriber<'a, Self::Item, Self::Err>
  where
    F: FnMut(Self::Item) -> R + 'a,
    R: NextResult<Self::Err>,
  {
    self.subscribe_with(FnMutObserver(next))
  }

  fn subscribe_all<N, E, C, R>(
    &self, next: N, error: E, complete: C,
  ) -> Subscriber<'a, Self::Item, Self::Err>
  where
    N: FnMut(Self::Item) -> R + 'a,
    R: NextResult<Self::Err>,
    E: FnOnce(Self::Err) + 'a,
    C: FnOnce() + 'a,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Applies one operator. Chain calls or use [`pipe!`](crate::pipe) for
  /// several.
  fn pipe<Out>(&self, op: impl FnOnce(Observable<'a, Self::Item, Self::Err>) -> Out) -> Out {
    op(self.as_observable())
  }

  fn map<U, F>(&self, f: F) -> Observable<'a, U, Self::Err>
  where
    U: 'a,
    F: Fn(Self::Item) -> U + 'a,
  {
    self.pipe(ops::map(f))
  }

  fn try_map<U, F>(&self, f: F) -> Observable<'a, U, Self::Err>
  where
    U: 'a,
    F: Fn(Self::Item) -> Result<U, Self::Err> + 'a,
  {
    self.pipe(ops::try_map(f))
  }

  fn filter<F>(&self, predicate: F) -> Observable<'a, Self::Item, Self::Err>
  where
    F: Fn(&Self::Item) -> bool + 'a,
  {
    self.pipe(ops::filter(predicate))
  }

  fn distinct_until_changed(&self) -> Observable<'a, Self::Item, Self::Err>
  where
    Self::Item: PartialEq + Clone,
  {
    self.pipe(ops::distinct_until_changed())
  }

  fn distinct_until_changed_by<F>(&self, eq: F) -> Observable<'a, Self::Item, Self::Err>
  where
    Self::Item: Clone,
    F: Fn(&Self::Item, &Self::Item) -> bool + 'a,
  {
    self.pipe(ops::distinct_until_changed_by(eq))
  }

  fn tap<F>(&self, f: F) -> Observable<'a, Self::Item, Self::Err>
  where
    F: Fn(&Self::Item) + 'a,
  {
    self.pipe(ops::tap(f))
  }

  fn take(&self, count: usize) -> Observable<'a, Self::Item, Self::Err> {
    self.pipe(ops::take(count))
  }

  fn catch_error<E2, F>(&self, f: F) -> Observable<'a, Self::Item, E2>
  where
    E2: 'a,
    F: Fn(Self::Err) -> Observable<'a, Self::Item, E2> + 'a,
  {
    self.pipe(ops::catch_error(f))
  }

  fn finalize<F>(&self, f: F) -> Observable<'a, Self::Item, Self::Err>
  where
    F: Fn() + 'a,
  {
    self.pipe(ops::finalize(f))
  }

  fn switch_map<U, F>(&self, f: F) -> Observable<'a, U, Self::Err>
  where
    U: 'a,
    F: Fn(Self::Item) -> Observable<'a, U, Self::Err> + 'a,
  {
    self.pipe(ops::switch_map(f))
  }

  fn share(&self) -> Observable<'a, Self::Item, Self::Err>
  where
    Self::Item: Clone,
    Self::Err: Clone,
  {
    self.pipe(ops::share())
  }

  /// Resolves with the first value, or the first error. See
  /// [`ObservableFuture`](ops::into_future::ObservableFuture).
  fn into_future(&self) -> ops::into_future::ObservableFuture<'a, Self::Item, Self::Err> {
    self.pipe(ops::into_future)
  }
}

impl<'a, Item: 'a, Err: 'a> Subscribable<'a> for Observable<'a, Item, Err> {
  type Item = Item;
  type Err = Err;

  #[inline]
  fn as_observable(&self) -> Observable<'a, Item, Err> { self.clone() }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::subscription::Subscription;

  #[rxlite_macro::test]
  fn proxy_call() {
    let next = Cell::new(0);
    let err = Cell::new(0);
    let complete = Cell::new(0);

    let source: Observable<i32, &str> = Observable::new(|subscriber| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.next(3);
      subscriber.complete();
      subscriber.next(3);
      subscriber.error("never dispatch error");
    });
    source.subscribe_all(
      |_| next.set(next.get() + 1),
      |_| err.set(err.get() + 1),
      || complete.set(complete.get() + 1),
    );

    assert_eq!(next.get(), 3);
    assert_eq!(complete.get(), 1);
    assert_eq!(err.get(), 0);
  }

  #[rxlite_macro::test]
  fn producer_is_lazy_and_rerun() {
    let calls = Cell::new(0);
    let first = RefCell::new(vec![]);
    let second = RefCell::new(vec![]);
    let source: Observable<i32> = Observable::new(|subscriber| {
      calls.set(calls.get() + 1);
      subscriber.next(calls.get());
      subscriber.complete();
    });
    assert_eq!(calls.get(), 0);

    source.subscribe(|v| first.borrow_mut().push(v));
    source.subscribe(|v| second.borrow_mut().push(v));
    assert_eq!(calls.get(), 2);
    assert_eq!(*first.borrow(), [1]);
    assert_eq!(*second.borrow(), [2]);
  }

  #[rxlite_macro::test]
  fn teardown_runs_once_on_unsubscribe() {
    let torn_down = Cell::new(0);
    let counter = &torn_down;
    let source: Observable<i32> =
      Observable::new(move |_| Teardown::new(move || counter.set(counter.get() + 1)));
    let subscription = source.subscribe(|_| {});
    assert!(!subscription.is_closed());
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(torn_down.get(), 1);
  }

  #[rxlite_macro::test]
  fn synchronous_complete_still_runs_teardown() {
    let torn_down = Cell::new(false);
    let flag = &torn_down;
    let source: Observable<i32> = Observable::new(move |subscriber| {
      subscriber.complete();
      Teardown::new(move || flag.set(true))
    });
    let subscription = source.subscribe(|_| {});
    assert!(subscription.is_closed());
    assert!(torn_down.get());
  }

  #[rxlite_macro::test]
  fn failing_handler_routes_to_error() {
    let error = RefCell::new(None);
    let seen = RefCell::new(vec![]);
    let source: Observable<i32, String> = Observable::new(|subscriber| {
      for v in 1..=5 {
        subscriber.next(v);
      }
      subscriber.complete();
    });
    source.subscribe_all(
      |v| {
        seen.borrow_mut().push(v);
        if v == 2 { Err(format!("rejected {v}")) } else { Ok(()) }
      },
      |e| *error.borrow_mut() = Some(e),
      || panic!("must not complete"),
    );
    assert_eq!(*seen.borrow(), [1, 2]);
    assert_eq!(error.borrow().as_deref(), Some("rejected 2"));
  }

  #[rxlite_macro::test]
  fn pipe_applies_operator() {
    let got = Cell::new(0);
    let source: Observable<i32> = Observable::new(|subscriber| {
      subscriber.next(1);
      subscriber.complete();
    });
    source.pipe(ops::map(|v: i32| v * 10)).subscribe(|v| got.set(v));
    assert_eq!(got.get(), 10);
  }
}
