//! Creation functions for observables.
//!
//! | Function | Values emitted | Terminates with |
//! |----------|----------------|-----------------|
//! | [`of`] | one value | complete |
//! | [`from_iter`] | every item of the iterator | complete |
//! | [`empty`] | none | complete |
//! | [`never`] | none | nothing |
//! | [`throw_err`] | none | error |
//! | [`defer`] | whatever the created observable emits | depends |
//! | [`merge`] | values of all sources, interleaved | complete after all sources |
//!
//! The free functions are generic over the error type so they can be mixed
//! with fallible sources. For infallible streams the same factories are
//! available as `Observable::of`, `Observable::from_iter`, `Observable::empty`
//! and `Observable::never`.
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let mut got = vec![];
//! Observable::from_iter(0..3).subscribe(|v| got.push(v));
//! assert_eq!(got, [0, 1, 2]);
//! ```

use std::{cell::Cell, convert::Infallible, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::Teardown,
};

/// Emits `value` once, then completes.
pub fn of<'a, Item, Err>(value: Item) -> Observable<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: 'a,
{
  Observable::new(move |subscriber: Subscriber<'a, Item, Err>| {
    subscriber.next(value.clone());
    subscriber.complete();
  })
}

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Every subscription iterates
/// a fresh clone of `iter`; iteration stops early once the subscriber is
/// closed, so unbounded iterators work together with `take`.
pub fn from_iter<'a, I, Err>(iter: I) -> Observable<'a, I::Item, Err>
where
  I: IntoIterator + Clone + 'a,
  I::Item: 'a,
  Err: 'a,
{
  Observable::new(move |subscriber: Subscriber<'a, I::Item, Err>| {
    for value in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(value);
    }
    subscriber.complete();
  })
}

/// Completes immediately without emitting any values.
pub fn empty<'a, Item: 'a, Err: 'a>() -> Observable<'a, Item, Err> {
  Observable::new(|subscriber: Subscriber<'a, Item, Err>| subscriber.complete())
}

/// Never emits and never terminates.
pub fn never<'a, Item: 'a, Err: 'a>() -> Observable<'a, Item, Err> {
  Observable::new(|_: Subscriber<'a, Item, Err>| {})
}

/// Immediately errors with a clone of `err`.
pub fn throw_err<'a, Item, Err>(err: Err) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: Clone + 'a,
{
  Observable::new(move |subscriber: Subscriber<'a, Item, Err>| subscriber.error(err.clone()))
}

/// Calls `factory` on every subscription and subscribes to the observable it
/// returns. A factory failure is delivered as the stream's error instead of
/// escaping from `subscribe`.
pub fn defer<'a, Item, Err, F>(factory: F) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
  F: Fn() -> Result<Observable<'a, Item, Err>, Err> + 'a,
{
  Observable::new(move |subscriber: Subscriber<'a, Item, Err>| match factory() {
    Ok(observable) => Some(observable.actual_subscribe(Subscriber::new(subscriber))),
    Err(err) => {
      subscriber.error(err);
      None
    }
  })
}

/// Subscribes to every source at once and forwards all their values.
///
/// Completes once every source completed; the first error from any source
/// terminates the merged stream and unsubscribes the others.
pub fn merge<'a, Item, Err, I>(sources: I) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
  I: IntoIterator<Item = Observable<'a, Item, Err>>,
{
  let sources: Vec<_> = sources.into_iter().collect();
  Observable::new(move |subscriber: Subscriber<'a, Item, Err>| {
    let remaining = Rc::new(Cell::new(sources.len()));
    if sources.is_empty() {
      subscriber.complete();
    }
    let mut inner = Vec::with_capacity(sources.len());
    for source in &sources {
      if subscriber.is_closed() {
        break;
      }
      inner.push(source.actual_subscribe(Subscriber::new(MergeObserver {
        downstream: subscriber.clone(),
        remaining: remaining.clone(),
      })));
    }
    Teardown::new(move || inner.iter().for_each(Subscriber::unsubscribe))
  })
}

struct MergeObserver<'a, Item, Err> {
  downstream: Subscriber<'a, Item, Err>,
  remaining: Rc<Cell<usize>>,
}

impl<Item, Err> Observer<Item, Err> for MergeObserver<'_, Item, Err> {
  fn on_next(&mut self, value: Item) { self.downstream.next(value) }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) {
    let remaining = self.remaining.get().saturating_sub(1);
    self.remaining.set(remaining);
    if remaining == 0 {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

impl<'a, Item: 'a> Observable<'a, Item, Infallible> {
  /// Infallible [`of`](crate::factory::of).
  pub fn of(value: Item) -> Self
  where
    Item: Clone,
  {
    of(value)
  }

  /// Infallible [`from_iter`](crate::factory::from_iter).
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = Item> + Clone + 'a,
  {
    from_iter(iter)
  }

  pub fn empty() -> Self { empty() }

  pub fn never() -> Self { never() }
}
