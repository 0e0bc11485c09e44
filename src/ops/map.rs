use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Creates a new stream which calls a closure on each element and uses
/// its return as the value.
pub fn map<'a, Item, U, Err, F>(f: F) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, U, Err>
where
  Item: 'a,
  U: 'a,
  Err: 'a,
  F: Fn(Item) -> U + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream| {
      source.actual_subscribe(Subscriber::new(MapObserver { downstream, f: f.clone() }))
    })
  }
}

/// Like [`map`], but the closure may fail. An `Err` is delivered as the
/// stream's error and the source is unsubscribed.
pub fn try_map<'a, Item, U, Err, F>(
  f: F,
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, U, Err>
where
  Item: 'a,
  U: 'a,
  Err: 'a,
  F: Fn(Item) -> Result<U, Err> + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream| {
      source.actual_subscribe(Subscriber::new(TryMapObserver { downstream, f: f.clone() }))
    })
  }
}

pub struct MapObserver<'a, U, Err, F> {
  downstream: Subscriber<'a, U, Err>,
  f: Rc<F>,
}

impl<Item, U, Err, F> Observer<Item, Err> for MapObserver<'_, U, Err, F>
where
  F: Fn(Item) -> U,
{
  fn on_next(&mut self, value: Item) { self.downstream.next((self.f)(value)) }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

pub struct TryMapObserver<'a, U, Err, F> {
  downstream: Subscriber<'a, U, Err>,
  f: Rc<F>,
}

impl<Item, U, Err, F> Observer<Item, Err> for TryMapObserver<'_, U, Err, F>
where
  F: Fn(Item) -> Result<U, Err>,
{
  fn on_next(&mut self, value: Item) {
    if let Err(err) = self.try_on_next(value) {
      self.downstream.error(err);
    }
  }

  fn try_on_next(&mut self, value: Item) -> Result<(), Err> {
    let mapped = (self.f)(value)?;
    self.downstream.next(mapped);
    Ok(())
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
