use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Emits only the first `count` values emitted by the source Observable, then
/// completes and unsubscribes from the source.
///
/// If the source emits fewer than `count` values then all of its values are
/// emitted. `take(0)` completes without subscribing to the source at all.
///
/// # Example
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut got = vec![];
/// Observable::from_iter(0..).take(3).subscribe(|v| got.push(v));
/// assert_eq!(got, [0, 1, 2]);
/// ```
pub fn take<'a, Item, Err>(count: usize) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
{
  move |source| {
    Observable::new(move |downstream: Subscriber<'a, Item, Err>| {
      if count == 0 {
        downstream.complete();
        return None;
      }
      Some(source.actual_subscribe(Subscriber::new(TakeObserver { downstream, remaining: count })))
    })
  }
}

pub struct TakeObserver<'a, Item, Err> {
  downstream: Subscriber<'a, Item, Err>,
  remaining: usize,
}

impl<Item, Err> Observer<Item, Err> for TakeObserver<'_, Item, Err> {
  fn on_next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.downstream.next(value);
    if self.remaining == 0 {
      self.downstream.complete();
    }
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.remaining == 0 || self.downstream.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn base_function() {
    let completed = Cell::new(false);
    let mut next_count = 0;

    Observable::from_iter(0..100)
      .take(5)
      .subscribe_all(|_| next_count += 1, |_| {}, || completed.set(true));

    assert!(completed.get());
    assert_eq!(next_count, 5);
  }

  #[rxlite_macro::test]
  fn take_zero_never_subscribes_source() {
    let subscribed = Cell::new(false);
    let completed = Cell::new(false);
    let source: Observable<i32> = Observable::new(|_| subscribed.set(true));
    source.take(0).subscribe_all(|_| {}, |_| {}, || completed.set(true));
    assert!(!subscribed.get());
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn stops_upstream_producer() {
    let produced = Cell::new(0);
    let source: Observable<i32> = Observable::new(|subscriber| {
      for v in 0..1000 {
        if subscriber.is_closed() {
          break;
        }
        produced.set(produced.get() + 1);
        subscriber.next(v);
      }
    });
    source.take(3).subscribe(|_| {});
    assert_eq!(produced.get(), 3);
  }

  #[rxlite_macro::test]
  fn fewer_values_than_count() {
    let mut got = vec![];
    Observable::from_iter([1, 2]).take(10).subscribe(|v| got.push(v));
    assert_eq!(got, [1, 2]);
  }
}
