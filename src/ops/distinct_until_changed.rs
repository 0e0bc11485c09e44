//! Filters consecutive duplicate items emitted by the source observable.

use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Emits items only if they are different from the previous item, compared
/// with `PartialEq`. The first value is always emitted.
pub fn distinct_until_changed<'a, Item, Err>(
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: PartialEq + Clone + 'a,
  Err: 'a,
{
  distinct_until_changed_by(|a: &Item, b: &Item| a == b)
}

/// Like [`distinct_until_changed`], with a custom equality.
pub fn distinct_until_changed_by<'a, Item, Err, F>(
  eq: F,
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: 'a,
  F: Fn(&Item, &Item) -> bool + 'a,
{
  move |source| {
    let eq = Rc::new(eq);
    Observable::new(move |downstream| {
      source.actual_subscribe(Subscriber::new(DistinctUntilChangedObserver {
        downstream,
        eq: eq.clone(),
        last: None,
      }))
    })
  }
}

/// Remembers the last forwarded value of one subscription.
pub struct DistinctUntilChangedObserver<'a, Item, Err, F> {
  downstream: Subscriber<'a, Item, Err>,
  eq: Rc<F>,
  last: Option<Item>,
}

impl<Item, Err, F> Observer<Item, Err> for DistinctUntilChangedObserver<'_, Item, Err, F>
where
  Item: Clone,
  F: Fn(&Item, &Item) -> bool,
{
  fn on_next(&mut self, value: Item) {
    if self.last.as_ref().is_some_and(|last| (self.eq)(last, &value)) {
      return;
    }
    self.last = Some(value.clone());
    self.downstream.next(value);
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
