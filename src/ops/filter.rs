use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Emits only the values for which `predicate` returns `true`.
pub fn filter<'a, Item, Err, F>(
  predicate: F,
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
  F: Fn(&Item) -> bool + 'a,
{
  move |source| {
    let predicate = Rc::new(predicate);
    Observable::new(move |downstream| {
      source.actual_subscribe(Subscriber::new(FilterObserver {
        downstream,
        predicate: predicate.clone(),
      }))
    })
  }
}

pub struct FilterObserver<'a, Item, Err, F> {
  downstream: Subscriber<'a, Item, Err>,
  predicate: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<'_, Item, Err, F>
where
  F: Fn(&Item) -> bool,
{
  fn on_next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.downstream.next(value)
    }
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
