use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Runs a side effect for every value and forwards the value unchanged.
pub fn tap<'a, Item, Err, F>(f: F) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
  F: Fn(&Item) + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream| {
      source.actual_subscribe(Subscriber::new(TapObserver { downstream, f: f.clone() }))
    })
  }
}

pub struct TapObserver<'a, Item, Err, F> {
  downstream: Subscriber<'a, Item, Err>,
  f: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for TapObserver<'_, Item, Err, F>
where
  F: Fn(&Item),
{
  fn on_next(&mut self, value: Item) {
    (self.f)(&value);
    self.downstream.next(value);
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
