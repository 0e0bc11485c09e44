use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::Teardown,
};

/// Recovers from an error by switching to the observable returned by `f`.
///
/// Values and completion of the source pass through untouched. When the source
/// errors, `f` receives the error and the returned observable is subscribed in
/// its place; its events (including its own errors, of type `E2`) go
/// downstream.
pub fn catch_error<'a, Item, Err, E2, F>(
  f: F,
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, E2>
where
  Item: 'a,
  Err: 'a,
  E2: 'a,
  F: Fn(Err) -> Observable<'a, Item, E2> + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream: Subscriber<'a, Item, E2>| {
      let replacement = Rc::new(RefCell::new(None));
      let upstream = source.actual_subscribe(Subscriber::new(CatchErrorObserver {
        downstream,
        f: f.clone(),
        replacement: replacement.clone(),
      }));
      Teardown::new(move || {
        upstream.unsubscribe();
        let inner: Option<Subscriber<'a, Item, E2>> = replacement.borrow_mut().take();
        if let Some(inner) = inner {
          inner.unsubscribe();
        }
      })
    })
  }
}

pub struct CatchErrorObserver<'a, Item, E2, F> {
  downstream: Subscriber<'a, Item, E2>,
  f: Rc<F>,
  replacement: Rc<RefCell<Option<Subscriber<'a, Item, E2>>>>,
}

impl<'a, Item, Err, E2, F> Observer<Item, Err> for CatchErrorObserver<'a, Item, E2, F>
where
  Item: 'a,
  E2: 'a,
  F: Fn(Err) -> Observable<'a, Item, E2>,
{
  fn on_next(&mut self, value: Item) { self.downstream.next(value) }

  fn on_error(self, err: Err) {
    let fallback = (self.f)(err);
    let inner = fallback.actual_subscribe(Subscriber::new(self.downstream));
    if !inner.is_closed() {
      *self.replacement.borrow_mut() = Some(inner);
    }
  }

  fn on_complete(self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
