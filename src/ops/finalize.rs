use std::rc::Rc;

use crate::{observable::Observable, subscriber::Subscriber, subscription::Teardown};

/// Calls `f` exactly once when the subscription ends, whatever the reason:
/// completion, error or unsubscribe. On a terminal event `f` runs after the
/// observer was notified.
pub fn finalize<'a, Item, Err, F>(f: F) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: 'a,
  Err: 'a,
  F: Fn() + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream: Subscriber<'a, Item, Err>| {
      let upstream = source.actual_subscribe(Subscriber::new(downstream));
      let f = f.clone();
      Teardown::new(move || upstream.unsubscribe()).and(Teardown::new(move || f()))
    })
  }
}
