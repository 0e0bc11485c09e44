//! Reference-counted multicasting.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
  observable::Observable,
  subject::Subject,
  subscriber::Subscriber,
  subscription::Teardown,
};

struct ShareState<'a, Item, Err> {
  subject: Subject<'a, Item, Err>,
  connection: Option<Subscriber<'a, Item, Err>>,
  ref_count: usize,
}

/// Shares one subscription to the source between all subscribers.
///
/// The first subscriber connects a [`Subject`] to the source; later
/// subscribers join that subject. When the last subscriber leaves, the source
/// subscription is unsubscribed. Once the source terminated, the next
/// subscriber starts over with a fresh subject and a new connection.
pub fn share<'a, Item, Err>() -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: Clone + 'a,
{
  move |source| {
    let state = Rc::new(RefCell::new(ShareState {
      subject: Subject::new(),
      connection: None,
      ref_count: 0,
    }));
    Observable::new(move |downstream: Subscriber<'a, Item, Err>| {
      let (subject, connect) = {
        let mut state = state.borrow_mut();
        let restart = state.subject.is_closed();
        if restart {
          state.subject = Subject::new();
          state.connection = None;
        }
        state.ref_count += 1;
        (state.subject.clone(), restart || state.ref_count == 1)
      };

      let registration = subject.register(downstream);
      if connect {
        debug!("share: connecting to source");
        let connection = source.actual_subscribe(Subscriber::new(subject));
        if !connection.is_closed() {
          state.borrow_mut().connection = Some(connection);
        }
      }

      let state = state.clone();
      registration.and(Teardown::new(move || {
        let connection = {
          let mut state = state.borrow_mut();
          state.ref_count -= 1;
          if state.ref_count == 0 { state.connection.take() } else { None }
        };
        if let Some(connection) = connection {
          debug!("share: last subscriber left, disconnecting");
          connection.unsubscribe();
        }
      }))
    })
  }
}
