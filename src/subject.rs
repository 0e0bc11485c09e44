//! Multicast sources.
//!
//! A [`Subject`] is both an [`Observer`] and a [`Subscribable`]: everything
//! pushed into it is fanned out synchronously, in registration order, to the
//! subscribers registered at that moment. Once it errors or completes it stays
//! terminal, and late subscribers immediately receive the terminal event.
//!
//! [`BehaviorSubject`] additionally replays its current value to every new
//! subscriber; [`ReplaySubject`] replays a bounded history.

use std::{
  cell::RefCell,
  convert::Infallible,
  fmt::{Debug, Formatter},
  rc::{Rc, Weak},
};

use tracing::debug;

mod behavior_subject;
mod replay_subject;
mod subscribers;

pub use behavior_subject::BehaviorSubject;
pub use replay_subject::ReplaySubject;
use subscribers::{broadcast_complete, broadcast_error, broadcast_value, Subscribers, Terminal};

use crate::{
  observable::{Observable, Subscribable},
  observer::Observer,
  subscriber::Subscriber,
  subscription::Teardown,
};

pub struct Subject<'a, Item, Err = Infallible> {
  subscribers: Rc<RefCell<Subscribers<'a, Item, Err>>>,
}

impl<'a, Item, Err> Subject<'a, Item, Err> {
  pub fn new() -> Self { Self { subscribers: Rc::new(RefCell::new(Subscribers::default())) } }

  /// Number of currently registered subscribers.
  pub fn subscriber_count(&self) -> usize { self.subscribers.borrow().len() }

  /// Whether the subject has errored or completed.
  pub fn is_closed(&self) -> bool { self.subscribers.borrow().terminal().is_some() }

  /// Delivers `value` to every current subscriber.
  pub fn next(&self, value: Item)
  where
    Item: Clone,
  {
    let targets = self.subscribers.borrow().snapshot();
    broadcast_value(targets, value);
  }

  /// Delivers `err` to every current subscriber and ends the subject.
  pub fn error(&self, err: Err)
  where
    Err: Clone,
  {
    let targets = self.subscribers.borrow_mut().terminate(Terminal::Error(err.clone()));
    if let Some(targets) = targets {
      debug!(subscribers = targets.len(), "subject errored");
      broadcast_error(targets, err);
    }
  }

  /// Completes every current subscriber and ends the subject.
  pub fn complete(&self) {
    let targets = self.subscribers.borrow_mut().terminate(Terminal::Completed);
    if let Some(targets) = targets {
      debug!(subscribers = targets.len(), "subject completed");
      broadcast_complete(targets);
    }
  }

  /// Registers `subscriber` and returns the teardown that removes it again.
  ///
  /// A terminated subject delivers its terminal event right away instead, and
  /// an already closed subscriber is not registered at all.
  pub(crate) fn register(&self, subscriber: Subscriber<'a, Item, Err>) -> Teardown<'a>
  where
    Item: 'a,
    Err: Clone + 'a,
  {
    let terminal = self.subscribers.borrow().terminal().cloned();
    match terminal {
      Some(Terminal::Error(err)) => subscriber.error(err),
      Some(Terminal::Completed) => subscriber.complete(),
      None if subscriber.is_closed() => {}
      None => {
        let id = self.subscribers.borrow_mut().add(subscriber);
        let registry: Weak<RefCell<Subscribers<'a, Item, Err>>> = Rc::downgrade(&self.subscribers);
        return Teardown::new(move || {
          if let Some(registry) = registry.upgrade() {
            let removed = registry.borrow_mut().remove(id);
            drop(removed);
          }
        });
      }
    }
    Teardown::none()
  }
}

impl<Item, Err> Default for Subject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Subject<'_, Item, Err> {
  fn clone(&self) -> Self { Self { subscribers: self.subscribers.clone() } }
}

impl<Item, Err> Debug for Subject<'_, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subject")
      .field("subscribers", &self.subscriber_count())
      .field("closed", &self.is_closed())
      .finish()
  }
}

impl<'a, Item, Err> Subscribable<'a> for Subject<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: Clone + 'a,
{
  type Item = Item;
  type Err = Err;

  fn as_observable(&self) -> Observable<'a, Item, Err> {
    let subject = self.clone();
    Observable::new(move |subscriber| subject.register(subscriber))
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for Subject<'_, Item, Err> {
  #[inline]
  fn on_next(&mut self, value: Item) { Subject::next(self, value) }

  #[inline]
  fn on_error(self, err: Err) { Subject::error(&self, err) }

  #[inline]
  fn on_complete(self) { Subject::complete(&self) }

  #[inline]
  fn is_closed(&self) -> bool { Subject::is_closed(self) }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};
  use std::rc::Rc;

  use super::*;
  use crate::subscription::Subscription;

  #[rxlite_macro::test]
  fn fan_out_to_current_subscribers_only() {
    let first = RefCell::new(vec![]);
    let second = RefCell::new(vec![]);
    let late = RefCell::new(vec![]);
    let subject: Subject<i32> = Subject::new();
    subject.subscribe(|v| first.borrow_mut().push(v));
    subject.subscribe(|v| second.borrow_mut().push(v));
    subject.next(5);
    subject.subscribe(|v| late.borrow_mut().push(v));
    subject.next(6);

    assert_eq!(*first.borrow(), [5, 6]);
    assert_eq!(*second.borrow(), [5, 6]);
    assert_eq!(*late.borrow(), [6]);
  }

  #[rxlite_macro::test]
  fn delivery_follows_registration_order() {
    let log = RefCell::new(vec![]);
    let subject: Subject<i32> = Subject::new();
    for name in ["a", "b", "c"] {
      let log = &log;
      subject.subscribe(move |v| log.borrow_mut().push(format!("{name}{v}")));
    }
    subject.next(1);
    assert_eq!(*log.borrow(), ["a1", "b1", "c1"]);
  }

  #[rxlite_macro::test]
  fn unsubscribe_removes_registration() {
    let hits = Cell::new(0);
    let subject: Subject<i32> = Subject::new();
    let subscription = subject.subscribe(|_| hits.set(hits.get() + 1));
    assert_eq!(subject.subscriber_count(), 1);
    subscription.unsubscribe();
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(1);
    assert_eq!(hits.get(), 0);
  }

  #[rxlite_macro::test]
  fn late_subscriber_sees_terminal_event() {
    let completed = Cell::new(0);
    let errors = RefCell::new(vec![]);
    let done: Subject<i32> = Subject::new();
    done.complete();
    done.subscribe_all::<_, _, _, ()>(|_| panic!("no values"), |_| {}, || completed.set(completed.get() + 1));
    assert_eq!(completed.get(), 1);
    assert!(done.is_closed());

    let failed: Subject<i32, String> = Subject::new();
    failed.error("gone".to_string());
    failed.next(1);
    failed.subscribe_all::<_, _, _, ()>(|_| panic!("no values"), |e| errors.borrow_mut().push(e), || {});
    assert_eq!(*errors.borrow(), ["gone"]);
    assert_eq!(failed.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn terminal_event_only_once() {
    let completed = Cell::new(0);
    let subject: Subject<i32> = Subject::new();
    subject.subscribe_all(|_| {}, |_| {}, || completed.set(completed.get() + 1));
    subject.complete();
    subject.complete();
    assert_eq!(completed.get(), 1);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxlite_macro::test]
  fn unsubscribe_during_fan_out() {
    let log = RefCell::new(vec![]);
    let slot: Rc<RefCell<Option<Subscriber<i32>>>> = Rc::new(RefCell::new(None));
    let subject: Subject<i32> = Subject::new();
    let slot_a = slot.clone();
    let log_a = &log;
    subject.subscribe(move |v| {
      log_a.borrow_mut().push(format!("a{v}"));
      if let Some(b) = slot_a.borrow_mut().take() {
        b.unsubscribe();
      }
    });
    let b = subject.subscribe(|v| log.borrow_mut().push(format!("b{v}")));
    *slot.borrow_mut() = Some(b);
    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), ["a1", "a2"]);
  }

  #[rxlite_macro::test]
  fn subscribe_during_fan_out() {
    let log = RefCell::new(vec![]);
    let subject: Subject<i32> = Subject::new();
    let inner = subject.clone();
    let added = Cell::new(false);
    let log_ref = &log;
    subject.subscribe(move |v| {
      log_ref.borrow_mut().push(format!("outer{v}"));
      if !added.replace(true) {
        inner.subscribe(move |v| log_ref.borrow_mut().push(format!("inner{v}")));
      }
    });
    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), ["outer1", "outer2", "inner2"]);
  }

  #[rxlite_macro::test]
  fn subject_as_observer() {
    let got = RefCell::new(vec![]);
    let subject: Subject<i32> = Subject::new();
    subject.subscribe(|v| got.borrow_mut().push(v));
    Observable::from_iter([1, 2, 3]).subscribe_with(subject.clone());
    assert_eq!(*got.borrow(), [1, 2, 3]);
    assert!(subject.is_closed());
  }
}
