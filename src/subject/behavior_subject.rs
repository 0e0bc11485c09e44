use std::{
  cell::RefCell,
  convert::Infallible,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use super::Subject;
use crate::{
  observable::{Observable, Subscribable},
  observer::Observer,
};

/// A Subject that remembers its most recent value.
///
/// Every new subscriber synchronously receives the current value (if there
/// is one) before anything else, then the live values. After the subject
/// terminated, new subscribers only get the terminal event.
pub struct BehaviorSubject<'a, Item, Err = Infallible> {
  subject: Subject<'a, Item, Err>,
  value: Rc<RefCell<Option<Item>>>,
}

impl<'a, Item, Err> BehaviorSubject<'a, Item, Err> {
  #[inline]
  pub fn new(value: Item) -> Self { Self { subject: Subject::new(), value: Rc::new(RefCell::new(Some(value))) } }

  /// A behavior subject with no value yet; nothing is replayed until the
  /// first `next`.
  #[inline]
  pub fn empty() -> Self { Self { subject: Subject::new(), value: Rc::new(RefCell::new(None)) } }

  /// The most recently emitted value.
  pub fn value(&self) -> Option<Item>
  where
    Item: Clone,
  {
    self.value.borrow().clone()
  }

  /// Stores `value` as the current value, then fans it out. Subscriptions
  /// made from within the fan-out already see the new value.
  pub fn next(&self, value: Item)
  where
    Item: Clone,
  {
    if self.subject.is_closed() {
      return;
    }
    *self.value.borrow_mut() = Some(value.clone());
    self.subject.next(value);
  }

  pub fn error(&self, err: Err)
  where
    Err: Clone,
  {
    self.subject.error(err)
  }

  pub fn complete(&self) { self.subject.complete() }

  pub fn is_closed(&self) -> bool { self.subject.is_closed() }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }
}

impl<Item, Err> Clone for BehaviorSubject<'_, Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item: Debug, Err> Debug for BehaviorSubject<'_, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BehaviorSubject")
      .field("value", &*self.value.borrow())
      .field("subject", &self.subject)
      .finish()
  }
}

impl<'a, Item, Err> Subscribable<'a> for BehaviorSubject<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: Clone + 'a,
{
  type Item = Item;
  type Err = Err;

  fn as_observable(&self) -> Observable<'a, Item, Err> {
    let this = self.clone();
    Observable::new(move |subscriber| {
      if !this.subject.is_closed() {
        let current = this.value();
        if let Some(current) = current {
          subscriber.next(current);
        }
      }
      this.subject.register(subscriber)
    })
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for BehaviorSubject<'_, Item, Err> {
  #[inline]
  fn on_next(&mut self, value: Item) { BehaviorSubject::next(self, value) }

  #[inline]
  fn on_error(self, err: Err) { BehaviorSubject::error(&self, err) }

  #[inline]
  fn on_complete(self) { BehaviorSubject::complete(&self) }

  #[inline]
  fn is_closed(&self) -> bool { BehaviorSubject::is_closed(self) }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use super::*;

  #[rxlite_macro::test]
  fn replays_current_value_then_live_values() {
    let received = RefCell::new(vec![]);
    let b: BehaviorSubject<i32> = BehaviorSubject::new(1);
    b.next(2);
    b.subscribe(|v| received.borrow_mut().push(v));
    b.next(3);
    assert_eq!(*received.borrow(), [2, 3]);
    assert_eq!(b.value(), Some(3));
  }

  #[rxlite_macro::test]
  fn empty_replays_nothing() {
    let received = RefCell::new(vec![]);
    let b: BehaviorSubject<i32> = BehaviorSubject::empty();
    assert_eq!(b.value(), None);
    b.subscribe(|v| received.borrow_mut().push(v));
    assert!(received.borrow().is_empty());
    b.next(1);
    assert_eq!(*received.borrow(), [1]);
  }

  #[rxlite_macro::test]
  fn reentrant_subscribe_sees_new_value() {
    let seen_by_late = RefCell::new(vec![]);
    let b: BehaviorSubject<i32> = BehaviorSubject::new(0);
    let inner = b.clone();
    let subscribed = Cell::new(false);
    let late = &seen_by_late;
    b.subscribe(move |v| {
      if v == 1 && !subscribed.replace(true) {
        inner.subscribe(move |v| late.borrow_mut().push(v));
      }
    });
    b.next(1);
    assert_eq!(*seen_by_late.borrow(), [1]);
  }

  #[rxlite_macro::test]
  fn terminated_subject_does_not_replay() {
    let values = Cell::new(0);
    let completed = Cell::new(false);
    let b: BehaviorSubject<i32> = BehaviorSubject::new(7);
    b.complete();
    b.next(8);
    b.subscribe_all(|_| values.set(values.get() + 1), |_| {}, || completed.set(true));
    assert_eq!(values.get(), 0);
    assert!(completed.get());
    assert_eq!(b.value(), Some(7));
  }

  #[rxlite_macro::test]
  fn take_one_does_not_register() {
    let got = RefCell::new(vec![]);
    let b: BehaviorSubject<i32> = BehaviorSubject::new(1);
    b.take(1).subscribe(|v| got.borrow_mut().push(v));
    assert_eq!(*got.borrow(), [1]);
    assert_eq!(b.subscriber_count(), 0);
  }
}
