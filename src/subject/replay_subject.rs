use std::{
  cell::RefCell,
  collections::VecDeque,
  convert::Infallible,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use super::Subject;
use crate::{
  observable::{Observable, Subscribable},
  observer::Observer,
};

/// A Subject that replays up to `capacity` of its latest values to every new
/// subscriber, followed by the terminal event if the subject already ended.
pub struct ReplaySubject<'a, Item, Err = Infallible> {
  subject: Subject<'a, Item, Err>,
  buffer: Rc<RefCell<VecDeque<Item>>>,
  capacity: usize,
}

impl<'a, Item, Err> ReplaySubject<'a, Item, Err> {
  pub fn new(capacity: usize) -> Self {
    Self {
      subject: Subject::new(),
      buffer: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
      capacity,
    }
  }

  /// The values a new subscriber would be replayed, oldest first.
  pub fn buffered(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    self.buffer.borrow().iter().cloned().collect()
  }

  pub fn next(&self, value: Item)
  where
    Item: Clone,
  {
    if self.subject.is_closed() {
      return;
    }
    {
      let mut buffer = self.buffer.borrow_mut();
      if self.capacity > 0 {
        if buffer.len() == self.capacity {
          buffer.pop_front();
        }
        buffer.push_back(value.clone());
      }
    }
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

impl<Item, Err> Clone for ReplaySubject<'_, Item, Err> {
  fn clone(&self) -> Self {
    Self { subject: self.subject.clone(), buffer: self.buffer.clone(), capacity: self.capacity }
  }
}

impl<Item, Err> Debug for ReplaySubject<'_, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ReplaySubject")
      .field("capacity", &self.capacity)
      .field("buffered", &self.buffer.borrow().len())
      .field("subject", &self.subject)
      .finish()
  }
}

impl<'a, Item, Err> Subscribable<'a> for ReplaySubject<'a, Item, Err>
where
  Item: Clone + 'a,
  Err: Clone + 'a,
{
  type Item = Item;
  type Err = Err;

  fn as_observable(&self) -> Observable<'a, Item, Err> {
    let this = self.clone();
    Observable::new(move |subscriber| {
      for value in this.buffered() {
        if subscriber.is_closed() {
          break;
        }
        subscriber.next(value);
      }
      this.subject.register(subscriber)
    })
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for ReplaySubject<'_, Item, Err> {
  #[inline]
  fn on_next(&mut self, value: Item) { ReplaySubject::next(self, value) }

  #[inline]
  fn on_error(self, err: Err) { ReplaySubject::error(&self, err) }

  #[inline]
  fn on_complete(self) { ReplaySubject::complete(&self) }

  #[inline]
  fn is_closed(&self) -> bool { ReplaySubject::is_closed(self) }
}
