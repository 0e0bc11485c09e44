use smallvec::SmallVec;

use crate::{subscriber::Subscriber, subscription::DynamicSubscriptions};

/// How a subject ended. Kept so late subscribers can be told.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Terminal<Err> {
  Error(Err),
  Completed,
}

pub(crate) type Targets<'a, Item, Err> = SmallVec<[Subscriber<'a, Item, Err>; 2]>;

/// Subscribers container using DynamicSubscriptions for ID-based management.
///
/// This struct holds the subscribers registered on a Subject, in registration
/// order, plus the terminal state once the subject ended.
///
/// It never delivers anything itself: the subject copies the targets out with
/// [`snapshot`](Subscribers::snapshot) or [`terminate`](Subscribers::terminate)
/// and broadcasts after releasing its borrow, so callbacks are free to
/// subscribe or unsubscribe while a broadcast is running.
pub(crate) struct Subscribers<'a, Item, Err> {
  inner: DynamicSubscriptions<Subscriber<'a, Item, Err>>,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Default for Subscribers<'_, Item, Err> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default(), terminal: None } }
}

impl<'a, Item, Err> Subscribers<'a, Item, Err> {
  /// Add a subscriber and return its unique ID.
  #[inline]
  pub fn add(&mut self, subscriber: Subscriber<'a, Item, Err>) -> usize { self.inner.add(subscriber) }

  /// Remove a subscriber by ID.
  #[inline]
  pub fn remove(&mut self, id: usize) -> Option<Subscriber<'a, Item, Err>> { self.inner.remove(id) }

  #[inline]
  pub fn len(&self) -> usize { self.inner.len() }

  #[inline]
  pub fn terminal(&self) -> Option<&Terminal<Err>> { self.terminal.as_ref() }

  /// The current subscribers, in registration order.
  pub fn snapshot(&self) -> Targets<'a, Item, Err> { self.inner.snapshot() }

  /// Records the terminal state and hands back every subscriber, leaving the
  /// container empty. Returns `None` if the subject had already ended.
  pub fn terminate(&mut self, terminal: Terminal<Err>) -> Option<Targets<'a, Item, Err>> {
    if self.terminal.is_some() {
      return None;
    }
    self.terminal = Some(terminal);
    Some(self.inner.drain().collect())
  }
}

/// Broadcast value to all targets.
///
/// The value is cloned for all targets except the last one, which receives
/// the moved value.
pub(crate) fn broadcast_value<Item: Clone, Err>(targets: Targets<'_, Item, Err>, value: Item) {
  let mut iter = targets.into_iter().peekable();
  while let Some(subscriber) = iter.next() {
    if iter.peek().is_some() {
      subscriber.next(value.clone());
    } else {
      subscriber.next(value);
      break;
    }
  }
}

/// Broadcast error to all targets, cloning for all but the last one.
pub(crate) fn broadcast_error<Item, Err: Clone>(targets: Targets<'_, Item, Err>, err: Err) {
  let mut iter = targets.into_iter().peekable();
  while let Some(subscriber) = iter.next() {
    if iter.peek().is_some() {
      subscriber.error(err.clone());
    } else {
      subscriber.error(err);
      break;
    }
  }
}

pub(crate) fn broadcast_complete<Item, Err>(targets: Targets<'_, Item, Err>) {
  targets.into_iter().for_each(|subscriber| subscriber.complete());
}
