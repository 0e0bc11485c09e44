use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  convert::Infallible,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{
  observer::{normalize_observer, BoxedObserver, Observer},
  subscription::{Subscription, Teardown},
};

/// The live handle of one observation.
///
/// Every `subscribe` call creates a fresh `Subscriber`, binds the observer to
/// it and hands a clone to the producer. The producer pushes events through
/// [`next`](Subscriber::next), [`error`](Subscriber::error) and
/// [`complete`](Subscriber::complete); the caller keeps another clone to
/// [`unsubscribe`](Subscriber::unsubscribe).
///
/// # Delivery contract
///
/// - Once unsubscribed (which `error` and `complete` do after notifying the
///   observer) every further event is a no-op.
/// - A `next` handler failing with `Err(e)` is turned into `error(e)` on this
///   same subscriber.
/// - `unsubscribe` is idempotent and runs the teardown exactly once.
///
/// # Re-entrancy
///
/// Events pushed into a subscriber from inside one of its own callbacks are
/// queued and delivered in order once the running callback returns.
/// `unsubscribe` from inside a callback takes effect immediately.
pub struct Subscriber<'a, Item, Err = Infallible>(Rc<SubscriberInner<'a, Item, Err>>);

struct SubscriberInner<'a, Item, Err> {
  closed: Cell<bool>,
  delivering: Cell<bool>,
  observer: RefCell<Option<BoxedObserver<'a, Item, Err>>>,
  teardown: RefCell<Teardown<'a>>,
  pending: RefCell<VecDeque<Notification<Item, Err>>>,
}

enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// Clears the `delivering` flag even if a callback unwinds.
struct DeliveryGuard<'s>(&'s Cell<bool>);

impl<'s> DeliveryGuard<'s> {
  fn enter(flag: &'s Cell<bool>) -> Self {
    flag.set(true);
    Self(flag)
  }
}

impl Drop for DeliveryGuard<'_> {
  fn drop(&mut self) { self.0.set(false); }
}

impl<'a, Item, Err> Subscriber<'a, Item, Err> {
  /// Binds `observer` to a new, open subscriber without a teardown.
  pub fn new<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + 'a,
  {
    Self(Rc::new(SubscriberInner {
      closed: Cell::new(false),
      delivering: Cell::new(false),
      observer: RefCell::new(Some(normalize_observer(observer))),
      teardown: RefCell::new(Teardown::none()),
      pending: RefCell::new(VecDeque::new()),
    }))
  }

  #[inline]
  pub fn next(&self, value: Item) { self.emit(Notification::Next(value)); }

  #[inline]
  pub fn error(&self, err: Err) { self.emit(Notification::Error(err)); }

  #[inline]
  pub fn complete(&self) { self.emit(Notification::Complete); }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.closed.get() }

  pub fn unsubscribe(&self) {
    if self.0.closed.replace(true) {
      return;
    }
    let teardown = std::mem::take(&mut *self.0.teardown.borrow_mut());
    teardown.run();
    self.release_observer();
  }

  /// Attaches a teardown. If the subscriber is already closed, e.g. because
  /// the producer completed synchronously, the teardown runs right away.
  pub fn add_teardown(&self, teardown: Teardown<'a>) {
    if self.is_closed() {
      teardown.run();
      return;
    }
    let mut slot = self.0.teardown.borrow_mut();
    let previous = std::mem::take(&mut *slot);
    *slot = previous.and(teardown);
  }

  fn emit(&self, notification: Notification<Item, Err>) {
    if self.is_closed() {
      return;
    }
    if self.0.delivering.get() {
      self.0.pending.borrow_mut().push_back(notification);
      return;
    }

    {
      let _guard = DeliveryGuard::enter(&self.0.delivering);
      let mut current = Some(notification);
      while let Some(notification) = current {
        if self.is_closed() {
          break;
        }
        self.deliver(notification);
        current = self.0.pending.borrow_mut().pop_front();
      }
    }

    if self.is_closed() {
      let dropped = std::mem::take(&mut *self.0.pending.borrow_mut());
      drop(dropped);
      self.release_observer();
    }
  }

  fn deliver(&self, notification: Notification<Item, Err>) {
    match notification {
      Notification::Next(value) => {
        let (result, observer_closed) = {
          let mut observer = self.0.observer.borrow_mut();
          let Some(observer) = observer.as_mut() else { return };
          let result = observer.try_on_next(value);
          (result, observer.is_closed())
        };
        match result {
          Err(err) => self.deliver(Notification::Error(err)),
          Ok(()) if observer_closed => self.unsubscribe(),
          Ok(()) => {}
        }
      }
      Notification::Error(err) => {
        let observer = self.0.observer.borrow_mut().take();
        if let Some(observer) = observer {
          observer.on_error(err);
        }
        self.unsubscribe();
      }
      Notification::Complete => {
        let observer = self.0.observer.borrow_mut().take();
        if let Some(observer) = observer {
          observer.on_complete();
        }
        self.unsubscribe();
      }
    }
  }

  /// Drops the observer unless it is currently running a callback; in that
  /// case the delivery loop releases it once the callback returns.
  fn release_observer(&self) {
    let observer = match self.0.observer.try_borrow_mut() {
      Ok(mut slot) => slot.take(),
      Err(_) => None,
    };
    drop(observer);
  }
}

impl<Item, Err> Clone for Subscriber<'_, Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Debug for Subscriber<'_, Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscriber")
      .field("closed", &self.is_closed())
      .field("teardown", &*self.0.teardown.borrow())
      .finish()
  }
}

impl<Item, Err> Subscription for Subscriber<'_, Item, Err> {
  #[inline]
  fn unsubscribe(&self) { Subscriber::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}

/// A subscriber can itself be the observer of another source; operators use
/// this to forward an inner stream straight into their downstream.
impl<Item, Err> Observer<Item, Err> for Subscriber<'_, Item, Err> {
  #[inline]
  fn on_next(&mut self, value: Item) { Subscriber::next(self, value) }

  #[inline]
  fn on_error(self, err: Err) { Subscriber::error(&self, err) }

  #[inline]
  fn on_complete(self) { Subscriber::complete(&self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}
