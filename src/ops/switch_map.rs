//! SwitchMap operator
//!
//! Transforms each value emitted by the source into an inner Observable, and
//! forwards items from only the most recently created inner Observable. When a
//! new inner Observable is produced, the previous one is unsubscribed.
//!
//! Behavior summary:
//! - Only the latest inner Observable's emissions are forwarded downstream.
//! - The operator completes only after the source completes and the current
//!   inner Observable completes.
//! - Errors from the source or from the current inner Observable are propagated
//!   immediately.

use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::Teardown,
};

pub fn switch_map<'a, Item, U, Err, F>(
  f: F,
) -> impl FnOnce(Observable<'a, Item, Err>) -> Observable<'a, U, Err>
where
  Item: 'a,
  U: 'a,
  Err: 'a,
  F: Fn(Item) -> Observable<'a, U, Err> + 'a,
{
  move |source| {
    let f = Rc::new(f);
    Observable::new(move |downstream: Subscriber<'a, U, Err>| {
      let state = Rc::new(RefCell::new(SwitchMapState::default()));
      let upstream = source.actual_subscribe(Subscriber::new(SwitchMapObserver {
        downstream,
        f: f.clone(),
        state: state.clone(),
      }));
      Teardown::new(move || {
        upstream.unsubscribe();
        let inner = state.borrow_mut().inner.take();
        if let Some(inner) = inner {
          inner.unsubscribe();
        }
      })
    })
  }
}

#[doc(hidden)]
pub struct SwitchMapState<'a, U, Err> {
  inner: Option<Subscriber<'a, U, Err>>,
  /// Bumped for every new inner observable; stale inners compare unequal.
  generation: usize,
  inner_active: bool,
  outer_completed: bool,
}

impl<U, Err> Default for SwitchMapState<'_, U, Err> {
  fn default() -> Self { Self { inner: None, generation: 0, inner_active: false, outer_completed: false } }
}

pub struct SwitchMapObserver<'a, U, Err, F> {
  downstream: Subscriber<'a, U, Err>,
  f: Rc<F>,
  state: Rc<RefCell<SwitchMapState<'a, U, Err>>>,
}

impl<'a, Item, U, Err, F> Observer<Item, Err> for SwitchMapObserver<'a, U, Err, F>
where
  U: 'a,
  Err: 'a,
  F: Fn(Item) -> Observable<'a, U, Err>,
{
  fn on_next(&mut self, value: Item) {
    let (previous, generation) = {
      let mut state = self.state.borrow_mut();
      state.generation += 1;
      state.inner_active = true;
      (state.inner.take(), state.generation)
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }

    let inner = (self.f)(value).actual_subscribe(Subscriber::new(InnerObserver {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      generation,
    }));

    let mut state = self.state.borrow_mut();
    if state.generation == generation && !inner.is_closed() {
      state.inner = Some(inner);
    }
  }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) {
    let inner_active = {
      let mut state = self.state.borrow_mut();
      state.outer_completed = true;
      state.inner_active
    };
    if !inner_active {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

struct InnerObserver<'a, U, Err> {
  downstream: Subscriber<'a, U, Err>,
  state: Rc<RefCell<SwitchMapState<'a, U, Err>>>,
  generation: usize,
}

impl<U, Err> Observer<U, Err> for InnerObserver<'_, U, Err> {
  fn on_next(&mut self, value: U) { self.downstream.next(value) }

  fn on_error(self, err: Err) { self.downstream.error(err) }

  fn on_complete(self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      if state.generation != self.generation {
        return;
      }
      state.inner_active = false;
      state.inner = None;
      state.outer_completed
    };
    if finished {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
