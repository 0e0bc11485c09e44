//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: `on_next` (for values), `on_error` (for errors),
//! and `on_complete` (for stream completion). The `on_` prefix keeps them from
//! shadowing the `&self` methods of `Subscriber` and the subjects.

use std::marker::PhantomData;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn on_next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn on_error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn on_complete(self);

  /// Fallible variant of `on_next`.
  ///
  /// A `Subscriber` always delivers values through this method. Returning
  /// `Err` routes the error into the same subscription's error channel, which
  /// then tears the subscription down.
  fn try_on_next(&mut self, value: Item) -> Result<(), Err> {
    self.on_next(value);
    Ok(())
  }

  /// Checks if the observer is closed.
  ///
  /// Sources (like `from_iter`) stop emitting early once their downstream
  /// reports closed, e.g. because a `take` operator reached its count.
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// NextResult - return type of `next` handlers
// ============================================================================

/// Return type accepted from a `next` closure.
///
/// Plain handlers return `()`; handlers that can fail return
/// `Result<(), Err>` and their failures become the subscription's error.
pub trait NextResult<Err> {
  fn into_result(self) -> Result<(), Err>;
}

impl<Err> NextResult<Err> for () {
  #[inline]
  fn into_result(self) -> Result<(), Err> { Ok(()) }
}

impl<Err> NextResult<Err> for Result<(), Err> {
  #[inline]
  fn into_result(self) -> Result<(), Err> { self }
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because methods take `self` by
/// value. DynObserver mirrors the interface but adapts it for vtables.
pub trait DynObserver<Item, Err> {
  fn box_try_next(&mut self, value: Item) -> Result<(), Err>;
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_try_next(&mut self, value: Item) -> Result<(), Err> { self.try_on_next(value) }
  fn box_error(self: Box<Self>, err: Err) { self.on_error(err); }
  fn box_complete(self: Box<Self>) { self.on_complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// The canonical observer record every subscription stores.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserver<'a, Item, Err> {
  fn on_next(&mut self, value: Item) {
    if (**self).box_try_next(value).is_err() {
      tracing::warn!("observer rejected a value but has no subscription to report to");
    }
  }

  #[inline]
  fn on_error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn on_complete(self) { self.box_complete() }

  #[inline]
  fn try_on_next(&mut self, value: Item) -> Result<(), Err> { (**self).box_try_next(value) }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

/// Boxes any observer into the canonical [`BoxedObserver`] record.
pub fn normalize_observer<'a, Item, Err, O>(observer: O) -> BoxedObserver<'a, Item, Err>
where
  O: Observer<Item, Err> + 'a,
{
  Box::new(observer)
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Observer built from a single `next` closure.
///
/// This enables ergonomic subscription syntax: `observable.subscribe(|v|
/// println!("{}", v))`. Completion is ignored; an error reaching this observer
/// is logged and dropped.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item, Err, R> Observer<Item, Err> for FnMutObserver<F>
where
  F: FnMut(Item) -> R,
  R: NextResult<Err>,
{
  #[inline]
  fn on_next(&mut self, value: Item) {
    if (self.0)(value).into_result().is_err() {
      tracing::warn!("next handler failed outside of a subscription; error dropped");
    }
  }

  fn on_error(self, _err: Err) {
    tracing::warn!("unhandled error: observer has no error handler");
  }

  #[inline]
  fn on_complete(self) {}

  #[inline]
  fn try_on_next(&mut self, value: Item) -> Result<(), Err> { (self.0)(value).into_result() }
}

// ============================================================================
// ObserverAll - three-callback record
// ============================================================================

/// Observer built from `next`, `error` and `complete` closures.
pub struct ObserverAll<N, E, C, Err> {
  next: N,
  error: E,
  complete: C,
  _err: PhantomData<fn(Err)>,
}

impl<N, E, C, Err> ObserverAll<N, E, C, Err> {
  pub fn new(next: N, error: E, complete: C) -> Self {
    Self { next, error, complete, _err: PhantomData }
  }
}

impl<N, E, C, Item, Err, R> Observer<Item, Err> for ObserverAll<N, E, C, Err>
where
  N: FnMut(Item) -> R,
  R: NextResult<Err>,
  E: FnOnce(Err),
  C: FnOnce(),
{
  fn on_next(&mut self, value: Item) {
    if (self.next)(value).into_result().is_err() {
      tracing::warn!("next handler failed outside of a subscription; error dropped");
    }
  }

  #[inline]
  fn on_error(self, err: Err) { (self.error)(err) }

  #[inline]
  fn on_complete(self) { (self.complete)() }

  #[inline]
  fn try_on_next(&mut self, value: Item) -> Result<(), Err> { (self.next)(value).into_result() }
}

// ============================================================================
// Tests
// ============================================================================
