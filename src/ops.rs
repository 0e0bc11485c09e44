//! Operators: functions turning one [`Observable`](crate::observable::Observable)
//! into another.
//!
//! Every operator here is a plain function returning
//! `impl FnOnce(Observable<..>) -> Observable<..>`, so it can be handed to
//! [`Subscribable::pipe`](crate::observable::Subscribable::pipe) or to the
//! [`pipe!`](crate::pipe) macro. The same operators are reachable as methods on
//! every [`Subscribable`](crate::observable::Subscribable).
//!
//! An operator never shares state between subscriptions: per-subscription
//! state lives in the observer it builds inside its producer.

pub mod catch_error;
pub mod distinct_until_changed;
pub mod filter;
pub mod finalize;
pub mod into_future;
pub mod map;
pub mod share;
pub mod switch_map;
pub mod take;
pub mod tap;

pub use catch_error::catch_error;
pub use distinct_until_changed::{distinct_until_changed, distinct_until_changed_by};
pub use filter::filter;
pub use finalize::finalize;
pub use into_future::{into_future, IntoFutureError, IntoFutureResult, ObservableFuture};
pub use map::{map, try_map};
pub use share::share;
pub use switch_map::switch_map;
pub use take::take;
pub use tap::tap;

/// Left-to-right operator composition.
///
/// `pipe!(source, op1, op2, op3)` is `op3(op2(op1(source)))`, where `source` is
/// anything [`Subscribable`](crate::observable::Subscribable).
///
/// ```rust
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// pipe!(
///   Observable::from_iter([1, 2, 3, 4]),
///   ops::map(|x: i32| x + 1),
///   ops::filter(|x: &i32| x % 2 == 0)
/// )
/// .subscribe(|v| out.push(v));
/// assert_eq!(out, [2, 4]);
/// ```
#[macro_export]
macro_rules! pipe {
  ($source:expr $(, $op:expr)* $(,)?) => {{
    let observable = $crate::observable::Subscribable::as_observable(&$source);
    $(let observable = ($op)(observable);)*
    observable
  }};
}
