use smallvec::SmallVec;

/// A container for managing multiple subscriptions with ID-based tracking.
///
/// This struct provides a common abstraction for scenarios that need to:
/// - Store multiple subscriptions/items dynamically, in insertion order
/// - Add new items and get a unique ID
/// - Remove specific items by ID (e.g., when a subscriber unsubscribes)
/// - Drain every item once the owner terminates
///
/// # Design
///
/// - **SmallVec Optimization**: Uses `SmallVec<[_; 2]>` to avoid heap
///   allocation for the common case of 0-2 items.
/// - **Snapshots**: `snapshot()` copies the current items out, so callers can
///   iterate while callbacks add or remove entries.
///
/// # Examples
///
/// ```rust
/// use rxlite::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<()> = DynamicSubscriptions::default();
///
/// let id1 = subs.add(());
/// let _id2 = subs.add(());
/// assert_eq!(subs.len(), 2);
///
/// // Remove by ID
/// assert!(subs.remove(id1).is_some());
/// assert_eq!(subs.len(), 1);
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Create an empty container.
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Add an item and return its unique ID.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  /// Remove an item by ID.
  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  /// Get the number of items.
  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  /// Check if empty.
  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Drain all items.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  /// Iterate over all items.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

impl<U: Clone> DynamicSubscriptions<U> {
  /// Copy of the current items, in insertion order.
  pub fn snapshot(&self) -> SmallVec<[U; 2]> { self.iter().cloned().collect() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxlite_macro::test]
  fn ids_are_unique_and_ordered() {
    let mut subs = DynamicSubscriptions::new();
    let a = subs.add("a");
    let b = subs.add("b");
    let c = subs.add("c");
    assert!(a < b && b < c);
    assert_eq!(subs.remove(b), Some("b"));
    assert!(subs.remove(b).is_none());
    let d = subs.add("d");
    assert_ne!(d, b);
    assert_eq!(subs.snapshot().as_slice(), &["a", "c", "d"]);
  }

  #[rxlite_macro::test]
  fn remove_unknown_id_is_none() {
    let mut subs: DynamicSubscriptions<i32> = DynamicSubscriptions::new();
    assert!(subs.remove(42).is_none());
    assert!(subs.is_empty());
  }

  #[rxlite_macro::test]
  fn drain_empties_in_order() {
    let mut subs = DynamicSubscriptions::new();
    subs.add(1);
    subs.add(2);
    assert_eq!(subs.drain().collect::<Vec<_>>(), [1, 2]);
    assert!(subs.is_empty());
  }
}
