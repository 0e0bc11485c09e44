use std::fmt::{Debug, Formatter};

use fancy_regex::Regex;
use tracing::{trace, warn};

use super::{compiler::compile_glob, GlobError};

/// Source that never matches, used for an empty pattern list.
const MATCH_NOTHING: &str = r"\b\B";

/// One or more glob patterns, OR'd together when compiled.
///
/// Built from anything pattern-like:
///
/// ```rust
/// use rxlite::glob::Patterns;
///
/// let single = Patterns::from("*.rs");
/// let many = Patterns::from(["*.rs", "*.toml"]);
/// assert_eq!(single.len(), 1);
/// assert_eq!(many.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patterns(Vec<String>);

impl Patterns {
  #[inline]
  pub fn len(&self) -> usize { self.0.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }
}

impl From<&str> for Patterns {
  fn from(pattern: &str) -> Self { Self(vec![pattern.to_string()]) }
}

impl From<String> for Patterns {
  fn from(pattern: String) -> Self { Self(vec![pattern]) }
}

impl From<&String> for Patterns {
  fn from(pattern: &String) -> Self { Self(vec![pattern.clone()]) }
}

impl<S: AsRef<str>> From<&[S]> for Patterns {
  fn from(patterns: &[S]) -> Self { Self(patterns.iter().map(|p| p.as_ref().to_string()).collect()) }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Patterns {
  fn from(patterns: [S; N]) -> Self { Self(patterns.iter().map(|p| p.as_ref().to_string()).collect()) }
}

impl<S: AsRef<str>> From<Vec<S>> for Patterns {
  fn from(patterns: Vec<S>) -> Self { Self(patterns.iter().map(|p| p.as_ref().to_string()).collect()) }
}

/// A compiled set of glob patterns.
///
/// The matcher is immutable; [`test`](GlobMatcher::test) can be called any
/// number of times.
#[derive(Clone)]
pub struct GlobMatcher {
  regex: Regex,
  patterns: Patterns,
}

impl GlobMatcher {
  pub fn new(patterns: impl Into<Patterns>) -> Result<Self, GlobError> {
    let patterns = patterns.into();
    let generated = combine(&patterns);
    match Regex::new(&generated) {
      Ok(regex) => {
        trace!(patterns = ?patterns.0, generated = %generated, "compiled glob");
        Ok(Self { regex, patterns })
      }
      Err(source) => Err(GlobError::InvalidRegex { pattern: patterns.0.join(", "), generated, source }),
    }
  }

  /// Whether `path` matches any of the patterns.
  ///
  /// A match that exceeds the regex engine's backtrack limit counts as no
  /// match.
  pub fn test(&self, path: &str) -> bool {
    match self.regex.is_match(path) {
      Ok(matched) => matched,
      Err(err) => {
        warn!(path, generated = %self.regex.as_str(), error = %err, "glob match aborted");
        false
      }
    }
  }

  /// The generated regular expression source.
  #[inline]
  pub fn as_str(&self) -> &str { self.regex.as_str() }

  #[inline]
  pub fn patterns(&self) -> &Patterns { &self.patterns }
}

impl Debug for GlobMatcher {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GlobMatcher")
      .field("patterns", &self.patterns.0)
      .field("regex", &self.as_str())
      .finish()
  }
}

fn combine(patterns: &Patterns) -> String {
  match patterns.0.as_slice() {
    [] => MATCH_NOTHING.to_string(),
    [single] => compile_glob(single),
    many => many
      .iter()
      .map(|p| format!("(?:{})", compile_glob(p)))
      .collect::<Vec<_>>()
      .join("|"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxlite_macro::test]
  fn single_pattern_source_is_unwrapped() {
    let matcher = GlobMatcher::new("*.md").unwrap();
    assert_eq!(matcher.as_str(), compile_glob("*.md"));
  }

  #[rxlite_macro::test]
  fn multiple_patterns_are_alternated() {
    let matcher = GlobMatcher::new(vec!["a", "b"]).unwrap();
    assert_eq!(matcher.as_str(), "(?:^a/?$)|(?:^b/?$)");
    assert!(matcher.test("a"));
    assert!(matcher.test("b"));
    assert!(!matcher.test("ab"));
  }

  #[rxlite_macro::test]
  fn empty_pattern_list_matches_nothing() {
    let matcher = GlobMatcher::new(Vec::<String>::new()).unwrap();
    assert!(!matcher.test(""));
    assert!(!matcher.test("a"));
  }

  #[rxlite_macro::test]
  fn patterns_from_various_sources() {
    let owned = String::from("x");
    assert_eq!(Patterns::from(&owned).len(), 1);
    assert_eq!(Patterns::from(owned).len(), 1);
    let slice: &[&str] = &["a", "b", "c"];
    assert_eq!(Patterns::from(slice).iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert!(Patterns::default().is_empty());
  }

  #[rxlite_macro::test]
  fn debug_lists_patterns_and_source() {
    let matcher = GlobMatcher::new("a").unwrap();
    let text = format!("{matcher:?}");
    assert!(text.contains("patterns"));
    assert!(text.contains("^a/?$"));
  }
}
