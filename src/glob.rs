//! Shell glob patterns compiled to regular expressions.
//!
//! [`compile_glob`] translates one pattern into regex source; [`glob_to_regex`]
//! compiles one or more patterns into a [`GlobMatcher`].
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `*` | any run of characters inside one path segment |
//! | `**` | zero or more whole path segments, when it is a segment on its own |
//! | `?` | exactly one character other than `/` |
//! | `[abc]`, `[a-z]`, `[!a]`, `[[:alpha:]]` | character classes |
//! | `{a,b}`, `{a..e}`, `{1..10}` | alternation and ranges |
//! | `@(a\|b)`, `?(..)`, `+(..)`, `*(..)`, `!(..)` | extended groups |
//! | `!pattern` | negates the whole pattern |
//! | `\x`, `"..."` | literal characters |
//!
//! Wildcards at the start of a path segment never match a leading `.`.
//!
//! ```rust
//! use rxlite::glob::glob_to_regex;
//!
//! let matcher = glob_to_regex("src/**/*.rs").unwrap();
//! assert!(matcher.test("src/lib.rs"));
//! assert!(matcher.test("src/glob/compiler.rs"));
//! assert!(!matcher.test("src/.hidden.rs"));
//! ```

mod compiler;
mod matcher;

pub use compiler::compile_glob;
pub use matcher::{GlobMatcher, Patterns};

#[derive(thiserror::Error, Debug)]
pub enum GlobError {
  /// The translated source was rejected by the regex engine.
  #[error("glob `{pattern}` produced an invalid regular expression `{generated}`")]
  InvalidRegex {
    pattern: String,
    generated: String,
    #[source]
    source: fancy_regex::Error,
  },
}

/// Compiles one or more glob patterns into a matcher; a path matches if any
/// pattern matches it.
///
/// # Errors
///
/// [`GlobError::InvalidRegex`] if the generated source does not compile.
#[inline]
pub fn glob_to_regex(patterns: impl Into<Patterns>) -> Result<GlobMatcher, GlobError> {
  GlobMatcher::new(patterns)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matches(pattern: &str, path: &str) -> bool { glob_to_regex(pattern).unwrap().test(path) }

  #[rxlite_macro::test]
  fn single_star_stays_in_segment() {
    assert!(matches("*.js", "index.js"));
    assert!(!matches("*.js", "index.ts"));
    assert!(!matches("*.js", "dir/index.js"));
    assert!(!matches("*", ""));
  }

  #[rxlite_macro::test]
  fn globstar_spans_segments() {
    assert!(matches("**/*.js", "a/b/c.js"));
    assert!(matches("**/*.js", "c.js"));
    assert!(matches("a/**/b", "a/b"));
    assert!(matches("a/**/b", "a/x/y/b"));
    assert!(matches("a/**", "a"));
    assert!(matches("a/**", "a/b/c"));
    assert!(!matches("a/**", "a/.git/config"));
    assert!(matches("**", "any/depth/file"));
  }

  #[rxlite_macro::test]
  fn dot_files_need_explicit_dot() {
    assert!(!matches("*.js", ".hidden.js"));
    assert!(!matches("?abc", ".abc"));
    assert!(matches(".*", ".hidden"));
    assert!(matches("src/.*rc", "src/.eslintrc"));
  }

  #[rxlite_macro::test]
  fn brace_alternation() {
    assert!(matches("{a,b}.txt", "a.txt"));
    assert!(matches("{a,b}.txt", "b.txt"));
    assert!(!matches("{a,b}.txt", "c.txt"));
    assert!(matches("src/{lib,main}.rs", "src/main.rs"));
    assert!(matches("{a,{b,c}}", "c"));
    assert!(matches("{*.js,.eslintrc}", ".eslintrc"));
  }

  #[rxlite_macro::test]
  fn brace_ranges() {
    assert!(matches("file{1..3}.txt", "file2.txt"));
    assert!(!matches("file{1..3}.txt", "file4.txt"));
    assert!(matches("{3..1}", "1"));
    assert!(matches("part-{a..c}", "part-b"));
    assert!(!matches("part-{a..c}", "part-d"));
    assert!(matches("img{01..03}.png", "img02.png"));
    assert!(!matches("img{01..03}.png", "img2.png"));
    assert!(matches("{-9223372036854775808..9223372036854775807}", "-42"));
  }

  #[rxlite_macro::test]
  fn character_classes() {
    assert!(matches("[abc].rs", "b.rs"));
    assert!(!matches("[abc].rs", "d.rs"));
    assert!(matches("[!abc].rs", "d.rs"));
    assert!(!matches("[!abc].rs", "a.rs"));
    assert!(matches("v[[:digit:]]", "v7"));
    assert!(!matches("v[[:digit:]]", "vx"));
    assert!(!matches("a[!x]b", "a/b"));
  }

  #[rxlite_macro::test]
  fn extglob_groups() {
    assert!(matches("@(foo|bar).rs", "bar.rs"));
    assert!(!matches("@(foo|bar).rs", "foobar.rs"));
    assert!(matches("+(ab).txt", "ababab.txt"));
    assert!(matches("x*(ab)y", "xy"));
    assert!(matches("x?(ab)y", "xaby"));
    assert!(!matches("x?(ab)y", "xababy"));
  }

  #[rxlite_macro::test]
  fn negated_extglob() {
    assert!(matches("!(*.spec).js", "index.js"));
    assert!(!matches("!(*.spec).js", "index.spec.js"));
    assert!(matches("src/!(test)/*.rs", "src/glob/a.rs"));
    assert!(!matches("src/!(test)/*.rs", "src/test/a.rs"));
  }

  #[rxlite_macro::test]
  fn whole_pattern_negation() {
    assert!(!matches("!*.js", "index.js"));
    assert!(matches("!*.js", "index.ts"));
    assert!(matches("!!*.js", "index.js"));
  }

  #[rxlite_macro::test]
  fn literal_metacharacters() {
    assert!(matches("a+b.txt", "a+b.txt"));
    assert!(!matches("a+b.txt", "aab.txt"));
    assert!(matches("cost$", "cost$"));
    assert!(matches("(a|b)", "(a|b)"));
    assert!(matches(r"\*", "*"));
    assert!(!matches(r"\*", "x"));
    assert!(matches("\"*\".md", "*.md"));
    assert!(!matches("\"*\".md", "x.md"));
  }

  #[rxlite_macro::test]
  fn current_directory_and_trailing_slash() {
    assert!(matches("./src/*.rs", "src/lib.rs"));
    assert!(matches("./src/*.rs", "./src/lib.rs"));
    assert!(matches("src", "src/"));
  }

  #[rxlite_macro::test]
  fn empty_pattern_matches_all() {
    assert!(matches("", ""));
    assert!(matches("", "any/thing"));
  }

  #[rxlite_macro::test]
  fn array_is_logical_or() {
    let matcher = glob_to_regex(["*.js", "*.ts"]).unwrap();
    assert!(matcher.test("x.ts"));
    assert!(matcher.test("x.js"));
    assert!(!matcher.test("x.rs"));
  }

  #[rxlite_macro::test]
  fn error_message_carries_pattern_and_source() {
    let source = fancy_regex::Regex::new("(").unwrap_err();
    let err = GlobError::InvalidRegex { pattern: "p".into(), generated: "(".into(), source };
    let text = err.to_string();
    assert!(text.contains("`p`"));
    assert!(text.contains("`(`"));
    assert!(std::error::Error::source(&err).is_some());
  }
}
