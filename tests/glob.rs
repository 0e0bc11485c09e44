#![cfg(feature = "glob")]

use proptest::prelude::*;
use rxlite::glob::{compile_glob, glob_to_regex};

fn matches(pattern: &str, path: &str) -> bool { glob_to_regex(pattern).unwrap().test(path) }

#[rxlite_macro::test]
fn single_star_does_not_cross_separator() {
  assert!(matches("*.js", "index.js"));
  assert!(!matches("*.js", "index.ts"));
  assert!(!matches("*.js", "dir/index.js"));
}

#[rxlite_macro::test]
fn globstar_matches_zero_or_more_segments() {
  assert!(matches("**/*.js", "a/b/c.js"));
  assert!(matches("**/*.js", "c.js"));
}

#[rxlite_macro::test]
fn leading_dot_is_excluded() {
  assert!(!matches("*.js", ".hidden.js"));
  assert!(!matches("**/*.js", "a/.cache/c.js"));
}

#[rxlite_macro::test]
fn brace_alternation() {
  assert!(matches("{a,b}.txt", "a.txt"));
  assert!(!matches("{a,b}.txt", "c.txt"));
}

#[rxlite_macro::test]
fn pattern_list_is_or() {
  assert!(glob_to_regex(["*.js", "*.ts"]).unwrap().test("x.ts"));
  assert!(glob_to_regex(vec![String::from("*.js"), String::from("*.ts")]).unwrap().test("x.js"));
}

#[rxlite_macro::test]
fn negative_extglob() {
  assert!(matches("!(*.spec).js", "index.js"));
  assert!(!matches("!(*.spec).js", "index.spec.js"));
}

#[rxlite_macro::test]
fn matcher_is_reusable() {
  let matcher = glob_to_regex("src/**/*.{rs,toml}").unwrap();
  let paths = ["src/lib.rs", "src/a/b.toml", "src/a/b.md", "lib.rs", "src/.git/x.rs"];
  let hits: Vec<_> = paths.iter().filter(|p| matcher.test(p)).collect();
  assert_eq!(hits, [&"src/lib.rs", &"src/a/b.toml"]);
  assert_eq!(matcher.as_str(), compile_glob("src/**/*.{rs,toml}"));
}

proptest! {
  #[test]
  fn literal_patterns_match_themselves(path in "[a-zA-Z0-9_-]{1,10}(/[a-zA-Z0-9_-]{1,10}){0,3}") {
    prop_assert!(glob_to_regex(path.as_str()).unwrap().test(&path));
  }

  #[test]
  fn single_star_never_crosses_separator(dir in "[a-z]{1,8}", file in "[a-z]{1,8}") {
    let matcher = glob_to_regex("*.rs").unwrap();
    let flat = format!("{file}.rs");
    let nested = format!("{dir}/{file}.rs");
    prop_assert!(matcher.test(&flat));
    prop_assert!(!matcher.test(&nested));
  }

  #[test]
  fn escaped_metacharacters_are_literal(text in r"[a-z.+()^$|*?\[\]{}]{1,10}") {
    let pattern: String = text.chars().flat_map(|c| ['\\', c]).collect();
    prop_assert!(glob_to_regex(pattern.as_str()).unwrap().test(&text));
  }

  #[test]
  fn generated_source_always_compiles(pattern in r"[a-z*?{},\[\]!@+()|/.:-]{0,16}") {
    prop_assert!(glob_to_regex(pattern.as_str()).is_ok(), "{}", compile_glob(&pattern));
  }
}
