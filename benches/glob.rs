use std::cell::Cell;

use bencher::{benchmark_group, benchmark_main, black_box, Bencher};
use rxlite::prelude::*;

const PATTERNS: [&str; 4] = ["src/**/*.rs", "!(*.spec).js", "{a,b,c}/[[:alpha:]]*.{1..20}", "**/node_modules/**"];

const PATHS: [&str; 6] = [
  "src/lib.rs",
  "src/glob/compiler.rs",
  "index.spec.js",
  "b/report.12",
  "web/node_modules/pkg/index.js",
  ".hidden/file.rs",
];

fn compile(b: &mut Bencher) {
  b.iter(|| {
    for pattern in PATTERNS {
      black_box(compile_glob(pattern));
    }
  });
}

fn build_matcher(b: &mut Bencher) { b.iter(|| black_box(glob_to_regex(PATTERNS).map(|m| m.as_str().len()))); }

fn test_paths(b: &mut Bencher) {
  let matcher = glob_to_regex(PATTERNS).unwrap();
  b.iter(|| PATHS.iter().filter(|path| matcher.test(path)).count());
}

fn subject_fan_out(b: &mut Bencher) {
  let sum = Cell::new(0u64);
  let subject: Subject<u64> = Subject::new();
  for _ in 0..16 {
    subject.subscribe(|v| sum.set(sum.get() + v));
  }
  b.iter(|| {
    for v in 0..64 {
      subject.next(v);
    }
  });
  black_box(sum.get());
}

benchmark_group!(benches, compile, build_matcher, test_paths, subject_fan_out);
benchmark_main!(benches);
