//! Single pass translation of glob syntax into regular expression source.
//!
//! The scanner walks the pattern once, left to right, with one character of
//! lookahead. The only state carried between characters is the output buffer,
//! a stack of open groups, the quoting flag and whether the scanner sits at
//! the start of a path segment (where dot files must not be matched by
//! wildcards).

/// One path segment that does not start with a dot.
const SEGMENT: &str = r"(?!\.)[^/]+";

/// Source used for the empty pattern.
pub(crate) const MATCH_ALL: &str = r"[\s\S]*";

/// Larger numeric brace ranges fall back to "any integer".
const MAX_NUMERIC_RANGE: u64 = 1024;

/// Translates one glob pattern into anchored regular expression source.
///
/// A leading run of `!` (not starting an extglob `!(...)`) negates the whole
/// pattern; an even number of them cancels out. The empty pattern matches
/// everything.
pub fn compile_glob(pattern: &str) -> String {
  let chars: Vec<char> = pattern.chars().collect();
  let negations = leading_negations(&chars);
  let body = &chars[negations..];

  let source =
    if body.is_empty() { MATCH_ALL.to_string() } else { format!("^{}/?$", translate(body, true)) };
  if negations % 2 == 1 { format!(r"^(?:(?!{source})[\s\S]*)$") } else { source }
}

fn leading_negations(chars: &[char]) -> usize {
  chars
    .iter()
    .enumerate()
    .take_while(|&(i, &c)| c == '!' && !(chars.get(i + 1) == Some(&'(') && find_close(chars, i + 1).is_some()))
    .count()
}

fn translate(chars: &[char], start_of_path: bool) -> String {
  Compiler { chars, pos: 0, out: String::new(), frames: Vec::new(), start_of_path, in_quotes: false }.run()
}

/// An open group waiting for its closing character.
enum Frame {
  /// `{a,b}` alternation.
  Brace { start_of_path: bool },
  /// Extglob group; `suffix` is emitted at the matching `)`.
  Paren { suffix: String, start_of_path: bool },
  /// A literal `{` or `(` whose partner must also stay literal.
  Literal { close: char },
}

impl Frame {
  /// Text that closes the group when the pattern ends while it is still open.
  fn closer(self) -> String {
    match self {
      Frame::Brace { .. } => ")".to_string(),
      Frame::Paren { suffix, .. } => suffix,
      Frame::Literal { .. } => String::new(),
    }
  }
}

struct Compiler<'p> {
  chars: &'p [char],
  pos: usize,
  out: String,
  frames: Vec<Frame>,
  start_of_path: bool,
  in_quotes: bool,
}

impl Compiler<'_> {
  fn run(mut self) -> String {
    while let Some(&c) = self.chars.get(self.pos) {
      self.step(c);
    }
    while let Some(frame) = self.frames.pop() {
      self.out.push_str(&frame.closer());
    }
    self.out
  }

  #[inline]
  fn peek(&self, offset: usize) -> Option<char> { self.chars.get(self.pos + offset).copied() }

  #[inline]
  fn has_close(&self, open: usize) -> bool { find_close(self.chars, open).is_some() }

  fn literal(&mut self, c: char) {
    push_escaped(&mut self.out, c);
    self.pos += 1;
    self.start_of_path = false;
  }

  fn step(&mut self, c: char) {
    if c == '\\' {
      match self.peek(1) {
        Some(next) => {
          push_escaped(&mut self.out, next);
          self.pos += 2;
        }
        None => {
          self.out.push_str(r"\\");
          self.pos += 1;
        }
      }
      self.start_of_path = false;
      return;
    }
    if c == '"' {
      self.in_quotes = !self.in_quotes;
      self.pos += 1;
      return;
    }
    if self.in_quotes {
      if c == '/' {
        self.out.push('/');
        self.pos += 1;
        self.start_of_path = true;
      } else {
        self.literal(c);
      }
      return;
    }

    match c {
      '/' => {
        self.out.push('/');
        self.pos += 1;
        self.start_of_path = true;
      }
      '.' => self.dot(),
      '*' => self.star(),
      '?' | '+' | '@' | '!' if self.peek(1) == Some('(') && self.has_close(self.pos + 1) => self.extglob(c),
      '?' => {
        self.out.push_str(if self.start_of_path { r"(?!\.)[^/]" } else { "[^/]" });
        self.pos += 1;
        self.start_of_path = false;
      }
      '[' => self.bracket(),
      '{' => self.open_brace(),
      '}' => self.close_brace(),
      '(' => self.open_paren(),
      ')' => self.close_paren(),
      ',' => self.comma(),
      '|' => self.pipe(),
      _ => self.literal(c),
    }
  }

  fn dot(&mut self) {
    if self.start_of_path && self.peek(1) == Some('/') {
      // explicit current directory segment: `./a` also matches `a`
      self.out.push_str(r"(?:\./)?");
      self.pos += 2;
    } else {
      self.literal('.');
    }
  }

  fn star(&mut self) {
    let run = self.chars[self.pos..].iter().take_while(|&&c| c == '*').count();
    if run == 1 && self.peek(1) == Some('(') && self.has_close(self.pos + 1) {
      return self.extglob('*');
    }

    let after = self.peek(run);
    let at_boundary = matches!(after, None | Some('/'));
    if run >= 2 && self.start_of_path && at_boundary {
      self.globstar(run, after.is_some());
      return;
    }

    let fragment = match (self.start_of_path, at_boundary) {
      (true, true) => r"(?!\.)[^/]+",
      (true, false) => r"(?!\.)[^/]*",
      (false, _) => "[^/]*",
    };
    self.out.push_str(fragment);
    self.pos += run;
    self.start_of_path = false;
  }

  /// `**` standing alone as a path segment: zero or more whole segments.
  fn globstar(&mut self, run: usize, followed_by_slash: bool) {
    if followed_by_slash {
      self.out.push_str(&format!("(?:{SEGMENT}/)*"));
      self.pos += run + 1;
      self.start_of_path = true;
      return;
    }
    if self.out.ends_with('/') {
      // `a/**` also matches `a` itself
      self.out.pop();
      self.out.push_str(&format!("(?:/{SEGMENT})*"));
    } else {
      self.out.push_str(&format!("(?:{SEGMENT}(?:/{SEGMENT})*)?"));
    }
    self.pos += run;
    self.start_of_path = false;
  }

  fn extglob(&mut self, kind: char) {
    let open = self.pos + 1;
    let Some(close) = find_close(self.chars, open) else {
      return self.literal(kind);
    };
    let start_of_path = self.start_of_path;
    let suffix = match kind {
      '?' => ")?".to_string(),
      '+' => ")+".to_string(),
      '*' => ")*".to_string(),
      '!' => {
        let rest = self.rest_of_segment(close + 1);
        let guard = if start_of_path { r"(?!\.)" } else { "" };
        format!(r"){rest}(?:/|$)){guard}[^/]*?)")
      }
      _ => ")".to_string(),
    };
    self.out.push_str(if kind == '!' { "(?:(?!(?:" } else { "(?:" });
    self.frames.push(Frame::Paren { suffix, start_of_path });
    self.pos += 2;
  }

  /// Compiles what follows a `!(...)` group up to the end of its path
  /// segment, so the negative lookahead can reject the full segment.
  fn rest_of_segment(&self, from: usize) -> String {
    let in_brace = self.frames.iter().any(|f| matches!(f, Frame::Brace { .. }));
    let in_paren = self.frames.iter().any(|f| matches!(f, Frame::Paren { .. }));
    let mut depth = 0usize;
    let mut end = from;
    while let Some(&c) = self.chars.get(end) {
      match c {
        '\\' => {
          end += 2;
          continue;
        }
        '(' | '{' => depth += 1,
        ')' | '}' if depth > 0 => depth -= 1,
        '/' if depth == 0 => break,
        ')' | '|' if in_paren && depth == 0 => break,
        '}' | ',' if in_brace && depth == 0 => break,
        _ => {}
      }
      end += 1;
    }
    let end = end.min(self.chars.len());
    translate(&self.chars[from..end], false)
  }

  fn bracket(&mut self) {
    let Some((negated, body_start, close)) = find_bracket(self.chars, self.pos) else {
      return self.literal('[');
    };
    let body = &self.chars[body_start..close];
    if body.contains(&'/') {
      // a class never spans a path separator; keep the bracket literal
      return self.literal('[');
    }

    let mut class = String::from(if negated { "[^/" } else { "[" });
    let mut k = 0;
    while k < body.len() {
      let c = body[k];
      if c == '[' && body.get(k + 1) == Some(&':') {
        if let Some(end) = posix_end(body, k + 2) {
          let name: String = body[k + 2..end].iter().collect();
          if let Some(set) = posix_class(&name) {
            class.push_str(set);
            k = end + 2;
            continue;
          }
        }
      }
      let (low, width) = class_atom(body, k);
      k += width;
      if body.get(k) == Some(&'-') && k + 1 < body.len() {
        let (high, width) = class_atom(body, k + 1);
        k += 1 + width;
        // reversed ranges are rejected by the regex engine
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        push_class_escaped(&mut class, low);
        class.push('-');
        push_class_escaped(&mut class, high);
      } else {
        push_class_escaped(&mut class, low);
      }
    }
    class.push(']');

    self.out.push_str(&class);
    self.pos = close + 1;
    self.start_of_path = false;
  }

  fn open_brace(&mut self) {
    let Some(close) = find_close(self.chars, self.pos) else {
      return self.literal('{');
    };
    let body = &self.chars[self.pos + 1..close];
    if let Some(range) = brace_range(body) {
      self.out.push_str(&range);
      self.pos = close + 1;
      self.start_of_path = false;
    } else if has_top_level_comma(body) {
      self.out.push_str("(?:");
      self.frames.push(Frame::Brace { start_of_path: self.start_of_path });
      self.pos += 1;
    } else {
      self.frames.push(Frame::Literal { close: '}' });
      self.literal('{');
    }
  }

  fn close_brace(&mut self) {
    match self.frames.last() {
      Some(Frame::Brace { .. }) => {
        self.frames.pop();
        self.out.push(')');
        self.pos += 1;
        let repeat = self.peek(0) == Some('+') && !(self.peek(1) == Some('(') && self.has_close(self.pos + 1));
        if repeat {
          self.out.push('+');
          self.pos += 1;
        }
        self.start_of_path = false;
      }
      Some(Frame::Literal { close: '}' }) => {
        self.frames.pop();
        self.literal('}');
      }
      _ => self.literal('}'),
    }
  }

  fn open_paren(&mut self) {
    if self.has_close(self.pos) {
      self.frames.push(Frame::Literal { close: ')' });
    }
    self.literal('(');
  }

  fn close_paren(&mut self) {
    match self.frames.last() {
      Some(Frame::Paren { .. }) => {
        if let Some(frame) = self.frames.pop() {
          self.out.push_str(&frame.closer());
        }
        self.pos += 1;
        self.start_of_path = false;
      }
      Some(Frame::Literal { close: ')' }) => {
        self.frames.pop();
        self.literal(')');
      }
      _ => self.literal(')'),
    }
  }

  fn comma(&mut self) {
    if let Some(Frame::Brace { start_of_path }) = self.frames.last() {
      self.start_of_path = *start_of_path;
      self.out.push('|');
      self.pos += 1;
    } else {
      self.literal(',');
    }
  }

  fn pipe(&mut self) {
    if let Some(Frame::Paren { start_of_path, .. }) = self.frames.last() {
      self.start_of_path = *start_of_path;
      self.out.push('|');
      self.pos += 1;
    } else {
      self.literal('|');
    }
  }
}

// ============================================================================
// Scanning helpers
// ============================================================================

/// Index of the `)` or `}` matching the opener at `open`, honouring nesting
/// and backslash escapes.
fn find_close(chars: &[char], open: usize) -> Option<usize> {
  let (opener, closer) = match chars.get(open)? {
    '(' => ('(', ')'),
    '{' => ('{', '}'),
    _ => return None,
  };
  let mut depth = 0usize;
  let mut i = open;
  while let Some(&c) = chars.get(i) {
    if c == '\\' {
      i += 2;
      continue;
    }
    if c == opener {
      depth += 1;
    } else if c == closer {
      depth -= 1;
      if depth == 0 {
        return Some(i);
      }
    }
    i += 1;
  }
  None
}

/// Locates the closing `]` of a bracket expression starting at `open`.
///
/// Returns whether the class is negated, where its body starts and the index
/// of the closing bracket. A `]` right after the opening (and negation) is
/// part of the body.
fn find_bracket(chars: &[char], open: usize) -> Option<(bool, usize, usize)> {
  let mut i = open + 1;
  let negated = matches!(chars.get(i), Some('!' | '^'));
  if negated {
    i += 1;
  }
  let body_start = i;
  if chars.get(i) == Some(&']') {
    i += 1;
  }
  loop {
    match chars.get(i)? {
      ']' => return Some((negated, body_start, i)),
      '\\' => i += 2,
      '[' if chars.get(i + 1) == Some(&':') => match posix_end(chars, i + 2) {
        Some(end) => i = end + 2,
        None => i += 1,
      },
      _ => i += 1,
    }
  }
}

/// One possibly escaped character of a class body and how many characters it
/// spans.
fn class_atom(body: &[char], at: usize) -> (char, usize) {
  match (body[at], body.get(at + 1)) {
    ('\\', Some(&next)) => (next, 2),
    (c, _) => (c, 1),
  }
}

/// Index of the `:` of the `:]` that ends a POSIX class name.
fn posix_end(chars: &[char], from: usize) -> Option<usize> {
  (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == ':' && chars[i + 1] == ']')
}

fn posix_class(name: &str) -> Option<&'static str> {
  let set = match name {
    "alnum" => "a-zA-Z0-9",
    "alpha" => "a-zA-Z",
    "ascii" => r"\x00-\x7F",
    "blank" => r" \t",
    "cntrl" => r"\x00-\x1F\x7F",
    "digit" => "0-9",
    "graph" => r"\x21-\x7E",
    "lower" => "a-z",
    "print" => r"\x20-\x7E",
    "punct" => r"!-/:-@\[-`{-\~",
    "space" => r" \t\r\n\v\f",
    "upper" => "A-Z",
    "word" => "A-Za-z0-9_",
    "xdigit" => "A-Fa-f0-9",
    _ => return None,
  };
  Some(set)
}

fn has_top_level_comma(body: &[char]) -> bool {
  let mut depth = 0usize;
  let mut i = 0;
  while let Some(&c) = body.get(i) {
    match c {
      '\\' => i += 1,
      '{' => depth += 1,
      '}' => depth = depth.saturating_sub(1),
      ',' if depth == 0 => return true,
      _ => {}
    }
    i += 1;
  }
  false
}

/// `{a..e}` becomes `[a-e]`, `{1..3}` becomes `(?:1|2|3)`, `{01..03}` becomes
/// `(?:01|02|03)`.
fn brace_range(body: &[char]) -> Option<String> {
  let text: String = body.iter().collect();
  let (low, high) = text.split_once("..")?;

  if let (Ok(a), Ok(b)) = (low.parse::<i64>(), high.parse::<i64>()) {
    let (a, b) = (a.min(b), a.max(b));
    if a.abs_diff(b) > MAX_NUMERIC_RANGE {
      return Some("-?[0-9]+".to_string());
    }
    let padded = is_zero_padded(low) || is_zero_padded(high);
    let width = if padded { digits(low).len().max(digits(high).len()) } else { 0 };
    let alternatives: Vec<String> = (a..=b).map(|n| pad_number(n, width)).collect();
    return Some(format!("(?:{})", alternatives.join("|")));
  }

  let mut low = low.chars();
  let mut high = high.chars();
  match (low.next(), low.next(), high.next(), high.next()) {
    (Some(x), None, Some(y), None) => {
      let (x, y) = if x <= y { (x, y) } else { (y, x) };
      let mut class = String::from("[");
      push_class_escaped(&mut class, x);
      class.push('-');
      push_class_escaped(&mut class, y);
      class.push(']');
      Some(class)
    }
    _ => None,
  }
}

fn digits(operand: &str) -> &str { operand.trim_start_matches(['-', '+']) }

/// `007` is padded, `0` and `7` are not.
fn is_zero_padded(operand: &str) -> bool {
  let digits = digits(operand);
  digits.len() > 1 && digits.starts_with('0')
}

fn pad_number(n: i64, width: usize) -> String {
  let sign = if n < 0 { "-" } else { "" };
  format!("{sign}{:0width$}", n.unsigned_abs())
}

fn push_escaped(out: &mut String, c: char) {
  if matches!(c, '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$') {
    out.push('\\');
  }
  out.push(c);
}

fn push_class_escaped(out: &mut String, c: char) {
  if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
    out.push('\\');
  }
  out.push(c);
}
