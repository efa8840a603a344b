use std::fmt;
use std::str::FromStr;

use crate::Err;

/// A half-open `[start, end)` interval of input positions.
pub type Span = (usize, usize);

/// A grammar symbol.
///
/// Nonterminals are written `[X]` in grammar text, and a nonterminal that has
/// been annotated with the span it covers is written `[X:start-end]`. Anything
/// else is a terminal. Forest nodes are span-annotated nonterminals, so two
/// occurrences of `X` over different spans are different symbols.
///
/// `spans` is a stack: spanning an already-spanned symbol pushes another
/// span, and the last entry is the outermost one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
  Terminal(String),
  Nonterminal { name: String, spans: Vec<Span> },
}

impl Symbol {
  pub fn terminal(word: impl Into<String>) -> Self {
    Self::Terminal(word.into())
  }

  /// A bare nonterminal. Panics if `name` ends in span syntax (`X:0-1`),
  /// since that would print the same as a spanned `X`.
  pub fn nonterminal(name: impl Into<String>) -> Self {
    regex_static!(SPAN_SUFFIX, r":\d+-\d+$");

    let name = name.into();
    assert!(
      !SPAN_SUFFIX.is_match(&name),
      "nonterminal name {:?} ends in span syntax",
      name
    );
    Self::Nonterminal {
      name,
      spans: Vec::new(),
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }

  pub fn is_nonterminal(&self) -> bool {
    matches!(self, Self::Nonterminal { .. })
  }

  /// The word for a terminal, the bare name for a nonterminal
  pub fn name(&self) -> &str {
    match self {
      Self::Terminal(w) => w,
      Self::Nonterminal { name, .. } => name,
    }
  }

  /// The outermost span, if any
  pub fn span(&self) -> Option<Span> {
    match self {
      Self::Terminal(_) => None,
      Self::Nonterminal { spans, .. } => spans.last().copied(),
    }
  }

  /// Annotates a nonterminal with `[start, end)`. Terminals come back unchanged.
  ///
  /// An already-spanned symbol keeps its old spans underneath the new one
  /// (`[X:0-1]` over 2..3 is `[X:0-1:2-3]`).
  pub fn spanned(&self, start: usize, end: usize) -> Self {
    match self {
      Self::Terminal(_) => self.clone(),
      Self::Nonterminal { name, spans } => {
        let mut spans = spans.clone();
        spans.push((start, end));
        Self::Nonterminal {
          name: name.clone(),
          spans,
        }
      }
    }
  }

  /// Strips the outermost span annotation, if any.
  pub fn base(&self) -> Self {
    match self {
      Self::Nonterminal { name, spans } if !spans.is_empty() => Self::Nonterminal {
        name: name.clone(),
        spans: spans[..spans.len() - 1].to_vec(),
      },
      _ => self.clone(),
    }
  }
}

/// Builds the symbol for `base` over `span`. With no span, `base` is returned
/// as-is; terminals are never annotated.
pub fn make_symbol(base: &Symbol, span: Option<Span>) -> Symbol {
  match span {
    Some((start, end)) => base.spanned(start, end),
    None => base.clone(),
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(w) => write!(f, "{}", w),
      Self::Nonterminal { name, spans } => {
        write!(f, "[{}", name)?;
        for (start, end) in spans {
          write!(f, ":{}-{}", start, end)?;
        }
        write!(f, "]")
      }
    }
  }
}

impl FromStr for Symbol {
  type Err = Err;

  /// `[X]` and `[X:i-j]` (possibly with several spans) are nonterminals, any
  /// other non-blank token is a terminal
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    regex_static!(NONTERMINAL, r"^\[(?P<name>.+?)(?P<spans>(?::\d+-\d+)*)\]$");
    regex_static!(SPAN, r":(?P<start>\d+)-(?P<end>\d+)");

    if s.is_empty() || s.chars().any(char::is_whitespace) {
      return Err(format!("symbol: expected a single token, got {:?}", s).into());
    }

    match NONTERMINAL.captures(s) {
      None => Ok(Self::terminal(s)),
      Some(caps) => {
        let name = caps["name"].to_string();
        let spans = SPAN
          .captures_iter(&caps["spans"])
          .map(|span| -> Result<Span, Err> {
            Ok((span["start"].parse::<usize>()?, span["end"].parse::<usize>()?))
          })
          .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Nonterminal { name, spans })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classification() {
    let a: Symbol = "a".parse().unwrap();
    let s: Symbol = "[S]".parse().unwrap();

    assert!(a.is_terminal() && !a.is_nonterminal());
    assert!(s.is_nonterminal() && !s.is_terminal());
    assert_eq!(s, Symbol::nonterminal("S"));
    // an unclosed bracket is just a word
    assert!("[S".parse::<Symbol>().unwrap().is_terminal());
  }

  #[test]
  fn test_make_symbol() {
    let s = Symbol::nonterminal("S");
    let a = Symbol::terminal("a");

    assert_eq!(make_symbol(&s, None), s);
    assert_eq!(make_symbol(&a, Some((0, 1))), a);
    assert_eq!(make_symbol(&s, Some((0, 1))), make_symbol(&s, Some((0, 1))));
    assert_ne!(make_symbol(&s, Some((0, 1))), make_symbol(&s, Some((1, 2))));
    assert_eq!(s.spanned(0, 2).to_string(), "[S:0-2]");
    assert_eq!(s.spanned(0, 2).base(), s);
  }

  #[test]
  fn test_nested_spans_stay_distinct() {
    let x = Symbol::nonterminal("X");
    let once = x.spanned(0, 1).spanned(2, 3);
    let other = x.spanned(1, 2).spanned(2, 3);

    assert_ne!(once, other);
    assert_eq!(once.to_string(), "[X:0-1:2-3]");
    assert_eq!(once.to_string().parse::<Symbol>().unwrap(), once);
    assert_eq!(once.span(), Some((2, 3)));
    assert_eq!(once.base(), x.spanned(0, 1));
  }

  #[test]
  fn test_spanned_composite_is_not_a_renamed_base() {
    let nested = Symbol::nonterminal("X").spanned(0, 1).spanned(2, 3);
    let renamed: Symbol = "[X:0-1]".parse().unwrap();

    // `[X:0-1]` in text is the spanned X, not a nonterminal named "X:0-1"
    assert_eq!(renamed, Symbol::nonterminal("X").spanned(0, 1));
    assert_eq!(renamed.spanned(2, 3), nested);

    let odd = Symbol::nonterminal("a:b-c").spanned(2, 3);
    assert_ne!(odd, nested);
    assert_eq!(odd.to_string().parse::<Symbol>().unwrap(), odd);
  }

  #[test]
  #[should_panic(expected = "ends in span syntax")]
  fn test_nonterminal_name_with_span_suffix_panics() {
    Symbol::nonterminal("X:0-1");
  }

  #[test]
  fn test_parse_spanned() {
    let sym: Symbol = "[NP:3-7]".parse().unwrap();
    assert_eq!(sym.name(), "NP");
    assert_eq!(sym.span(), Some((3, 7)));
    assert!("two words".parse::<Symbol>().is_err());
    assert!("".parse::<Symbol>().is_err());
  }
}
