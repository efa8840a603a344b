use std::fmt;
use std::hash::{Hash, Hasher};

use crate::symbol::Symbol;

/// A weighted production `lhs -> rhs (weight)`.
///
/// Rules are values: two rules are equal only if lhs, rhs *and* weight are
/// equal. Re-weighting a grammar means building a new one.
#[derive(Debug, Clone)]
pub struct Rule {
  lhs: Symbol,
  rhs: Vec<Symbol>,
  weight: f64,
}

impl Rule {
  /// Panics on an empty rhs; epsilon rules aren't supported.
  pub fn new(lhs: Symbol, rhs: Vec<Symbol>, weight: f64) -> Self {
    assert!(!rhs.is_empty(), "rule for {} has an empty right-hand side", lhs);
    Self { lhs, rhs, weight }
  }

  pub fn lhs(&self) -> &Symbol {
    &self.lhs
  }

  pub fn rhs(&self) -> &[Symbol] {
    &self.rhs
  }

  pub fn weight(&self) -> f64 {
    self.weight
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// weights compare bitwise so that Eq and Hash agree
impl PartialEq for Rule {
  fn eq(&self, other: &Self) -> bool {
    self.lhs == other.lhs && self.rhs == other.rhs && self.weight.to_bits() == other.weight.to_bits()
  }
}

impl Eq for Rule {}

impl Hash for Rule {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.lhs.hash(state);
    self.rhs.hash(state);
    self.weight.to_bits().hash(state);
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for s in self.rhs.iter() {
      write!(f, " {}", s)?;
    }
    write!(f, " ({})", self.weight)
  }
}

#[test]
fn test_rule_identity_includes_weight() {
  use std::collections::HashSet;

  let s = Symbol::nonterminal("S");
  let a = Symbol::terminal("a");
  let r1 = Rule::new(s.clone(), vec![a.clone()], 0.5);
  let r2 = Rule::new(s.clone(), vec![a.clone()], 0.5);
  let r3 = Rule::new(s, vec![a], 0.25);

  assert_eq!(r1, r2);
  assert_ne!(r1, r3);

  let set = [r1, r2, r3].into_iter().collect::<HashSet<_>>();
  assert_eq!(set.len(), 2);
}

#[test]
fn test_rule_display() {
  let rule = Rule::new(
    Symbol::nonterminal("S"),
    vec![Symbol::nonterminal("NP"), Symbol::terminal("runs")],
    1.0,
  );
  assert_eq!(rule.to_string(), "[S] -> [NP] runs (1)");
}

#[test]
#[should_panic(expected = "empty right-hand side")]
fn test_epsilon_rule_panics() {
  Rule::new(Symbol::nonterminal("S"), Vec::new(), 1.0);
}
