use std::fmt;
use std::sync::Arc;

use crate::rules::Rule;
use crate::symbol::Symbol;

/// A dotted rule.
///
/// `dots` records every input position the dot has been at: `dots[0]` is where
/// the item starts, the last entry is the current dot, and `dots[i]` separates
/// the i-th and (i+1)-th rhs symbols. After passing `k` rhs symbols there are
/// `k + 1` dots, and the item is complete once all of the rhs has been passed.
///
/// Items are values; advancing returns a new item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
  rule: Arc<Rule>,
  dots: Vec<usize>,
}

impl Item {
  /// An item that hasn't passed any rhs symbol yet, starting at `start`
  pub fn new(rule: &Arc<Rule>, start: usize) -> Self {
    Self {
      rule: rule.clone(),
      dots: vec![start],
    }
  }

  pub fn with_dots(rule: &Arc<Rule>, dots: Vec<usize>) -> Self {
    assert!(!dots.is_empty(), "item needs at least one dot");
    assert!(dots.len() <= rule.len() + 1, "more dots than rhs symbols");
    Self {
      rule: rule.clone(),
      dots,
    }
  }

  pub fn rule(&self) -> &Arc<Rule> {
    &self.rule
  }

  pub fn lhs(&self) -> &Symbol {
    self.rule.lhs()
  }

  pub fn dots(&self) -> &[usize] {
    &self.dots
  }

  pub fn start(&self) -> usize {
    self.dots[0]
  }

  pub fn dot(&self) -> usize {
    self.dots[self.dots.len() - 1]
  }

  /// The i-th dot position
  pub fn state(&self, i: usize) -> usize {
    self.dots[i]
  }

  pub fn is_complete(&self) -> bool {
    self.dots.len() == self.rule.len() + 1
  }

  /// The rhs symbol right after the dot, or None if the item is complete
  pub fn next_symbol(&self) -> Option<&Symbol> {
    self.rule.rhs().get(self.dots.len() - 1)
  }

  /// Moves the dot over the next symbol, to `dot`
  pub fn advance(&self, dot: usize) -> Self {
    assert!(!self.is_complete(), "tried to advance complete item {}", self);
    let mut dots = Vec::with_capacity(self.dots.len() + 1);
    dots.extend_from_slice(&self.dots);
    dots.push(dot);
    Self {
      rule: self.rule.clone(),
      dots,
    }
  }
}

impl fmt::Display for Item {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.rule.lhs())?;
    for (idx, s) in self.rule.rhs().iter().enumerate() {
      if idx == self.dots.len() - 1 {
        write!(f, " ・")?;
      }
      write!(f, " {}", s)?;
    }
    if self.is_complete() {
      write!(f, " ・")?;
    }
    write!(f, " ||| {:?}", self.dots)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn s_to_s_a() -> Arc<Rule> {
    Arc::new(Rule::new(
      Symbol::nonterminal("S"),
      vec![Symbol::nonterminal("S"), Symbol::terminal("a")],
      1.0,
    ))
  }

  #[test]
  fn test_advance() {
    let rule = s_to_s_a();
    let item = Item::new(&rule, 2);

    assert_eq!(item.start(), 2);
    assert_eq!(item.dot(), 2);
    assert!(!item.is_complete());
    assert_eq!(item.next_symbol(), Some(&Symbol::nonterminal("S")));

    let item = item.advance(4);
    assert_eq!(item.next_symbol(), Some(&Symbol::terminal("a")));

    let item = item.advance(5);
    assert!(item.is_complete());
    assert_eq!(item.next_symbol(), None);
    assert_eq!(item.dots(), &[2, 4, 5]);
    assert_eq!(item.state(1), 4);
    assert_eq!(item.to_string(), "[S] -> [S] a ・ ||| [2, 4, 5]");
  }

  #[test]
  fn test_identity() {
    let rule = s_to_s_a();
    assert_eq!(Item::new(&rule, 0).advance(1), Item::with_dots(&rule, vec![0, 1]));
    assert_ne!(Item::new(&rule, 0).advance(1), Item::with_dots(&rule, vec![0, 2]));
  }

  #[test]
  #[should_panic(expected = "tried to advance complete item")]
  fn test_advance_complete_panics() {
    let rule = s_to_s_a();
    Item::with_dots(&rule, vec![0, 1, 2]).advance(3);
  }

  #[test]
  #[should_panic(expected = "at least one dot")]
  fn test_empty_dots_panics() {
    Item::with_dots(&s_to_s_a(), Vec::new());
  }
}
