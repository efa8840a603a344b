use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::rules::Rule;
use crate::symbol::Symbol;
use crate::Err;

/// A weighted context-free grammar.
///
/// Rules keep their insertion order and are also indexed by lhs. Grammars are
/// append-only while being built and never mutated by the parser, so one
/// grammar can serve any number of parses, including parallel ones.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
  rules: Vec<Arc<Rule>>,
  by_lhs: HashMap<Symbol, Vec<Arc<Rule>>>,
  terminals: HashSet<Symbol>,
  nonterminals: HashSet<Symbol>,
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
  }
}

impl Grammar {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a rule. Adding an equal rule twice keeps both copies.
  pub fn add(&mut self, rule: Rule) {
    let rule = Arc::new(rule);

    self.nonterminals.insert(rule.lhs().clone());
    for s in rule.rhs() {
      if s.is_terminal() {
        self.terminals.insert(s.clone());
      } else {
        self.nonterminals.insert(s.clone());
      }
    }

    self
      .by_lhs
      .entry(rule.lhs().clone())
      .or_default()
      .push(rule.clone());
    self.rules.push(rule);
  }

  /// Rules rewriting `lhs`; empty if there are none
  pub fn rules_for(&self, lhs: &Symbol) -> &[Arc<Rule>] {
    self.by_lhs.get(lhs).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Whether some rule rewrites `lhs`. A symbol may be in `nonterminals()`
  /// without being rewritable, if it only ever appears on a rhs.
  pub fn can_rewrite(&self, lhs: &Symbol) -> bool {
    self.by_lhs.contains_key(lhs)
  }

  pub fn terminals(&self) -> &HashSet<Symbol> {
    &self.terminals
  }

  pub fn nonterminals(&self) -> &HashSet<Symbol> {
    &self.nonterminals
  }

  /// All rules, in insertion order
  pub fn iter(&self) -> std::slice::Iter<'_, Arc<Rule>> {
    self.rules.iter()
  }

  /// Rules grouped by lhs, in no particular order
  pub fn iter_by_lhs(&self) -> impl Iterator<Item = (&Symbol, &[Arc<Rule>])> {
    self.by_lhs.iter().map(|(lhs, rules)| (lhs, rules.as_slice()))
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)
      .map_err(|e| -> Err { format!("{}: {}", path.display(), e).into() })?;
    src.parse()
  }
}

impl Extend<Rule> for Grammar {
  fn extend<I: IntoIterator<Item = Rule>>(&mut self, rules: I) {
    for rule in rules {
      self.add(rule);
    }
  }
}

impl FromIterator<Rule> for Grammar {
  fn from_iter<I: IntoIterator<Item = Rule>>(rules: I) -> Self {
    let mut g = Self::new();
    g.extend(rules);
    g
  }
}

impl<'a> IntoIterator for &'a Grammar {
  type Item = &'a Arc<Rule>;
  type IntoIter = std::slice::Iter<'a, Arc<Rule>>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
  }

  #[test]
  fn test_index_and_vocabularies() {
    let g: Grammar = vec![
      Rule::new(nt("S"), vec![nt("NP"), nt("VP")], 1.0),
      Rule::new(nt("NP"), vec![Symbol::terminal("she")], 1.0),
      Rule::new(nt("S"), vec![nt("Dead")], 0.5),
    ]
    .into_iter()
    .collect();

    assert_eq!(g.len(), 3);
    assert_eq!(g.rules_for(&nt("S")).len(), 2);
    assert!(g.rules_for(&nt("VP")).is_empty());
    assert!(g.rules_for(&nt("Missing")).is_empty());

    // VP and Dead are nonterminals, but nothing rewrites them
    assert!(g.nonterminals().contains(&nt("VP")));
    assert!(!g.can_rewrite(&nt("VP")));
    assert!(!g.can_rewrite(&nt("Dead")));
    assert!(g.can_rewrite(&nt("NP")));

    assert_eq!(g.terminals().len(), 1);
    assert!(g.terminals().contains(&Symbol::terminal("she")));
  }

  #[test]
  fn test_insertion_order_and_duplicates() {
    let r1 = Rule::new(nt("A"), vec![Symbol::terminal("x")], 1.0);
    let r2 = Rule::new(nt("B"), vec![Symbol::terminal("y")], 1.0);

    let mut g = Grammar::new();
    g.add(r1.clone());
    g.add(r2.clone());
    g.add(r1.clone());

    let rules = g.iter().map(|r| r.as_ref().clone()).collect::<Vec<_>>();
    assert_eq!(rules, vec![r1.clone(), r2, r1]);
    assert_eq!(g.rules_for(&nt("A")).len(), 2);
    assert_eq!(g.iter_by_lhs().count(), 2);
  }

  #[test]
  fn test_grammar_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Grammar>();
  }
}
