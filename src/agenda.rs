use std::collections::{HashMap, HashSet, VecDeque};

use crate::item::Item;
use crate::symbol::Symbol;

/// Order in which active items leave the agenda. The resulting forest is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discipline {
  /// last in, first out
  #[default]
  Stack,
  /// first in, first out
  Queue,
}

/// Active/passive bookkeeping for the chart fixpoint.
///
/// Every item goes through [`Agenda::push`], which admits it at most once.
/// Once an item has been processed it is filed into one of two passive
/// indices: incomplete items under the `(symbol, position)` they wait for,
/// complete items under `(lhs, start)`.
#[derive(Debug, Default)]
pub struct Agenda {
  discipline: Discipline,
  active: VecDeque<Item>,
  seen: HashSet<Item>,
  waiting: HashMap<(Symbol, usize), HashSet<Item>>,
  complete: HashMap<(Symbol, usize), HashSet<Item>>,
}

impl Agenda {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_discipline(discipline: Discipline) -> Self {
    Self {
      discipline,
      ..Self::default()
    }
  }

  /// Number of active (not yet processed) items
  pub fn len(&self) -> usize {
    self.active.len()
  }

  pub fn is_empty(&self) -> bool {
    self.active.is_empty()
  }

  /// Number of distinct items ever pushed
  pub fn seen_len(&self) -> usize {
    self.seen.len()
  }

  /// Queues `item` unless it has been pushed before. Returns whether it was new.
  pub fn push(&mut self, item: Item) -> bool {
    if self.seen.contains(&item) {
      return false;
    }
    self.seen.insert(item.clone());
    self.active.push_back(item);
    true
  }

  pub fn pop(&mut self) -> Item {
    let item = match self.discipline {
      Discipline::Stack => self.active.pop_back(),
      Discipline::Queue => self.active.pop_front(),
    };
    item.expect("pop from an empty agenda")
  }

  /// Moves a processed item into the passive indices
  pub fn file(&mut self, item: Item) {
    let key = match item.next_symbol() {
      None => (item.lhs().clone(), item.start()),
      Some(next) => (next.clone(), item.dot()),
    };
    let index = if item.is_complete() {
      &mut self.complete
    } else {
      &mut self.waiting
    };
    index.entry(key).or_default().insert(item);
  }

  /// Incomplete items waiting for `symbol` at `position`
  pub fn waiting_items_for<'a>(
    &'a self,
    symbol: &Symbol,
    position: usize,
  ) -> impl Iterator<Item = &'a Item> + use<'a> {
    self
      .waiting
      .get(&(symbol.clone(), position))
      .into_iter()
      .flatten()
  }

  /// Complete items for `lhs` that start at `start`
  pub fn complete_items_for<'a>(
    &'a self,
    lhs: &Symbol,
    start: usize,
  ) -> impl Iterator<Item = &'a Item> + use<'a> {
    self
      .complete
      .get(&(lhs.clone(), start))
      .into_iter()
      .flatten()
  }

  /// Every filed complete item, in no particular order
  pub fn all_complete(&self) -> impl Iterator<Item = &Item> {
    self.complete.values().flatten()
  }

  pub fn into_complete(self) -> impl Iterator<Item = Item> {
    self.complete.into_values().flatten()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rules::Rule;
  use std::sync::Arc;

  fn rule() -> Arc<Rule> {
    Arc::new(Rule::new(
      Symbol::nonterminal("A"),
      vec![Symbol::nonterminal("B"), Symbol::terminal("c")],
      1.0,
    ))
  }

  #[test]
  fn test_push_dedup() {
    let r = rule();
    let mut agenda = Agenda::new();

    assert!(agenda.push(Item::new(&r, 0)));
    assert!(!agenda.push(Item::new(&r, 0)));
    assert!(agenda.push(Item::new(&r, 1)));
    assert_eq!(agenda.len(), 2);

    // popped items stay seen
    agenda.pop();
    agenda.pop();
    assert!(agenda.is_empty());
    assert!(!agenda.push(Item::new(&r, 0)));
    assert_eq!(agenda.seen_len(), 2);
  }

  #[test]
  fn test_disciplines() {
    let r = rule();

    let mut stack = Agenda::with_discipline(Discipline::Stack);
    let mut queue = Agenda::with_discipline(Discipline::Queue);
    for i in 0..3 {
      stack.push(Item::new(&r, i));
      queue.push(Item::new(&r, i));
    }

    assert_eq!(stack.pop().start(), 2);
    assert_eq!(queue.pop().start(), 0);
  }

  #[test]
  #[should_panic(expected = "empty agenda")]
  fn test_pop_empty_panics() {
    Agenda::new().pop();
  }

  #[test]
  fn test_file() {
    let r = rule();
    let b = Symbol::nonterminal("B");
    let a = Symbol::nonterminal("A");
    let mut agenda = Agenda::new();

    agenda.file(Item::new(&r, 0));
    agenda.file(Item::new(&r, 0).advance(2));
    agenda.file(Item::new(&r, 0).advance(2).advance(3));

    assert_eq!(agenda.waiting_items_for(&b, 0).count(), 1);
    assert_eq!(agenda.waiting_items_for(&Symbol::terminal("c"), 2).count(), 1);
    assert_eq!(agenda.waiting_items_for(&b, 1).count(), 0);
    assert_eq!(agenda.complete_items_for(&a, 0).count(), 1);
    assert_eq!(agenda.complete_items_for(&a, 1).count(), 0);
    assert_eq!(agenda.all_complete().count(), 1);
    assert_eq!(agenda.into_complete().next().unwrap().dots(), &[0, 2, 3]);
  }
}
