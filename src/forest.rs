use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::grammar::Grammar;
use crate::item::Item;
use crate::rules::Rule;
use crate::symbol::{make_symbol, Symbol};

/// A derivation forest: a grammar over span-annotated symbols. `[S:0-n]` is
/// the goal node for a sentence of length n.
pub type Forest = Grammar;

/// Turns complete items into a forest.
///
/// Each item `X -> Y1 .. Yk` with dots `[d0 .. dk]` becomes the rule
/// `[X:d0-dk] -> [Y1:d0-d1] .. [Yk:d(k-1)-dk]` with the original weight.
/// Terminals stay bare.
pub fn build_forest<I>(complete_items: impl IntoIterator<Item = I>) -> Forest
where
  I: Borrow<Item>,
{
  let mut forest = Forest::new();
  for item in complete_items {
    let item = item.borrow();
    assert!(item.is_complete(), "forest built from incomplete item {}", item);

    let lhs = make_symbol(item.lhs(), Some((item.start(), item.dot())));
    let rhs = item
      .rule()
      .rhs()
      .iter()
      .enumerate()
      .map(|(i, sym)| make_symbol(sym, Some((item.state(i), item.state(i + 1)))))
      .collect();
    forest.add(Rule::new(lhs, rhs, item.rule().weight()));
  }
  forest
}

/// A complete item's rule and the positions its dot went through
pub type Edge = (Arc<Rule>, Vec<usize>);

/// Complete items laid out by span, for inspection. Rows are start positions
/// `0..n`, columns are end positions `0..=n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart(Vec<Vec<HashMap<Symbol, Vec<Edge>>>>);

impl Chart {
  pub fn new(n: usize) -> Self {
    Self(vec![vec![HashMap::new(); n + 1]; n])
  }

  /// Number of start positions
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Edges spanning `[start, end)`, by lhs
  pub fn get(&self, start: usize, end: usize) -> Option<&HashMap<Symbol, Vec<Edge>>> {
    self.0.get(start).and_then(|row| row.get(end))
  }

  fn add(&mut self, item: &Item) {
    self
      .0
      .get_mut(item.start())
      .and_then(|row| row.get_mut(item.dot()))
      .expect("item span outside the chart")
      .entry(item.lhs().clone())
      .or_default()
      .push((item.rule().clone(), item.dots().to_vec()));
  }
}

pub fn build_chart<I>(complete_items: impl IntoIterator<Item = I>, n: usize) -> Chart
where
  I: Borrow<Item>,
{
  let mut chart = Chart::new(n);
  for item in complete_items {
    chart.add(item.borrow());
  }
  chart
}

impl fmt::Display for Chart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (start, row) in self.0.iter().enumerate() {
      for (end, cell) in row.iter().enumerate() {
        if cell.is_empty() {
          continue;
        }
        writeln!(f, "Span {}..{}:", start, end)?;
        // hash order isn't stable, sort for printing
        let mut symbols = cell.keys().collect::<Vec<_>>();
        symbols.sort();
        for symbol in symbols {
          for (rule, dots) in cell[symbol].iter() {
            writeln!(f, "  {} {:?}", rule, dots)?;
          }
        }
      }
    }
    Ok(())
  }
}
