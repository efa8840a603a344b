//! Agenda-driven CKY and Earley deduction.
//!
//! Both strategies share the same loop: pop an active item, derive new items
//! from it, push them, then file the popped item. They differ only in how the
//! agenda is seeded and in whether nonterminals are predicted.

use std::collections::HashSet;
use std::fmt;

use crate::agenda::{Agenda, Discipline};
use crate::forest::{build_chart, build_forest, Chart, Forest};
use crate::grammar::Grammar;
use crate::item::Item;
use crate::symbol::Symbol;
use crate::utils::ItemBudgetExceeded;
use crate::Err;

/// How the agenda is seeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
  /// every rule at every position, no prediction
  Cky,
  /// rules for `start` at position 0, then top-down prediction
  Earley { start: Symbol },
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Cky => write!(f, "cky"),
      Self::Earley { start } => write!(f, "earley({})", start),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
  /// Order in which active items are processed
  pub discipline: Discipline,

  /// Give up once more than this many distinct items have been pushed
  pub max_items: Option<usize>,
}

impl ParserConfig {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn with_discipline(mut self, discipline: Discipline) -> Self {
    self.discipline = discipline;
    self
  }

  #[must_use]
  pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
    self.max_items = max_items;
    self
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
  /// axiom items seeded before the loop started
  pub axioms: usize,
  /// distinct items that entered the agenda, axioms included
  pub pushed: usize,
  /// items popped and processed
  pub processed: usize,
}

/// The finished fixpoint of one parse
#[derive(Debug)]
pub struct Parse {
  agenda: Agenda,
  stats: ParseStats,
  len: usize,
}

impl Parse {
  pub fn stats(&self) -> ParseStats {
    self.stats
  }

  pub fn agenda(&self) -> &Agenda {
    &self.agenda
  }

  pub fn forest(&self) -> Forest {
    build_forest(self.agenda.all_complete())
  }

  pub fn chart(&self) -> Chart {
    build_chart(self.agenda.all_complete(), self.len)
  }

  pub fn into_forest(self) -> Forest {
    build_forest(self.agenda.into_complete())
  }
}

pub struct Parser<'g> {
  grammar: &'g Grammar,
  strategy: Strategy,
  config: ParserConfig,
}

impl<'g> Parser<'g> {
  pub fn new(grammar: &'g Grammar, strategy: Strategy) -> Self {
    Self {
      grammar,
      strategy,
      config: ParserConfig::default(),
    }
  }

  #[must_use]
  pub fn with_config(mut self, config: ParserConfig) -> Self {
    self.config = config;
    self
  }

  /// Runs the agenda to its fixpoint over `input`.
  ///
  /// Fails only if a `max_items` budget is configured and exceeded, in which
  /// case the error is an [`ItemBudgetExceeded`].
  pub fn run(&self, input: &[&str]) -> Result<Parse, Err> {
    let _span =
      tracing::debug_span!("parse", strategy = %self.strategy, len = input.len()).entered();

    let mut agenda = Agenda::with_discipline(self.config.discipline);
    let mut stats = ParseStats::default();

    let axioms = match &self.strategy {
      Strategy::Cky => cky_axioms(self.grammar, input),
      Strategy::Earley { start } => earley_axioms(self.grammar, start),
    };
    stats.axioms = axioms.len();
    tracing::debug!(axioms = stats.axioms, "seeded agenda");
    self.push_all(&mut agenda, axioms)?;

    while !agenda.is_empty() {
      let item = agenda.pop();
      stats.processed += 1;
      tracing::trace!(%item, "processing");

      let derived: Vec<Item> = match item.next_symbol() {
        Some(next) if next.is_terminal() => scan(&item, input).into_iter().collect(),
        _ => {
          let mut derived = match self.strategy {
            Strategy::Cky => Vec::new(),
            Strategy::Earley { .. } => predict(self.grammar, &item),
          };
          derived.extend(complete(&item, &agenda));
          derived
        }
      };
      self.push_all(&mut agenda, derived)?;

      agenda.file(item);
    }

    stats.pushed = agenda.seen_len();
    tracing::debug!(
      pushed = stats.pushed,
      processed = stats.processed,
      "reached fixpoint"
    );

    Ok(Parse {
      agenda,
      stats,
      len: input.len(),
    })
  }

  fn push_all(&self, agenda: &mut Agenda, items: Vec<Item>) -> Result<(), Err> {
    for item in items {
      if !agenda.push(item) {
        continue;
      }
      if let Some(limit) = self.config.max_items {
        if agenda.seen_len() > limit {
          tracing::warn!(limit, "item budget exceeded, abandoning parse");
          return Err(Box::new(ItemBudgetExceeded { limit }));
        }
      }
    }
    Ok(())
  }
}

/// CKY parse of `input`; the forest is empty if there is no derivation
pub fn cky(g: &Grammar, input: &[&str]) -> Forest {
  unbounded(Parser::new(g, Strategy::Cky), input)
}

/// Earley parse of `input` from `start`
pub fn earley(g: &Grammar, input: &[&str], start: &Symbol) -> Forest {
  let strategy = Strategy::Earley {
    start: start.clone(),
  };
  unbounded(Parser::new(g, strategy), input)
}

fn unbounded(parser: Parser<'_>, input: &[&str]) -> Forest {
  match parser.run(input) {
    Ok(parse) => parse.into_forest(),
    Err(e) => unreachable!("parse without an item budget failed: {}", e),
  }
}

/// ```text
/// -------------------- (X -> alpha) in g, 0 <= i < n
/// [X -> * alpha, [i]]
/// ```
///
/// Every rule at every position, reachable or not. Axioms that can't match
/// the input die at their first failed scan.
pub fn cky_axioms(g: &Grammar, input: &[&str]) -> Vec<Item> {
  g.iter()
    .flat_map(|rule| (0..input.len()).map(move |i| Item::new(rule, i)))
    .collect()
}

/// ```text
/// -------------------- (S -> alpha) in g
/// [S -> * alpha, [0]]
/// ```
pub fn earley_axioms(g: &Grammar, start: &Symbol) -> Vec<Item> {
  g.rules_for(start)
    .iter()
    .map(|rule| Item::new(rule, 0))
    .collect()
}

/// ```text
/// [X -> alpha * Y beta, [i ... k]]
/// -------------------------------- (Y -> gamma) in g
///       [Y -> * gamma, [k]]
/// ```
///
/// Nothing is predicted for complete items or items waiting on a terminal.
pub fn predict(g: &Grammar, item: &Item) -> Vec<Item> {
  match item.next_symbol() {
    Some(next) if next.is_nonterminal() => g
      .rules_for(next)
      .iter()
      .map(|rule| Item::new(rule, item.dot()))
      .collect(),
    _ => Vec::new(),
  }
}

/// ```text
/// [X -> alpha * x beta, [i ... j]]
/// ------------------------------------ input[j] == x
/// [X -> alpha x * beta, [i ... j + 1]]
/// ```
pub fn scan(item: &Item, input: &[&str]) -> Option<Item> {
  let needed = item.next_symbol().expect("tried to scan a complete item");
  assert!(needed.is_terminal(), "tried to scan nonterminal {}", needed);

  match input.get(item.dot()) {
    Some(&word) if word == needed.name() => Some(item.advance(item.dot() + 1)),
    _ => None,
  }
}

/// ```text
/// [X -> alpha * Y beta, [i ... k]]   [Y -> gamma *, [k ... j]]
/// ------------------------------------------------------------
///              [X -> alpha Y * beta, [i ... k, j]]
/// ```
///
/// Runs in whichever direction `item` allows, since either premise may be
/// processed first. A complete `item` advances every item already waiting for
/// its lhs at its start; an incomplete one advances over every end position
/// already known for the nonterminal it waits on.
pub fn complete(item: &Item, agenda: &Agenda) -> Vec<Item> {
  match item.next_symbol() {
    None => agenda
      .waiting_items_for(item.lhs(), item.start())
      .map(|waiting| waiting.advance(item.dot()))
      .collect(),
    Some(next) => {
      let ends = agenda
        .complete_items_for(next, item.dot())
        .map(Item::dot)
        .collect::<HashSet<_>>();
      ends.into_iter().map(|end| item.advance(end)).collect()
    }
  }
}
