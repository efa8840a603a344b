#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod utils;

pub mod agenda;
pub mod forest;
pub mod grammar;
pub mod inference;
pub mod item;
pub mod parse_grammar;
pub mod rules;
pub mod symbol;

pub use crate::agenda::{Agenda, Discipline};
pub use crate::forest::{build_chart, build_forest, Chart, Forest};
pub use crate::grammar::Grammar;
pub use crate::inference::{cky, earley, Parse, ParseStats, Parser, ParserConfig, Strategy};
pub use crate::item::Item;
pub use crate::rules::Rule;
pub use crate::symbol::{make_symbol, Span, Symbol};
pub use crate::utils::{Err, ItemBudgetExceeded};

impl Grammar {
  pub fn cky(&self, input: &[&str]) -> Forest {
    cky(self, input)
  }

  pub fn earley(&self, input: &[&str], start: &Symbol) -> Forest {
    earley(self, input, start)
  }
}

#[test]
fn test_parallel_parses_share_a_grammar() {
  let g: Grammar = r#"
    [S] ||| [S] [S] ||| 0.5
    [S] ||| a ||| 0.5
  "#
  .parse()
  .unwrap();

  let sizes = std::thread::scope(|scope| {
    let handles = (1..=4)
      .map(|n| {
        let g = &g;
        scope.spawn(move || g.cky(&vec!["a"; n]).len())
      })
      .collect::<Vec<_>>();
    handles
      .into_iter()
      .map(|h| h.join().unwrap())
      .collect::<Vec<_>>()
  });

  // n leaves plus one rule per (span, split point)
  assert_eq!(sizes, vec![1, 3, 7, 14]);
}
