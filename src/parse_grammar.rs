/// Reading of grammar files in the `LHS ||| RHS ||| WEIGHT` line format
use std::str::FromStr;

use crate::grammar::Grammar;
use crate::rules::Rule;
use crate::symbol::Symbol;
use crate::Err;

impl FromStr for Grammar {
  type Err = Err;

  /// Parses a whole grammar, failing on the first malformed line.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rules = read_rules(s).collect::<Result<Vec<_>, _>>()?;

    if rules.is_empty() {
      Err("empty ruleset".into())
    } else {
      Ok(rules.into_iter().collect())
    }
  }
}

/// Lazily reads one rule per line, e.g.
///
/// ```text
/// # comment
/// [S] ||| [S] [S] ||| 0.5
/// [S] ||| a ||| 0.5
/// ```
///
/// Blank lines and lines starting with `#` are skipped. Errors carry the
/// 1-based line number.
pub fn read_rules(s: &str) -> impl Iterator<Item = Result<Rule, Err>> + '_ {
  s.lines().enumerate().filter_map(|(idx, line)| {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      None
    } else {
      Some(parse_rule(line).map_err(|e| -> Err { format!("line {}: {}", idx + 1, e).into() }))
    }
  })
}

/// Parses a single non-blank line into a rule
pub fn parse_rule(line: &str) -> Result<Rule, Err> {
  regex_static!(SEPARATOR, r"\s*\|\|\|\s*");

  let fields = SEPARATOR.split(line.trim()).collect::<Vec<_>>();
  if fields.len() != 3 {
    return Err(format!("expected 3 fields separated by |||, got {}", fields.len()).into());
  }

  let lhs: Symbol = fields[0]
    .parse()
    .map_err(|e| -> Err { format!("rule lhs: {}", e).into() })?;
  if lhs.is_terminal() {
    return Err(format!("rule lhs: expected a [nonterminal], got terminal {}", lhs).into());
  }

  let rhs = fields[1]
    .split_whitespace()
    .map(Symbol::from_str)
    .collect::<Result<Vec<_>, _>>()?;
  if rhs.is_empty() {
    return Err(format!("rule {}: empty right-hand side", lhs).into());
  }

  let weight = fields[2]
    .parse::<f64>()
    .map_err(|e| -> Err { format!("rule weight {:?}: {}", fields[2], e).into() })?;

  Ok(Rule::new(lhs, rhs, weight))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_grammar() {
    let g: Grammar = r#"
      # an ambiguous grammar
      [S] ||| [S] [S] ||| 0.5

      [S] ||| a ||| 0.5
    "#
    .parse()
    .unwrap();

    assert_eq!(g.len(), 2);
    let s = Symbol::nonterminal("S");
    assert_eq!(g.rules_for(&s).len(), 2);
    assert_eq!(
      g.iter().next().unwrap().as_ref(),
      &Rule::new(s.clone(), vec![s.clone(), s], 0.5)
    );
  }

  #[test]
  fn test_malformed_lines() {
    let bad_fields = "[S] ||| a ||| 1.0\n[S] ||| a".parse::<Grammar>();
    let msg = bad_fields.unwrap_err().to_string();
    assert!(msg.starts_with("line 2:"), "{}", msg);
    assert!(msg.contains("3 fields"), "{}", msg);

    assert!(parse_rule("[S] ||| a ||| lots").is_err());
    assert!(parse_rule("S ||| a ||| 1.0").is_err());
    assert!(parse_rule("[S] |||   ||| 1.0").is_err());
    assert!(parse_rule("[S] ||| a ||| 1.0 ||| extra").is_err());
    assert!("# nothing here\n".parse::<Grammar>().is_err());
  }

  #[test]
  fn test_read_rules_is_lazy() {
    // the bad second line isn't reached when only the first rule is taken
    let mut rules = read_rules("[S] ||| a ||| 1\n[S] a 1");
    assert!(rules.next().unwrap().is_ok());
    assert!(rules.next().unwrap().is_err());
    assert!(rules.next().is_none());
  }
}
