use std::env;
use std::io;
use std::io::Write;
use std::process;

use chartparse::{Err, Grammar, Parser, ParserConfig, Strategy, Symbol};
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} FILE [options]

Reads a grammar in `[LHS] ||| RHS ||| WEIGHT` format from FILE, then parses
each line of stdin as a space-separated sentence and prints its forest.

Options:
  -h, --help            Print this message
  -c, --chart           Print the chart of complete items (defaults to not printing)
  -s, --start START     Goal nonterminal, `S` or `[S]` (defaults to S)
  -e, --earley          Parse with Earley from the goal (defaults to CKY)
  -m, --max-items N     Give up on a sentence after N distinct items

Set RUST_LOG (e.g. RUST_LOG=chartparse=debug) for parser logging.",
    prog_name
  )
}

fn parse(g: &Grammar, sentence: &str, opts: &Args) -> Result<(), Err> {
  let sentence = sentence.split_whitespace().collect::<Vec<_>>();

  let config = ParserConfig::new().with_max_items(opts.max_items);
  let strategy = if opts.earley {
    Strategy::Earley {
      start: opts.start.clone(),
    }
  } else {
    Strategy::Cky
  };
  let parse = match Parser::new(g, strategy)
    .with_config(config)
    .run(&sentence)
  {
    Ok(parse) => parse,
    Err(e) => {
      // one runaway sentence shouldn't end the session
      println!("{}\n", e);
      return Ok(());
    }
  };

  if opts.print_chart {
    println!("chart:\n{}", parse.chart());
  }

  let stats = parse.stats();
  let forest = parse.into_forest();
  let goal = opts.start.spanned(0, sentence.len());

  println!(
    "{} forest rule{} ({} axioms, {} items){}",
    forest.len(),
    if forest.len() == 1 { "" } else { "s" },
    stats.axioms,
    stats.pushed,
    if forest.can_rewrite(&goal) {
      format!(", goal {} derivable", goal)
    } else {
      String::new()
    }
  );
  print!("{}", forest);
  println!();

  Ok(())
}

struct Args {
  filename: String,
  print_chart: bool,
  start: Symbol,
  earley: bool,
  max_items: Option<usize>,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    if v.is_empty() {
      return Err(Self::make_error_message("bad argument vector", "chartparse"));
    }

    let args_len = v.len();
    let mut iter = v.into_iter();
    let prog_name = iter.next().unwrap();

    if args_len < 2 {
      return Err(Self::make_error_message("not enough arguments", prog_name));
    }

    let mut filename: Option<String> = None;
    let mut print_chart = false; // default to *not* printing the chart
    let mut start = Symbol::nonterminal("S");
    let mut earley = false;
    let mut max_items = None;

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-e" || o == "--earley" {
        earley = true;
      } else if o == "-s" || o == "--start" {
        let Some(name) = iter.next() else {
          return Err(Self::make_error_message("--start needs a symbol", prog_name));
        };
        // accept both `S` and `[S]`
        let bracketed = if name.starts_with('[') {
          name
        } else {
          format!("[{}]", name)
        };
        start = match bracketed.parse::<Symbol>() {
          Ok(sym) if sym.is_nonterminal() => sym,
          _ => return Err(Self::make_error_message("--start needs a nonterminal", prog_name)),
        };
      } else if o == "-m" || o == "--max-items" {
        match iter.next().map(|n| n.parse::<usize>()) {
          Some(Ok(n)) => max_items = Some(n),
          _ => return Err(Self::make_error_message("--max-items needs a number", prog_name)),
        }
      } else if filename.is_none() {
        filename = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    if let Some(filename) = filename {
      Ok(Self {
        filename,
        print_chart,
        start,
        earley,
        max_items,
      })
    } else {
      Err(Self::make_error_message("missing filename", prog_name))
    }
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = Grammar::read_from_file(&opts.filename)?;

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        parse(&g, input.trim(), &opts)?;
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
