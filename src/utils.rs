use std::error::Error;
use std::fmt;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: regex::Regex = regex::Regex::new($pattern).unwrap();
    }
  };
}

/// Returned when a parse pushes more distinct items than its configured budget
/// allows. No partial forest is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBudgetExceeded {
  pub limit: usize,
}

impl fmt::Display for ItemBudgetExceeded {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "parse exceeded its budget of {} items", self.limit)
  }
}

impl Error for ItemBudgetExceeded {}
