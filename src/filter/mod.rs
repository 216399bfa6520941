// Allergen-safe retrieval engine: synonym expansion, match-expression
// construction, and sampled execution against the corpus.

pub mod executor;
pub mod expand;
pub mod query;

pub use executor::{search, RESULT_LIMIT};
pub use expand::{expand, ExclusionSet};
pub use query::build_expression;
