mod error;
mod feed;
mod ledger;
mod matching;
mod model;
mod picker;
mod seeder;

pub mod distance;
pub mod store;
pub mod upstream;

pub mod prelude {
  pub use crate::distance::levenshtein;
  pub use crate::error::PickerError;
  pub use crate::ledger::{SubmitStatus, Submission};
  pub use crate::model::{Candidate, Gender, Name, Vote, VoteValue, VotedName};
  pub use crate::picker::{Picker, PickerConfig, VoteOutcome};
  pub use crate::seeder::SeedParams;
  pub use crate::store::{Store, sqlite::SqliteStore};
  pub use crate::upstream::{
    CandidateSource, SuggestionKind, Suggester,
    gemini::{GEMINI_MODEL, GEMINI_URL, GeminiSuggester},
    randomuser::{RANDOMUSER_URL, RandomUserSource},
  };

  pub use crate::store::mock::MockedStore;
  pub use crate::upstream::mock::{MockedSource, MockedSuggester};
}
