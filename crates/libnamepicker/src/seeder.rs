use std::collections::HashSet;

use metrics::counter;
use tracing::instrument;

use crate::{
  distance::levenshtein,
  error::PickerError,
  model::{Candidate, Name},
  store::Store,
};

/// Parameters for one seeding run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedParams {
  /// How many raw candidates to request from the source.
  pub candidates: usize,
  /// Candidates strictly closer than this to an existing name are rejected.
  pub min_distance: usize,
  /// Maximum number of names added by the run.
  pub target: usize,
}

impl Default for SeedParams {
  fn default() -> Self {
    SeedParams {
      candidates: 150,
      min_distance: 2,
      target: 50,
    }
  }
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Verdict {
  Accept,
  Blank,
  Duplicate,
  TooSimilar { existing: String, distance: usize },
}

/// Decides which candidates may join the pool.
///
/// Exact duplicates are checked against both the existing pool and what was
/// already admitted, but edit distance is only measured against names that
/// existed before the run: two close candidates from the same batch can both
/// get in.
pub(crate) struct Deduplicator {
  existing: Vec<String>,
  seen: HashSet<String>,
  min_distance: usize,
}

impl Deduplicator {
  pub(crate) fn new(existing: &[Name], min_distance: usize) -> Deduplicator {
    let existing = existing.iter().map(|name| name.name.to_lowercase()).collect::<Vec<_>>();
    let seen = existing.iter().cloned().collect();

    Deduplicator { existing, seen, min_distance }
  }

  pub(crate) fn admit(&mut self, name: &str) -> Verdict {
    if name.trim().is_empty() {
      return Verdict::Blank;
    }

    let folded = name.to_lowercase();

    if self.seen.contains(&folded) {
      return Verdict::Duplicate;
    }

    let closest = self.existing.iter().map(|existing| (existing, levenshtein(&folded, existing))).find(|(_, distance)| *distance < self.min_distance);

    if let Some((existing, distance)) = closest {
      return Verdict::TooSimilar { existing: existing.clone(), distance };
    }

    self.seen.insert(folded);

    Verdict::Accept
  }
}

/// Persist the acceptable `candidates`, in order, until `params.target` names
/// were added.
///
/// Names are inserted one by one: if an insertion fails, the ones before it
/// stay in the pool and the error is returned.
#[instrument(skip_all, fields(candidates = candidates.len(), target = params.target, min_distance = params.min_distance))]
pub async fn seed<S: Store>(store: &S, existing: &[Name], candidates: Vec<Candidate>, params: &SeedParams) -> Result<Vec<Name>, PickerError> {
  let mut dedup = Deduplicator::new(existing, params.min_distance);
  let mut accepted = Vec::with_capacity(params.target.min(candidates.len()));

  for candidate in candidates {
    if accepted.len() >= params.target {
      break;
    }

    match dedup.admit(&candidate.name) {
      Verdict::Accept => {
        let name = Name::builder()
          .name(candidate.name)
          .gender(candidate.gender)
          .maybe_origin((!candidate.nationality.is_empty()).then_some(candidate.nationality))
          .build();

        store.insert_name(&name).await?;

        counter!("namepicker_seeded_names_total").increment(1);

        accepted.push(name);
      }

      verdict => tracing::debug!(name = %candidate.name, ?verdict, "rejected candidate"),
    }
  }

  tracing::info!(added = accepted.len(), "seeded name pool");

  Ok(accepted)
}
