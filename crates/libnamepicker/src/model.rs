use std::{fmt::Display, str::FromStr};

use bon::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PickerError;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Boy,
  Girl,
  Neutral,
}

impl Gender {
  /// Map the candidate source vocabulary onto ours.
  ///
  /// Anything that is not explicitly `male` or `female` is considered neutral.
  pub fn from_source(value: &str) -> Gender {
    match value {
      "male" => Gender::Boy,
      "female" => Gender::Girl,
      _ => Gender::Neutral,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Gender::Boy => "boy",
      Gender::Girl => "girl",
      Gender::Neutral => "neutral",
    }
  }
}

impl Display for Gender {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Gender {
  type Err = PickerError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "boy" => Ok(Gender::Boy),
      "girl" => Ok(Gender::Girl),
      "neutral" => Ok(Gender::Neutral),
      other => Err(PickerError::ValidationError(format!("unknown gender: {other}"))),
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
  Like,
  Dislike,
  Maybe,
}

impl VoteValue {
  pub fn as_str(&self) -> &'static str {
    match self {
      VoteValue::Like => "like",
      VoteValue::Dislike => "dislike",
      VoteValue::Maybe => "maybe",
    }
  }
}

impl Display for VoteValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for VoteValue {
  type Err = PickerError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "like" => Ok(VoteValue::Like),
      "dislike" => Ok(VoteValue::Dislike),
      "maybe" => Ok(VoteValue::Maybe),
      // Legacy value from the first vote schema, no longer accepted.
      "superlike" => Err(PickerError::ValidationError("superlike votes are not supported".into())),
      other => Err(PickerError::ValidationError(format!("unknown vote value: {other}"))),
    }
  }
}

/// A candidate baby name in the pool.
#[derive(Builder, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
  #[builder(default = Uuid::new_v4().to_string(), into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  pub gender: Gender,
  #[builder(into)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub origin: Option<String>,
  #[builder(into)]
  pub created_by: Option<String>,
  #[builder(default = Timestamp::now())]
  pub created_at: Timestamp,
}

/// One user's current stance on one name.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
  pub id: String,
  pub user_name: String,
  pub name_id: String,
  pub vote: VoteValue,
  pub created_at: Timestamp,
}

/// A raw name as returned by a [`CandidateSource`](crate::upstream::CandidateSource).
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
  pub name: String,
  pub gender: Gender,
  pub nationality: String,
}

impl Candidate {
  pub fn new(name: &str, gender: Gender, nationality: &str) -> Candidate {
    Candidate {
      name: name.to_string(),
      gender,
      nationality: nationality.to_string(),
    }
  }
}

/// A user's vote joined with the name it refers to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotedName {
  pub name_id: String,
  pub vote: VoteValue,
  pub created_at: Timestamp,
  pub name: String,
  pub gender: Gender,
}
