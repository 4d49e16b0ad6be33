use std::time::Duration;

use metrics::histogram;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::instrument;

use crate::{
  error::PickerError,
  model::{Candidate, Gender},
  upstream::{CandidateSource, DEFAULT_UPSTREAM_TIMEOUT, http_client},
};

pub const RANDOMUSER_URL: &str = "https://randomuser.me";

const NATIONALITIES: &str = "us,gb,fr,de,es";

/// Candidate source backed by the randomuser.me API.
#[derive(Clone, Debug)]
pub struct RandomUserSource {
  client: reqwest::Client,
  base_url: String,
}

#[derive(Deserialize)]
struct RandomUserResponse {
  results: Vec<RandomUser>,
}

#[derive(Deserialize)]
struct RandomUser {
  name: RandomUserName,
  #[serde(default)]
  gender: String,
  #[serde(default)]
  nat: String,
}

#[derive(Deserialize)]
struct RandomUserName {
  first: String,
}

impl From<RandomUser> for Candidate {
  fn from(user: RandomUser) -> Self {
    Candidate {
      name: user.name.first,
      gender: Gender::from_source(&user.gender),
      nationality: user.nat,
    }
  }
}

impl RandomUserSource {
  pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<RandomUserSource, PickerError> {
    Ok(RandomUserSource {
      client: http_client(timeout.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT))?,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }
}

impl CandidateSource for RandomUserSource {
  #[instrument(name = "fetch_candidates", skip(self))]
  async fn fetch(&self, count: usize) -> Result<Vec<Candidate>, PickerError> {
    let url = format!("{}/api/?results={count}&nat={NATIONALITIES}&inc=name,gender,nat", self.base_url);
    let then = Instant::now();

    let response = self.client.get(&url).send().await?;

    histogram!("namepicker_upstream_latency_seconds", "upstream" => "candidates").record(then.elapsed().as_secs_f64());

    if !response.status().is_success() {
      return Err(PickerError::UpstreamUnavailable(format!("candidate source returned status {}", response.status())));
    }

    let body: RandomUserResponse = response.json().await?;
    let candidates = body.results.into_iter().map(Candidate::from).collect::<Vec<_>>();

    tracing::debug!(requested = count, received = candidates.len(), "fetched candidates");

    Ok(candidates)
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use serde_json::json;
  use tokio::time::Instant;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::RandomUserSource;
  use crate::{
    error::PickerError,
    model::{Candidate, Gender},
    upstream::CandidateSource,
  };

  #[tokio::test]
  async fn fetch_and_map_genders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/api/"))
      .and(query_param("results", "3"))
      .and(query_param("nat", "us,gb,fr,de,es"))
      .and(query_param("inc", "name,gender,nat"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "results": [
          { "name": { "first": "Louis", "last": "Martin" }, "gender": "male", "nat": "FR" },
          { "name": { "first": "Emma" }, "gender": "female", "nat": "GB" },
          { "name": { "first": "Alex" }, "gender": "nonbinary", "nat": "US" },
        ],
        "info": { "results": 3 }
      })))
      .expect(1)
      .mount(&server)
      .await;

    let source = RandomUserSource::new(&server.uri(), None).unwrap();
    let candidates = source.fetch(3).await.unwrap();

    assert_eq!(
      candidates,
      vec![
        Candidate::new("Louis", Gender::Boy, "FR"),
        Candidate::new("Emma", Gender::Girl, "GB"),
        Candidate::new("Alex", Gender::Neutral, "US"),
      ]
    );
  }

  #[tokio::test]
  async fn upstream_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

    let source = RandomUserSource::new(&server.uri(), None).unwrap();

    assert!(matches!(source.fetch(10).await, Err(PickerError::UpstreamUnavailable(_))));
  }

  #[tokio::test]
  async fn upstream_invalid_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200).set_body_string("<html>")).mount(&server).await;

    let source = RandomUserSource::new(&server.uri(), None).unwrap();

    assert!(matches!(source.fetch(10).await, Err(PickerError::UpstreamUnavailable(_))));
  }

  #[tokio::test]
  async fn upstream_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })).set_delay(Duration::from_secs(5)))
      .mount(&server)
      .await;

    let source = RandomUserSource::new(&server.uri(), Some(Duration::from_millis(100))).unwrap();
    let then = Instant::now();

    assert!(matches!(source.fetch(10).await, Err(PickerError::UpstreamUnavailable(_))));
    assert!(then.elapsed() < Duration::from_secs(5));
  }

  #[tokio::test]
  async fn upstream_unreachable() {
    let source = RandomUserSource::new("http://127.0.0.1:1", None).unwrap();

    assert!(matches!(source.fetch(10).await, Err(PickerError::UpstreamUnavailable(_))));
  }
}
