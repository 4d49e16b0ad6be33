use std::time::Duration;

use metrics::histogram;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;
use tracing::instrument;

use crate::{
  error::PickerError,
  model::Gender,
  upstream::{DEFAULT_UPSTREAM_TIMEOUT, SuggestionKind, Suggester, http_client},
};

pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Suggester calling Google's `generateContent` API.
///
/// Without an API key, every call fails with
/// [`PickerError::UpstreamUnavailable`] so the rest of the service can run
/// without generative features.
#[derive(Clone, Debug)]
pub struct GeminiSuggester {
  client: reqwest::Client,
  base_url: String,
  model: String,
  api_key: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<GenerateContentCandidate>,
}

#[derive(Deserialize)]
struct GenerateContentCandidate {
  content: Option<GenerateContentBody>,
}

#[derive(Deserialize)]
struct GenerateContentBody {
  #[serde(default)]
  parts: Vec<GenerateContentPart>,
}

#[derive(Deserialize)]
struct GenerateContentPart {
  text: Option<String>,
}

impl GeminiSuggester {
  pub fn new(base_url: &str, model: &str, api_key: Option<String>, timeout: Option<Duration>) -> Result<GeminiSuggester, PickerError> {
    Ok(GeminiSuggester {
      client: http_client(timeout.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT))?,
      base_url: base_url.trim_end_matches('/').to_string(),
      model: model.to_string(),
      api_key,
    })
  }
}

impl Suggester for GeminiSuggester {
  #[instrument(name = "generate_suggestions", skip(self))]
  async fn suggest(&self, kind: SuggestionKind, name: &str, gender: Gender) -> Result<Vec<String>, PickerError> {
    let Some(api_key) = &self.api_key else {
      return Err(PickerError::UpstreamUnavailable("generative service is not configured".into()));
    };

    let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
    let payload = json!({
      "contents": [{ "parts": [{ "text": prompt(kind, name, gender) }] }]
    });

    let then = Instant::now();
    let response = self.client.post(&url).header("x-goog-api-key", api_key).json(&payload).send().await?;

    histogram!("namepicker_upstream_latency_seconds", "upstream" => "suggestions").record(then.elapsed().as_secs_f64());

    if !response.status().is_success() {
      return Err(PickerError::UpstreamUnavailable(format!("generative service returned status {}", response.status())));
    }

    let body: GenerateContentResponse = response.json().await?;

    let text = body
      .candidates
      .into_iter()
      .next()
      .and_then(|candidate| candidate.content)
      .and_then(|content| content.parts.into_iter().next())
      .and_then(|part| part.text)
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(PickerError::UpstreamUnavailable("generative service returned no text".into()));
    }

    parse_suggestions(&text)
  }
}

fn prompt(kind: SuggestionKind, name: &str, gender: Gender) -> String {
  let request = match kind {
    SuggestionKind::Alternatives => format!(r#"List 5 creative alternative spellings or close variations for the baby name "{name}" (gender: {gender})."#),
    SuggestionKind::SimilarVibes => format!(r#"List 5 different baby names (gender: {gender}) that share the style, origin or feel of "{name}", without spelling variations of it."#),
  };

  format!(r#"{request} Return ONLY a JSON array of strings. Do not include markdown formatting or explanation. Example output: ["Name1", "Name2", "Name3", "Name4", "Name5"]"#)
}

/// Extract the list of names from the model output.
///
/// Models tend to wrap JSON in Markdown code fences even when asked not to.
pub(crate) fn parse_suggestions(text: &str) -> Result<Vec<String>, PickerError> {
  let clean = text.replace("```json", "").replace("```", "");

  let names: Vec<String> =
    serde_json::from_str(clean.trim()).map_err(|err| PickerError::UpstreamUnavailable(format!("generative service returned unusable data: {err}")))?;

  Ok(names.into_iter().map(|name| name.trim().to_string()).filter(|name| !name.is_empty()).collect())
}
