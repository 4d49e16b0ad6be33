use std::{
  env::{self, VarError},
  fmt::Display,
  str::FromStr,
  time::Duration,
};

use libnamepicker::prelude::*;

use crate::api::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
  pub env: Env,
  pub listen_addr: String,
  pub api_key: Option<String>,

  // Storage
  pub database_url: String,

  // Upstream services
  pub candidate_source_url: String,
  pub gemini_url: String,
  pub gemini_model: String,
  pub gemini_api_key: Option<String>,
  pub upstream_timeout: Duration,

  // Seeding
  pub seed_candidates: usize,
  pub seed_min_distance: usize,
  pub seed_target: usize,

  pub request_timeout: Duration,
  pub enable_prometheus: bool,
}

impl Default for Config {
  fn default() -> Self {
    let seed = SeedParams::default();

    Config {
      env: Env::Dev,
      listen_addr: "0.0.0.0:8000".into(),
      api_key: None,
      database_url: "sqlite://namepicker.db".into(),
      candidate_source_url: RANDOMUSER_URL.into(),
      gemini_url: GEMINI_URL.into(),
      gemini_model: GEMINI_MODEL.into(),
      gemini_api_key: None,
      upstream_timeout: Duration::from_secs(10),
      seed_candidates: seed.candidates,
      seed_min_distance: seed.min_distance,
      seed_target: seed.target,
      request_timeout: Duration::from_secs(30),
      enable_prometheus: false,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let defaults = Config::default();

    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      listen_addr: env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
      api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
      database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
      candidate_source_url: env::var("CANDIDATE_SOURCE_URL").unwrap_or(defaults.candidate_source_url),
      gemini_url: env::var("GEMINI_URL").unwrap_or(defaults.gemini_url),
      gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
      gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()),
      upstream_timeout: Duration::from_secs(parse_env("UPSTREAM_TIMEOUT_SECS", 10)?),
      seed_candidates: parse_env("SEED_CANDIDATES", defaults.seed_candidates)?,
      seed_min_distance: parse_env("SEED_MIN_DISTANCE", defaults.seed_min_distance)?,
      seed_target: parse_env("SEED_TARGET", defaults.seed_target)?,
      request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30)?),
      enable_prometheus: env::var("ENABLE_PROMETHEUS").unwrap_or_default() == "1",
    };

    if config.upstream_timeout.is_zero() || config.request_timeout.is_zero() {
      return Err(AppError::ConfigError("UPSTREAM_TIMEOUT_SECS and REQUEST_TIMEOUT_SECS must be positive".into()));
    }

    Ok(config)
  }

  pub fn picker_config(&self) -> PickerConfig {
    PickerConfig {
      seed: SeedParams {
        candidates: self.seed_candidates,
        min_distance: self.seed_min_distance,
        target: self.seed_target,
      },
    }
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Env {
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "dev" => Env::Dev,
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

pub fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(default),
    Ok(value) => Ok(value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}")))?),
    Err(err) => match err {
      VarError::NotPresent => Ok(default),
      _ => Err(AppError::ConfigError(format!("could not read {name}: {err}")).into()),
    },
  }
}
