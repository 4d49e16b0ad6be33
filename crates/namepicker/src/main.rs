mod api;
mod trace;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;

use anyhow::Context;
use libnamepicker::prelude::*;
use rustls::crypto::aws_lc_rs;
use tokio::signal;

use crate::api::{AppState, config::Config};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  aws_lc_rs::default_provider()
    .install_default()
    .map_err(|_| anyhow::anyhow!("could not install default cryptography provider"))?;

  let config = Config::from_env()?;
  let _guards = trace::init_tracing(&config, std::io::stdout());

  let store = SqliteStore::connect(&config.database_url).await.context("could not open database")?;
  let source = RandomUserSource::new(&config.candidate_source_url, Some(config.upstream_timeout))?;
  let suggester = GeminiSuggester::new(&config.gemini_url, &config.gemini_model, config.gemini_api_key.clone(), Some(config.upstream_timeout))?;

  if config.gemini_api_key.is_none() {
    tracing::warn!("GEMINI_API_KEY is not set, name suggestions are disabled");
  }

  run(config, store, source, suggester).await
}

async fn run<S: Store, C: CandidateSource, G: Suggester>(config: Config, store: S, source: C, suggester: G) -> anyhow::Result<()> {
  let prometheus = match config.enable_prometheus {
    true => Some(trace::build_prometheus()?),
    false => None,
  };

  let state = AppState {
    picker: Picker::new(store).source(source).suggester(suggester).config(config.picker_config()).build(),
    config: config.clone(),
    prometheus,
  };

  let app = api::router(state);
  let listener = tokio::net::TcpListener::bind(&config.listen_addr).await.context("could not create listener")?;

  tracing::info!(namepicker = env!("CARGO_PKG_VERSION"), "listening on {}", listener.local_addr()?.to_string());

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown())
    .await
    .context("could not start app")?;

  Ok(())
}

async fn shutdown() {
  let ctrl_c = async {
    if let Err(err) = signal::ctrl_c().await {
      tracing::error!(error = %err, "failed to install ^C handler");

      std::future::pending::<()>().await;
    }
  };

  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }

      Err(err) => {
        tracing::error!(error = %err, "failed to install terminate signal handler");

        std::future::pending::<()>().await;
      }
    }
  };

  tokio::select! {
      () = ctrl_c => tracing::info!("received ^C, initiating shutdown"),
      () = terminate => tracing::info!("received terminate signal, initiating shutdown"),
  }
}
