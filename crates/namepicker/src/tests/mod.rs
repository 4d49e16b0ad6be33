use axum_test::TestServer;
use libnamepicker::prelude::*;

use crate::api::{AppState, config::Config, router};

mod log_writer;

pub(super) fn state<S: Store>(config: Config, store: S, source: MockedSource, suggester: MockedSuggester) -> AppState<S, MockedSource, MockedSuggester> {
  AppState {
    picker: Picker::new(store).source(source).suggester(suggester).config(config.picker_config()).build(),
    config,
    prometheus: None,
  }
}

pub(super) fn server<S: Store>(state: AppState<S, MockedSource, MockedSuggester>) -> TestServer {
  TestServer::try_new(router(state)).unwrap()
}

pub(super) fn mocked_server(store: MockedStore) -> TestServer {
  server(state(Config::default(), store, MockedSource::default(), MockedSuggester::default()))
}
