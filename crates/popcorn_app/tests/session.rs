use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use popcorn_app::effects::{engine_event_to_msg, EffectRunner};
use popcorn_app::input::Command;
use popcorn_app::persistence::load_watched;
use popcorn_app::{Resolved, Session};
use popcorn_core::{DetailResult, Msg, NOT_FOUND_MESSAGE};
use popcorn_engine::{
    CancellationToken, EngineEvent, EngineHandle, FailureKind, FetchError, KeyValueStore,
    MovieDetails, MovieHit, MovieSource, SearchPayload,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// In-memory movie database. "slow" searches only finish when cancelled.
struct FakeOmdb;

#[async_trait::async_trait]
impl MovieSource for FakeOmdb {
    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchPayload, FetchError> {
        match query {
            "slow" => {
                cancel.cancelled().await;
                Err(FetchError {
                    kind: FailureKind::Cancelled,
                    message: "request cancelled".to_string(),
                })
            }
            "offline" => Err(FetchError {
                kind: FailureKind::Network,
                message: "error sending request".to_string(),
            }),
            "incep" => Ok(SearchPayload::Matches(vec![MovieHit {
                imdb_id: "tt1375666".to_string(),
                title: "Inception".to_string(),
                year: "2010".to_string(),
                poster: "N/A".to_string(),
            }])),
            _ => Ok(SearchPayload::NoMatch {
                message: "Movie not found!".to_string(),
            }),
        }
    }

    async fn details(
        &self,
        imdb_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<MovieDetails, FetchError> {
        Ok(MovieDetails {
            imdb_id: imdb_id.to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            runtime: "148 min".to_string(),
            imdb_rating: "8.8".to_string(),
            ..MovieDetails::default()
        })
    }
}

struct Harness {
    session: Session,
    events: Receiver<EngineEvent>,
    store: KeyValueStore,
    _temp: TempDir,
}

impl Harness {
    fn new() -> Self {
        popcorn_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let store = KeyValueStore::new(temp.path().join("popcorn.json"));
        let (engine, events) = EngineHandle::spawn(Arc::new(FakeOmdb));
        Self {
            session: Session::new(EffectRunner::new(engine, store.clone())),
            events,
            store,
            _temp: temp,
        }
    }

    fn type_line(&mut self, command: Command) {
        match self.session.resolve(command) {
            Resolved::Msg(msg) => {
                self.session.dispatch(msg);
            }
            other => panic!("expected a message, got {other:?}"),
        }
    }

    /// Feeds the next engine event back into the session.
    fn settle_next(&mut self) {
        let event = self
            .events
            .recv_timeout(Duration::from_secs(2))
            .expect("engine event");
        self.session.dispatch(engine_event_to_msg(event));
    }
}

#[test]
fn search_open_rate_and_add() {
    let mut h = Harness::new();
    h.type_line(Command::Query("incep".to_string()));
    assert!(h.session.view().is_loading);
    h.settle_next();
    assert_eq!(h.session.view().movies[0].title, "Inception");

    h.type_line(Command::Open(1));
    h.settle_next();
    let details = h.session.view().details.expect("details open");
    assert!(matches!(details.details, DetailResult::Loaded(_)));

    h.type_line(Command::Rate(9));
    h.type_line(Command::Add);
    let view = h.session.view();
    assert!(view.details.is_none());
    assert_eq!(view.watched.len(), 1);
    assert_eq!(view.summary.avg_runtime, 148.0);

    let stored = load_watched(&h.store);
    assert_eq!(stored, view.watched);
    assert_eq!(stored[0].user_rating, 9);
}

#[test]
fn superseded_search_is_dropped() {
    let mut h = Harness::new();
    h.type_line(Command::Query("slow".to_string()));
    h.type_line(Command::Query("zzzznomatch".to_string()));
    h.settle_next();

    assert_eq!(
        h.session.view().error.as_deref(),
        Some(NOT_FOUND_MESSAGE)
    );
    assert!(h.events.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn transport_failure_is_shown() {
    let mut h = Harness::new();
    h.type_line(Command::Query("offline".to_string()));
    h.settle_next();
    assert_eq!(
        h.session.view().error.as_deref(),
        Some("error sending request")
    );
}

#[test]
fn short_query_sends_nothing() {
    let mut h = Harness::new();
    h.type_line(Command::Query("in".to_string()));
    assert!(!h.session.view().is_loading);
    assert!(h.events.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn out_of_range_indexes_are_reported() {
    let h = Harness::new();
    assert_eq!(
        h.session.resolve(Command::Open(3)),
        Resolved::Say("no result #3".to_string())
    );
    assert_eq!(
        h.session.resolve(Command::Remove(1)),
        Resolved::Say("no watched movie #1".to_string())
    );
    assert_eq!(h.session.resolve(Command::Quit), Resolved::Quit);
    assert!(matches!(
        h.session.resolve(Command::Clear),
        Resolved::Msg(Msg::QueryCleared)
    ));
}
