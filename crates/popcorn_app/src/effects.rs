use popcorn_core::{
    DetailOutcome, Effect, MovieDetail, MovieSummary, Msg, RequestToken, SearchOutcome,
};
use popcorn_engine::{EngineEvent, EngineHandle, KeyValueStore, MovieDetails, MovieHit, SearchPayload};
use popcorn_logging::{popcorn_debug, popcorn_info, popcorn_warn};

use crate::persistence;

pub struct EffectRunner {
    engine: EngineHandle,
    store: KeyValueStore,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: KeyValueStore) -> Self {
        Self { engine, store }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelRequest { token } => {
                    popcorn_debug!("CancelRequest token={}", token.raw());
                    self.engine.cancel(token.raw());
                }
                Effect::SearchMovies { token, query } => {
                    popcorn_info!(
                        "SearchMovies token={} query_len={}",
                        token.raw(),
                        query.chars().count()
                    );
                    self.engine.search(token.raw(), query);
                }
                Effect::FetchDetails { token, id } => {
                    popcorn_info!("FetchDetails token={} id={}", token.raw(), id);
                    self.engine.details(token.raw(), id);
                }
                Effect::PersistWatched(movies) => {
                    persistence::save_watched(&self.store, &movies);
                }
            }
        }
    }
}

/// Translates an engine report into the message the state machine expects.
pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { request_id, result } => {
            let outcome = match result {
                Ok(SearchPayload::Matches(hits)) => {
                    SearchOutcome::Found(hits.into_iter().map(map_hit).collect())
                }
                Ok(SearchPayload::NoMatch { message }) => {
                    popcorn_debug!("Search {} matched nothing: {}", request_id, message);
                    SearchOutcome::NotFound
                }
                Err(err) => {
                    popcorn_warn!("Search {} failed ({}): {}", request_id, err.kind, err);
                    SearchOutcome::Failed(err.message)
                }
            };
            Msg::SearchSettled {
                token: RequestToken::from_raw(request_id),
                outcome,
            }
        }
        EngineEvent::DetailsCompleted { request_id, result } => {
            let outcome = match result {
                Ok(details) => DetailOutcome::Loaded(map_details(details)),
                Err(err) => {
                    popcorn_warn!("Details {} failed ({}): {}", request_id, err.kind, err);
                    DetailOutcome::Failed(err.message)
                }
            };
            Msg::DetailsSettled {
                token: RequestToken::from_raw(request_id),
                outcome,
            }
        }
    }
}

fn map_hit(hit: MovieHit) -> MovieSummary {
    MovieSummary {
        id: hit.imdb_id,
        title: hit.title,
        year: hit.year,
        poster: hit.poster,
    }
}

fn map_details(details: MovieDetails) -> MovieDetail {
    MovieDetail {
        id: details.imdb_id,
        title: details.title,
        year: details.year,
        released: details.released,
        runtime: details.runtime,
        genre: details.genre,
        plot: details.plot,
        poster: details.poster,
        actors: details.actors,
        director: details.director,
        imdb_rating: details.imdb_rating,
    }
}
