use popcorn_core::WatchedMovie;
use popcorn_engine::KeyValueStore;
use popcorn_logging::{popcorn_error, popcorn_info};
use serde::{Deserialize, Serialize};

pub const WATCHED_KEY: &str = "watched";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedWatched {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    poster: String,
    #[serde(rename = "userRating")]
    user_rating: u8,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<f64>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(rename = "countRatingDecisions", default)]
    rating_decisions: u32,
}

impl From<&WatchedMovie> for PersistedWatched {
    fn from(movie: &WatchedMovie) -> Self {
        Self {
            imdb_id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster: movie.poster.clone(),
            user_rating: movie.user_rating,
            imdb_rating: movie.imdb_rating,
            runtime: movie.runtime_minutes,
            rating_decisions: movie.rating_decisions,
        }
    }
}

impl From<PersistedWatched> for WatchedMovie {
    fn from(entry: PersistedWatched) -> Self {
        Self {
            id: entry.imdb_id,
            title: entry.title,
            year: entry.year,
            poster: entry.poster,
            user_rating: entry.user_rating,
            imdb_rating: entry.imdb_rating,
            runtime_minutes: entry.runtime,
            rating_decisions: entry.rating_decisions,
        }
    }
}

/// Reads the watched list, falling back to an empty list.
pub fn load_watched(store: &KeyValueStore) -> Vec<WatchedMovie> {
    let Some(entries) = store.get::<Vec<PersistedWatched>>(WATCHED_KEY) else {
        return Vec::new();
    };
    popcorn_info!(
        "Loaded {} watched movies from {:?}",
        entries.len(),
        store.path()
    );
    entries.into_iter().map(WatchedMovie::from).collect()
}

pub fn save_watched(store: &KeyValueStore, movies: &[WatchedMovie]) {
    let entries: Vec<PersistedWatched> = movies.iter().map(PersistedWatched::from).collect();
    if let Err(err) = store.set(WATCHED_KEY, &entries) {
        popcorn_error!(
            "Failed to write watched list to {:?}: {}",
            store.path(),
            err
        );
    }
}
