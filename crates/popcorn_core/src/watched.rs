use crate::MovieDetail;

/// Highest star a user can give.
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct WatchedMovie {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub user_rating: u8,
    /// `None` when the service did not report a number.
    pub imdb_rating: Option<f64>,
    pub runtime_minutes: Option<u32>,
    /// How many times the rating was changed before the movie was added.
    pub rating_decisions: u32,
}

impl WatchedMovie {
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, rating_decisions: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            user_rating,
            imdb_rating: parse_imdb_rating(&detail.imdb_rating),
            runtime_minutes: parse_runtime_minutes(&detail.runtime),
            rating_decisions,
        }
    }
}

/// Aggregates shown above the watched list. Missing values count as zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

impl WatchedSummary {
    pub fn from_movies(movies: &[WatchedMovie]) -> Self {
        Self {
            count: movies.len(),
            avg_imdb_rating: average(movies.iter().map(|m| m.imdb_rating.unwrap_or(0.0))),
            avg_user_rating: average(movies.iter().map(|m| f64::from(m.user_rating))),
            avg_runtime: average(
                movies
                    .iter()
                    .map(|m| m.runtime_minutes.map(f64::from).unwrap_or(0.0)),
            ),
        }
    }
}

fn average(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

fn parse_imdb_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}
