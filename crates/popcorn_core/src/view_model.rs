use crate::{DetailResult, MovieSummary, WatchedMovie, WatchedSummary};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub is_loading: bool,
    /// Shown in place of the result list.
    pub error: Option<String>,
    pub movies: Vec<MovieSummary>,
    pub selected_id: Option<String>,
    pub details: Option<DetailView>,
    pub watched: Vec<WatchedMovie>,
    pub summary: WatchedSummary,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn result_count(&self) -> usize {
        self.movies.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub details: DetailResult,
    pub user_rating: u8,
    /// Rating stored in the watched list, if this movie is already there.
    pub watched_rating: Option<u8>,
    pub can_add: bool,
}
