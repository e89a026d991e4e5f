use crate::{Effect, RequestToken, TokenMint, TokenSlot};

/// Queries shorter than this (in characters) never reach the network.
pub const MIN_QUERY_LEN: usize = 3;

/// User-facing text for a well-formed response without matches.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
}

/// The single current outcome of the search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchResult {
    #[default]
    Idle,
    Loading,
    Success(Vec<MovieSummary>),
    NotFound,
    Failed(String),
}

impl SearchResult {
    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            SearchResult::Success(movies) => movies,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchResult::Loading)
    }

    /// Message to show instead of the result list, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SearchResult::NotFound => Some(NOT_FOUND_MESSAGE),
            SearchResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Settled response for one search request, as reported by the IO layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The service answered with a list. Responses lacking the found/not-found
    /// discriminator also land here, with an empty list.
    Found(Vec<MovieSummary>),
    /// The service answered that nothing matched.
    NotFound,
    /// Transport failure; the message is shown verbatim.
    Failed(String),
}

/// Translates query events into a [`SearchResult`], keeping at most one
/// request live and ignoring responses for superseded requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchLifecycle {
    slot: TokenSlot,
    result: SearchResult,
}

impl SearchLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn live_token(&self) -> Option<RequestToken> {
        self.slot.live()
    }

    /// Reacts to a new query value.
    ///
    /// `on_close_selection` runs exactly once when the query starts a request
    /// and never for gated queries.
    pub fn on_query(
        &mut self,
        query: &str,
        mint: &mut TokenMint,
        on_close_selection: impl FnOnce(),
    ) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        effects.extend(self.slot.invalidate());

        if query.chars().count() < MIN_QUERY_LEN {
            self.result = SearchResult::Idle;
            return effects;
        }

        self.result = SearchResult::Loading;
        on_close_selection();
        let token = self.slot.issue(mint);
        effects.push(Effect::SearchMovies {
            token,
            query: query.to_string(),
        });
        effects
    }

    /// Applies a response. Returns `false` when the token is stale, in which
    /// case nothing changed.
    pub fn on_settled(&mut self, token: RequestToken, outcome: SearchOutcome) -> bool {
        if !self.slot.settle(token) {
            return false;
        }
        self.result = match outcome {
            SearchOutcome::Found(movies) => SearchResult::Success(movies),
            SearchOutcome::NotFound => SearchResult::NotFound,
            SearchOutcome::Failed(reason) => SearchResult::Failed(reason),
        };
        true
    }
}
