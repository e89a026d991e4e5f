use crate::view_model::{AppViewModel, DetailView};
use crate::{
    DetailOutcome, DetailResult, Effect, QueryController, RequestToken, SearchLifecycle,
    SearchResult, TokenMint, TokenSlot, WatchedMovie, WatchedSummary, MAX_RATING,
};

/// The open detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    id: String,
    slot: TokenSlot,
    details: DetailResult,
    user_rating: u8,
    rating_decisions: u32,
}

impl Selection {
    pub(crate) fn open(id: String, mint: &mut TokenMint) -> (Self, Effect) {
        let mut slot = TokenSlot::default();
        let token = slot.issue(mint);
        let selection = Self {
            id: id.clone(),
            slot,
            details: DetailResult::Loading,
            user_rating: 0,
            rating_decisions: 0,
        };
        (selection, Effect::FetchDetails { token, id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn details(&self) -> &DetailResult {
        &self.details
    }

    /// Pending rating; `0` means none chosen yet.
    pub fn user_rating(&self) -> u8 {
        self.user_rating
    }

    pub fn rating_decisions(&self) -> u32 {
        self.rating_decisions
    }

    pub(crate) fn close(mut self) -> Option<Effect> {
        self.slot.invalidate()
    }

    pub(crate) fn on_settled(&mut self, token: RequestToken, outcome: DetailOutcome) -> bool {
        if !self.slot.settle(token) {
            return false;
        }
        self.details = match outcome {
            DetailOutcome::Loaded(detail) => DetailResult::Loaded(detail),
            DetailOutcome::Failed(reason) => DetailResult::Failed(reason),
        };
        true
    }

    /// Records a new rating. Repeating the current rating is not a decision.
    pub(crate) fn choose_rating(&mut self, rating: u8) -> bool {
        if !(1..=MAX_RATING).contains(&rating) || rating == self.user_rating {
            return false;
        }
        self.user_rating = rating;
        self.rating_decisions += 1;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) query: QueryController,
    pub(crate) search: SearchLifecycle,
    pub(crate) tokens: TokenMint,
    pub(crate) selection: Option<Selection>,
    pub(crate) watched: Vec<WatchedMovie>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        self.query.query()
    }

    pub fn search_result(&self) -> &SearchResult {
        self.search.result()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn watched(&self) -> &[WatchedMovie] {
        &self.watched
    }

    pub fn watched_rating(&self, id: &str) -> Option<u8> {
        self.watched
            .iter()
            .find(|movie| movie.id == id)
            .map(|movie| movie.user_rating)
    }

    pub fn view(&self) -> AppViewModel {
        let result = self.search.result();
        AppViewModel {
            query: self.query.query().to_string(),
            is_loading: result.is_loading(),
            error: result.error_message().map(ToOwned::to_owned),
            movies: result.movies().to_vec(),
            selected_id: self.selection.as_ref().map(|s| s.id.clone()),
            details: self.selection.as_ref().map(|s| self.detail_view(s)),
            watched: self.watched.clone(),
            summary: WatchedSummary::from_movies(&self.watched),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Closes the detail panel, returning the cancel effect for its request.
    pub(crate) fn close_selection(&mut self) -> Option<Effect> {
        let effect = self.selection.take().and_then(Selection::close);
        self.dirty = true;
        effect
    }

    fn detail_view(&self, selection: &Selection) -> DetailView {
        let watched_rating = self.watched_rating(&selection.id);
        DetailView {
            id: selection.id.clone(),
            details: selection.details.clone(),
            user_rating: selection.user_rating,
            watched_rating,
            can_add: watched_rating.is_none()
                && selection.user_rating > 0
                && selection.details.detail().is_some(),
        }
    }
}
