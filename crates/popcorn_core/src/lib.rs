//! Popcorn core: pure state machine and view-model helpers.
mod detail;
mod effect;
mod lifecycle;
mod msg;
mod query;
mod search;
mod state;
mod update;
mod view_model;
mod watched;

pub use detail::{DetailOutcome, DetailResult, MovieDetail};
pub use effect::Effect;
pub use lifecycle::{RequestToken, TokenMint, TokenSlot};
pub use msg::Msg;
pub use query::{QueryController, QueryEvent};
pub use search::{
    MovieSummary, SearchLifecycle, SearchOutcome, SearchResult, MIN_QUERY_LEN, NOT_FOUND_MESSAGE,
};
pub use state::{AppState, Selection};
pub use update::update;
pub use view_model::{AppViewModel, DetailView};
pub use watched::{WatchedMovie, WatchedSummary, MAX_RATING};
