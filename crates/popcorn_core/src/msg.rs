use crate::{DetailOutcome, RequestToken, SearchOutcome, WatchedMovie};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the search box.
    QueryChanged(String),
    /// User cleared the search box.
    QueryCleared,
    /// Engine response for a search request.
    SearchSettled {
        token: RequestToken,
        outcome: SearchOutcome,
    },
    /// User picked a movie from the result list. Picking the open one closes it.
    MovieSelected { id: String },
    /// User closed the detail panel.
    SelectionClosed,
    /// Engine response for a detail request.
    DetailsSettled {
        token: RequestToken,
        outcome: DetailOutcome,
    },
    /// User picked a star rating for the open movie.
    RatingChosen(u8),
    /// User added the open movie to the watched list.
    AddToWatched,
    /// User removed a movie from the watched list.
    WatchedRemoved { id: String },
    /// Restore the watched list from persisted state.
    RestoreWatched(Vec<WatchedMovie>),
}
