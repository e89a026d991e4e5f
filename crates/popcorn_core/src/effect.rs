use crate::{RequestToken, WatchedMovie};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Abort the request for a token that was invalidated.
    CancelRequest { token: RequestToken },
    SearchMovies { token: RequestToken, query: String },
    FetchDetails { token: RequestToken, id: String },
    /// Store the full watched list.
    PersistWatched(Vec<WatchedMovie>),
}
