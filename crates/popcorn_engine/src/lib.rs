//! Popcorn engine: OMDb transport, cancellable request execution and local persistence.
mod engine;
mod omdb;
mod persist;
mod types;

pub use engine::EngineHandle;
pub use omdb::{parse_details, parse_search, MovieSource, OmdbClient, OmdbSettings};
pub use persist::{ensure_dir, AtomicFileWriter, KeyValueStore, PersistError};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    EngineEvent, FailureKind, FetchError, MovieDetails, MovieHit, RequestId, SearchPayload,
};
