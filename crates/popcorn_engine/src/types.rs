use std::fmt;

pub type RequestId = u64;

/// One entry of a search response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieHit {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieDetails {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub plot: String,
    pub poster: String,
    pub actors: String,
    pub director: String,
    pub imdb_rating: String,
}

/// Decoded body of a successful search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPayload {
    Matches(Vec<MovieHit>),
    /// The service reported `Response: "False"`; `message` is its `Error` field.
    NoMatch { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SearchCompleted {
        request_id: RequestId,
        result: Result<SearchPayload, FetchError>,
    },
    DetailsCompleted {
        request_id: RequestId,
        result: Result<MovieDetails, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the JSON shape we expect.
    Decode,
    /// Well-formed response with `Response: "False"`.
    Rejected,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by service"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
