#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub released: String,
    /// As reported by the service, e.g. `"148 min"`.
    pub runtime: String,
    pub genre: String,
    pub plot: String,
    pub poster: String,
    pub actors: String,
    pub director: String,
    /// As reported by the service; may be `"N/A"`.
    pub imdb_rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailResult {
    #[default]
    Idle,
    Loading,
    Loaded(MovieDetail),
    Failed(String),
}

impl DetailResult {
    pub fn detail(&self) -> Option<&MovieDetail> {
        match self {
            DetailResult::Loaded(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Loaded(MovieDetail),
    Failed(String),
}
