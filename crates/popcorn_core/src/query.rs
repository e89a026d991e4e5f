/// One published change of the search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEvent {
    /// Strictly increasing, also when the text did not change.
    pub revision: u64,
    pub query: String,
}

/// Owns the current search text.
///
/// Every `set_query` call is a new event; there is no debouncing and no
/// validation, the text is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryController {
    query: String,
    revision: u64,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_query(&mut self, value: impl Into<String>) -> QueryEvent {
        self.query = value.into();
        self.revision += 1;
        QueryEvent {
            revision: self.revision,
            query: self.query.clone(),
        }
    }
}
