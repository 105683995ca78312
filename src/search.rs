/// Text input used to filter the roster by name or ID
#[derive(Clone, Debug, Default)]
pub struct SearchBar {
    query: String,
}

impl SearchBar {
    pub const PLACEHOLDER: &'static str = "Search by name or ID";

    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the input value and returns it for the caller to report upward.
    ///
    /// Called on every change; nothing is debounced or rejected.
    pub fn input(&mut self, value: impl Into<String>) -> &str {
        self.query = value.into();
        &self.query
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}
