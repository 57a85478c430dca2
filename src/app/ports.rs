use crate::error::Result;

/// Where page markup comes from.
pub trait PageSource {
    /// Human-readable origin, used in logs.
    fn location(&self) -> &str;

    /// Returns the page markup, blocking until it is available.
    fn fetch(&self) -> Result<String>;
}

/// Markup already held in memory.
#[derive(Debug, Clone)]
pub struct StaticPage {
    location: String,
    markup: String,
}

impl StaticPage {
    pub fn new(location: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            markup: markup.into(),
        }
    }
}

impl PageSource for StaticPage {
    fn location(&self) -> &str {
        &self.location
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.markup.clone())
    }
}
