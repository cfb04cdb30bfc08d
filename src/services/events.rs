use crate::error::{WelcomerError, WelcomerResult};
use regex::Regex;

/// Recognises the server's join broadcast.
///
/// Only whole lines of the form `<name> joined the game` match. Chat that
/// merely contains the phrase is rejected.
#[derive(Debug, Clone)]
pub struct JoinEventParser {
    /// Whole-line join broadcast, capturing the name
    join_pattern: Regex,
}

impl JoinEventParser {
    pub fn new() -> Self {
        Self {
            join_pattern: Regex::new(r"^(.*?) joined the game$").expect("Invalid join regex"),
        }
    }

    /// Extract the player name from a join line
    pub fn parse(&self, line: &str) -> WelcomerResult<String> {
        self.join_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|name| name.as_str().to_string())
            .ok_or_else(|| WelcomerError::MalformedEvent(line.to_string()))
    }
}

impl Default for JoinEventParser {
    fn default() -> Self {
        Self::new()
    }
}
