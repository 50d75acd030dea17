//! Key case rules.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// Conversion direction, fixed per hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Outgoing payloads: camelCase to snake_case
    Outbound,
    /// Incoming payloads: snake_case to camelCase
    Inbound,
}

impl Direction {
    /// Rewrite a single key according to this direction's case rule.
    ///
    /// Word boundaries are lower-to-upper transitions, the end of an acronym
    /// (`HTTPServer`), a digit followed by an upper-case letter, and any
    /// non-alphanumeric separator. Keys already in the target form come back
    /// unchanged.
    pub fn convert_key(self, key: &str) -> String {
        match self {
            Self::Outbound => key.to_snake_case(),
            Self::Inbound => key.to_lower_camel_case(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
