//! GeneratorCall - decoded `fake:{...}` directive

use std::fmt;

/// A generator invocation decoded from a template string.
///
/// Ranged generators carry exactly two raw parameters `[min, max]`,
/// zero-argument generators carry none. Parameters stay strings; each
/// generator interprets its own bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCall {
    name: String,
    params: Vec<String>,
}

impl GeneratorCall {
    /// Zero-argument call
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Ranged call with `[min, max]`
    pub fn ranged(name: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![min.into(), max.into()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for GeneratorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "fake:{{{}}}", self.name)
        } else {
            write!(f, "fake:{{{}:{}}}", self.name, self.params.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_grammar() {
        assert_eq!(GeneratorCall::new("email").to_string(), "fake:{email}");
        assert_eq!(
            GeneratorCall::ranged("number", "1", "100").to_string(),
            "fake:{number:1,100}"
        );
    }
}
