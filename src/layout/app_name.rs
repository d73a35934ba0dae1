use derive_more::Display;

use crate::filesystem::{TreeError, validate_segment};

/// Name of the generated application. Used as the root directory name, so it
/// must be a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct AppName(String);

impl AppName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AppName {
    type Error = TreeError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        validate_segment(raw)?;
        Ok(AppName(raw.to_string()))
    }
}
