//! Landmark identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid landmark ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid landmark ID: {reason}")]
pub struct InvalidLandmarkId {
    reason: &'static str,
}

/// Identifier of a landmark document in the data store.
///
/// IDs are opaque; the only validation is that they are non-blank.
///
/// # Examples
///
/// ```
/// use landmark_server::domain::LandmarkId;
///
/// let id = LandmarkId::new("fort-santiago").unwrap();
/// assert_eq!(id.as_str(), "fort-santiago");
///
/// assert!(LandmarkId::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LandmarkId(String);

impl LandmarkId {
    /// Create a new landmark ID.
    ///
    /// Returns an error if the string is empty or only whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidLandmarkId> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(InvalidLandmarkId {
                reason: "landmark ID cannot be blank",
            });
        }
        Ok(LandmarkId(s))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LandmarkId {
    type Error = InvalidLandmarkId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LandmarkId> for String {
    fn from(id: LandmarkId) -> Self {
        id.0
    }
}

impl fmt::Debug for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LandmarkId({})", self.0)
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
