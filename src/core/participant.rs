use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant in a settlement group.
///
/// A participant is any entity that can owe or be owed money — in
/// practice a person's name in a shared-expense group, but any opaque
/// comparable string works.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
///
/// let jacek = ParticipantId::new("Jacek");
/// let kasia = ParticipantId::new("Kasia");
/// assert_ne!(jacek, kasia);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this participant ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
