//! Artifact module - the unit of captured text moving through the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an artifact based on UUIDv7
///
/// UUIDv7 sorts chronologically, so directory listings of a stage come back in
/// capture order without consulting the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(u128);

impl ArtifactId {
    /// Generate a new UUIDv7-based ArtifactId
    ///
    /// # Examples
    ///
    /// ```
    /// use cerberus_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ArtifactId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an ArtifactId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use cerberus_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new();
    /// let parsed = ArtifactId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid artifact id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Millisecond timestamp embedded in the UUIDv7
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

/// Where an artifact was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Clipboard probe
    Clipboard,
    /// File dropped into a watched directory or the inbox
    File,
    /// Submitted by hand (CLI, API)
    Manual,
}

impl SourceKind {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Clipboard => "clipboard",
            SourceKind::File => "file",
            SourceKind::Manual => "manual",
        }
    }

    /// Parse a source kind, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clipboard" => Some(SourceKind::Clipboard),
            "file" => Some(SourceKind::File),
            "manual" => Some(SourceKind::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured artifact
///
/// Content is immutable once captured; everything the pipeline learns about the
/// artifact goes into its [`ArtifactMetadata`](crate::ArtifactMetadata).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Unique identifier
    pub id: ArtifactId,

    /// Raw captured text
    pub content: String,

    /// Capture time (seconds since Unix epoch)
    pub captured_at: u64,

    /// Collector that produced this artifact
    pub source_kind: SourceKind,
}

impl Artifact {
    /// Create a new artifact with a fresh id
    pub fn new(content: impl Into<String>, source_kind: SourceKind, captured_at: u64) -> Self {
        Self {
            id: ArtifactId::new(),
            content: content.into(),
            captured_at,
            source_kind,
        }
    }

    /// Create an artifact captured now
    pub fn captured_now(content: impl Into<String>, source_kind: SourceKind) -> Self {
        Self::new(content, source_kind, crate::current_timestamp())
    }

    /// Length of the content once surrounding whitespace is removed, in characters
    pub fn trimmed_len(&self) -> usize {
        self.content.trim().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_id_ordering() {
        let id1 = ArtifactId::from_value(1000);
        let id2 = ArtifactId::from_value(2000);

        assert!(id1 < id2);
    }

    #[test]
    fn test_artifact_id_chronological() {
        let id1 = ArtifactId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ArtifactId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort first");
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_artifact_id_display_and_parse() {
        let id = ArtifactId::new();
        let id_str = id.to_string();

        assert_eq!(id_str.len(), 36);
        assert_eq!(ArtifactId::from_string(&id_str).unwrap(), id);
        assert!(ArtifactId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_artifact_id_serializes_as_string() {
        let id = ArtifactId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: ArtifactId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("Clipboard"), Some(SourceKind::Clipboard));
        assert_eq!(SourceKind::parse(" file "), Some(SourceKind::File));
        assert_eq!(SourceKind::parse("telepathy"), None);
    }

    #[test]
    fn test_trimmed_len_counts_chars() {
        let artifact = Artifact::new("  é \n", SourceKind::Manual, 0);
        assert_eq!(artifact.trimmed_len(), 1);
    }
}
