//! Decoding of loose files dropped into the Inbox by external collectors

use cerberus_domain::{current_timestamp, Artifact, SourceKind};
use serde::Deserialize;
use std::path::Path;

/// JSON envelope written by collectors
///
/// `{"timestamp": 1700000000, "source": "clipboard", "content": "..."}`;
/// extra fields (e.g. `length`) are ignored.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    timestamp: Option<f64>,
    #[serde(default)]
    source: Option<String>,
    content: String,
}

/// Result of decoding one loose file
#[derive(Debug, PartialEq)]
pub enum LooseFile {
    /// Decoded into an artifact
    Artifact(Artifact),
    /// Unusable; the reason is logged and the file removed
    Undecodable(String),
}

/// Decode the bytes of a loose inbox file
///
/// `.json` files must hold an envelope. Anything else is taken as plain UTF-8
/// text captured from a file.
pub fn decode(path: &Path, bytes: &[u8]) -> LooseFile {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        return match serde_json::from_slice::<Envelope>(bytes) {
            Ok(envelope) => {
                let source_kind = envelope
                    .source
                    .as_deref()
                    .and_then(SourceKind::parse)
                    .unwrap_or(SourceKind::File);
                let captured_at = envelope
                    .timestamp
                    .filter(|ts| ts.is_finite() && *ts >= 0.0)
                    .map(|ts| ts as u64)
                    .unwrap_or_else(current_timestamp);
                LooseFile::Artifact(Artifact::new(envelope.content, source_kind, captured_at))
            }
            Err(e) => LooseFile::Undecodable(format!("invalid envelope: {}", e)),
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => LooseFile::Artifact(Artifact::captured_now(text, SourceKind::File)),
        Err(e) => LooseFile::Undecodable(format!("not UTF-8 text: {}", e)),
    }
}
