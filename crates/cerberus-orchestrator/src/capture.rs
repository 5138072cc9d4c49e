//! Collectors polled by the capture stage

use crate::OrchestratorError;
use cerberus_domain::SourceKind;
use cerberus_store::{AdoptReport, FsStore};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs an external command that prints the current clipboard text
///
/// Each poll spawns the command under a timeout. A timeout, a non-zero exit,
/// empty output, or output identical to the previous capture all mean
/// "nothing new this cycle".
#[derive(Debug)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    last: Mutex<Option<String>>,
}

impl CommandProbe {
    /// Build a probe from `[program, args...]`; `None` when the command is empty
    pub fn new(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
            last: Mutex::new(None),
        })
    }

    /// The program this probe runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the probe once
    ///
    /// Returns `Ok(Some(text))` only for text not seen on the previous poll.
    /// Fails only when the command cannot be spawned at all.
    pub async fn poll(&self) -> Result<Option<String>, OrchestratorError> {
        let run = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(OrchestratorError::Capture(format!(
                    "failed to run {}: {}",
                    self.program, e
                )))
            }
            Err(_) => {
                debug!(program = %self.program, timeout = ?self.timeout, "Probe timed out");
                return Ok(None);
            }
        };

        if !output.status.success() {
            debug!(program = %self.program, status = %output.status, "Probe exited unsuccessfully");
            return Ok(None);
        }

        let text = match String::from_utf8(output.stdout) {
            Ok(text) => text,
            Err(_) => {
                warn!(program = %self.program, "Probe printed non UTF-8 output, ignoring");
                return Ok(None);
            }
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(self.remember(text))
    }

    /// Record `text` as the latest capture, returning it only if it changed
    fn remember(&self, text: String) -> Option<String> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(text.as_str()) {
            return None;
        }
        *last = Some(text.clone());
        Some(text)
    }
}

/// A directory other tools drop text or envelope files into
///
/// Files use the same formats as loose Inbox files and go through the same
/// adoption as them: each is deposited and then removed, a file that fails is
/// left for the next pass, and hidden files are left alone.
#[derive(Debug, Clone)]
pub struct DropDirectory {
    dir: PathBuf,
}

impl DropDirectory {
    /// Watch `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Watched directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Deposit every file currently in the directory
    ///
    /// A missing directory yields an empty report.
    pub fn drain(&self, store: &FsStore) -> Result<AdoptReport, OrchestratorError> {
        let report = store.ingest_loose_dir(&self.dir)?;
        for id in &report.adopted {
            debug!(id = %id, dir = %self.dir.display(), "Deposited dropped file");
        }
        Ok(report)
    }
}

/// A configured capture source
#[derive(Debug)]
pub enum Collector {
    /// Clipboard command probe
    Clipboard(CommandProbe),
    /// Drop directory
    DropDir(DropDirectory),
}

impl Collector {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Collector::Clipboard(_) => "clipboard",
            Collector::DropDir(_) => "drop_dir",
        }
    }

    /// Source kind recorded on artifacts this collector produces
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Collector::Clipboard(_) => SourceKind::Clipboard,
            Collector::DropDir(_) => SourceKind::File,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_domain::traits::ArtifactStore;
    use cerberus_domain::PipelineLocation;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_command_disables_clipboard_capture() {
        assert!(CommandProbe::new(&[], Duration::from_secs(1)).is_none());
        assert!(CommandProbe::new(&[" ".to_string()], Duration::from_secs(1)).is_none());

        let probe = CommandProbe::new(&["echo".to_string(), "hi".to_string()], Duration::from_secs(1));
        assert_eq!(probe.unwrap().program(), "echo");
    }

    #[test]
    fn test_remember_dedupes() {
        let probe = CommandProbe::new(&["true".to_string()], Duration::from_secs(1)).unwrap();
        assert_eq!(probe.remember("a".to_string()), Some("a".to_string()));
        assert_eq!(probe.remember("a".to_string()), None);
        assert_eq!(probe.remember("b".to_string()), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_missing_program_is_capture_error() {
        let probe = CommandProbe::new(
            &["cerberus-no-such-probe-binary".to_string()],
            Duration::from_secs(1),
        )
        .unwrap();
        let err = probe.poll().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Capture(_)));
    }

    #[test]
    fn test_drain_drop_directory() {
        let root = TempDir::new().unwrap();
        let drops = TempDir::new().unwrap();
        let store = FsStore::open(root.path()).unwrap();

        fs::write(drops.path().join("note.txt"), "the data shows a verified result").unwrap();
        fs::write(
            drops.path().join("clip.json"),
            r#"{"timestamp": 1700000000, "source": "clipboard", "content": "trust me"}"#,
        )
        .unwrap();
        fs::write(drops.path().join("broken.json"), "{not json").unwrap();
        fs::write(drops.path().join(".partial"), "still writing").unwrap();

        let report = DropDirectory::new(drops.path()).drain(&store).unwrap();

        assert_eq!(report.adopted.len(), 2);
        assert_eq!(report.discarded, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(store.count(PipelineLocation::Inbox).unwrap(), 2);
        assert!(drops.path().join(".partial").exists());
        assert!(!drops.path().join("note.txt").exists());
    }

    #[test]
    fn test_drain_missing_directory() {
        let root = TempDir::new().unwrap();
        let store = FsStore::open(root.path()).unwrap();
        let report = DropDirectory::new(root.path().join("nope")).drain(&store).unwrap();
        assert_eq!(report, AdoptReport::default());
    }
}
