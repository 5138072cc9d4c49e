//! Filesystem implementation of the artifact store

use crate::layout::{StoreLayout, CONTENT_FILE, META_FILE};
use crate::loose::{self, LooseFile};
use crate::StoreError;
use cerberus_domain::traits::{ArtifactStore, AuditEntry};
use cerberus_domain::{
    current_timestamp, Artifact, ArtifactId, ArtifactMetadata, Decision, PipelineLocation,
    StoredArtifact,
};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Outcome of one pass over a directory of loose files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptReport {
    /// Records created from loose files
    pub adopted: Vec<ArtifactId>,
    /// Loose files that could not be decoded and were removed
    pub discarded: usize,
    /// Loose files skipped this pass because reading or depositing them failed
    pub failed: usize,
}

/// What happened to one loose file
enum Ingested {
    Adopted(ArtifactId),
    Discarded,
}

/// Directory-per-record artifact store
///
/// Every artifact is a directory named by its id holding `content.txt` and
/// `meta.json`. The directory's parent is the artifact's location, and
/// relocation is a single `rename` of that directory, so a record is always
/// visible in exactly one location.
///
/// # Examples
///
/// ```no_run
/// use cerberus_store::FsStore;
///
/// let store = FsStore::open("/var/lib/cerberus").unwrap();
/// // Store is now ready for pipeline operations
/// ```
#[derive(Debug)]
pub struct FsStore {
    layout: StoreLayout,
    audit_lock: Mutex<()>,
}

impl FsStore {
    /// Open a store at `root`, creating the directory tree if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root);
        for dir in layout.all_dirs() {
            fs::create_dir_all(&dir)?;
        }
        debug!(root = %layout.root().display(), "Opened artifact store");

        Ok(Self {
            layout,
            audit_lock: Mutex::new(()),
        })
    }

    /// Pipeline root directory
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Path layout
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Last `n` lines of the audit log, oldest first
    pub fn tail_audit(&self, n: usize) -> Result<Vec<String>, StoreError> {
        let text = match fs::read_to_string(self.layout.audit_log()) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|line| line.to_string()).collect())
    }

    /// Turn loose files dropped into the Inbox into proper records
    pub fn adopt_loose_files(&self) -> Result<AdoptReport, StoreError> {
        self.ingest_loose_dir(&self.layout.location_dir(PipelineLocation::Inbox))
    }

    /// Deposit every loose file in `dir` as a fresh Inbox record
    ///
    /// Each file is first claimed by renaming it to a hidden name, so a file
    /// whose removal fails after its record was deposited is never adopted a
    /// second time. A file that cannot be read or deposited is put back for
    /// the next pass and the rest of the directory is still processed.
    /// Undecodable files are removed with a warning; hidden files are left
    /// alone. A missing directory yields an empty report.
    pub fn ingest_loose_dir(&self, dir: &Path) -> Result<AdoptReport, StoreError> {
        let mut report = AdoptReport::default();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                    report.failed += 1;
                    continue;
                }
            };
            if !path.is_file() || is_hidden(&path) {
                continue;
            }

            match self.ingest_loose_file(&path) {
                Ok(Ingested::Adopted(id)) => report.adopted.push(id),
                Ok(Ingested::Discarded) => report.discarded += 1,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to adopt loose file, will retry");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    fn ingest_loose_file(&self, path: &Path) -> Result<Ingested, StoreError> {
        let claimed = claimed_path(path)?;
        fs::rename(path, &claimed)?;

        let deposited = fs::read(&claimed)
            .map_err(StoreError::from)
            .and_then(|bytes| match loose::decode(path, &bytes) {
                LooseFile::Artifact(artifact) => self.deposit(&artifact).map(Ingested::Adopted),
                LooseFile::Undecodable(reason) => {
                    warn!(file = %path.display(), reason = %reason, "Discarding undecodable loose file");
                    Ok(Ingested::Discarded)
                }
            });

        let ingested = match deposited {
            Ok(ingested) => ingested,
            Err(e) => {
                if let Err(restore) = fs::rename(&claimed, path) {
                    warn!(file = %claimed.display(), error = %restore, "Failed to release claimed loose file");
                }
                return Err(e);
            }
        };

        if let Err(e) = fs::remove_file(&claimed) {
            warn!(file = %claimed.display(), error = %e, "Failed to remove claimed loose file");
        }
        if let Ingested::Adopted(id) = &ingested {
            info!(id = %id, file = %path.display(), "Adopted loose file");
        }
        Ok(ingested)
    }

    /// Rename a record directory and append the transition to its history
    fn move_record(
        &self,
        id: ArtifactId,
        from: PipelineLocation,
        to: PipelineLocation,
        reason: &str,
    ) -> Result<(), StoreError> {
        let src = self.layout.record_dir(id, from);
        let dest = self.layout.record_dir(id, to);
        if !src.is_dir() {
            return Err(StoreError::NotFound(format!("{} in {}", id, from)));
        }
        if dest.exists() {
            return Err(StoreError::AlreadyExists(format!("{} in {}", id, to)));
        }

        fs::rename(&src, &dest)?;

        let mut metadata = self.read_metadata(&dest)?;
        metadata.record_transition(Some(from), to, reason, current_timestamp());
        Self::write_metadata(&dest, &metadata)?;

        debug!(id = %id, from = %from, to = %to, reason, "Relocated artifact");
        Ok(())
    }

    fn read_metadata(&self, dir: &Path) -> Result<ArtifactMetadata, StoreError> {
        let bytes = fs::read(dir.join(META_FILE))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write metadata through a sibling temp file so readers never see half a record
    fn write_metadata(dir: &Path, metadata: &ArtifactMetadata) -> Result<(), StoreError> {
        let tmp = dir.join(format!("{}.tmp", META_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(metadata)?)?;
        fs::rename(&tmp, dir.join(META_FILE))?;
        Ok(())
    }
}

impl ArtifactStore for FsStore {
    type Error = StoreError;

    fn deposit(&self, artifact: &Artifact) -> Result<ArtifactId, Self::Error> {
        let dest = self.layout.record_dir(artifact.id, PipelineLocation::Inbox);
        if dest.exists() {
            return Err(StoreError::AlreadyExists(artifact.id.to_string()));
        }

        let staging = self.layout.tmp_dir().join(artifact.id.to_string());
        fs::create_dir_all(&staging)?;

        let mut metadata = ArtifactMetadata::for_artifact(artifact);
        metadata.record_transition(None, PipelineLocation::Inbox, "deposited", current_timestamp());

        let built = fs::write(staging.join(CONTENT_FILE), &artifact.content)
            .map_err(StoreError::from)
            .and_then(|_| Self::write_metadata(&staging, &metadata))
            .and_then(|_| fs::rename(&staging, &dest).map_err(StoreError::from));

        if let Err(e) = built {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        debug!(id = %artifact.id, "Deposited artifact");
        Ok(artifact.id)
    }

    fn load(
        &self,
        id: ArtifactId,
        location: PipelineLocation,
    ) -> Result<Option<StoredArtifact>, Self::Error> {
        let dir = self.layout.record_dir(id, location);
        let content = match fs::read_to_string(dir.join(CONTENT_FILE)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let metadata = self.read_metadata(&dir)?;

        if metadata.id != id {
            return Err(StoreError::InvalidData(format!(
                "metadata in {} belongs to {}",
                dir.display(),
                metadata.id
            )));
        }

        let artifact = Artifact {
            id,
            content,
            captured_at: metadata.captured_at,
            source_kind: metadata.source_kind,
        };

        Ok(Some(StoredArtifact {
            artifact,
            metadata,
            location,
        }))
    }

    fn list(&self, location: PipelineLocation) -> Result<Vec<ArtifactId>, Self::Error> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.layout.location_dir(location))? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| ArtifactId::from_string(name).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn save_metadata(
        &self,
        metadata: &ArtifactMetadata,
        location: PipelineLocation,
    ) -> Result<(), Self::Error> {
        let dir = self.layout.record_dir(metadata.id, location);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(format!("{} in {}", metadata.id, location)));
        }
        Self::write_metadata(&dir, metadata)
    }

    fn relocate(
        &self,
        id: ArtifactId,
        from: PipelineLocation,
        to: PipelineLocation,
        reason: &str,
    ) -> Result<(), Self::Error> {
        if !from.can_transition_to(to) {
            return Err(StoreError::InvalidTransition { from, to });
        }
        self.move_record(id, from, to, reason)
    }

    fn reassign(
        &self,
        id: ArtifactId,
        from: PipelineLocation,
        to: PipelineLocation,
        reason: &str,
    ) -> Result<(), Self::Error> {
        if !from.can_reassign_to(to) {
            return Err(StoreError::InvalidTransition { from, to });
        }
        self.move_record(id, from, to, reason)
    }

    fn delete(&self, id: ArtifactId, location: PipelineLocation) -> Result<(), Self::Error> {
        let dir = self.layout.record_dir(id, location);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(format!("{} in {}", id, location)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn copy_to_verdicts(
        &self,
        metadata: &ArtifactMetadata,
        location: PipelineLocation,
        decision: Decision,
    ) -> Result<(), Self::Error> {
        let src = self.layout.record_dir(metadata.id, location);
        if !src.is_dir() {
            return Err(StoreError::NotFound(format!("{} in {}", metadata.id, location)));
        }

        let dest = self.layout.verdict_dir(decision).join(metadata.id.to_string());
        fs::create_dir_all(&dest)?;
        fs::copy(src.join(CONTENT_FILE), dest.join(CONTENT_FILE))?;
        Self::write_metadata(&dest, metadata)
    }

    fn append_audit(&self, entry: &AuditEntry) -> Result<(), Self::Error> {
        let line = format!(
            "[{}] [{}] {}: {} - {}\n",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            entry.level,
            entry.event,
            entry.id,
            entry.detail.replace('\n', " ")
        );

        let _guard = self
            .audit_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.layout.audit_log())?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Hidden sibling a loose file is renamed to while it is being adopted
fn claimed_path(path: &Path) -> Result<PathBuf, StoreError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StoreError::InvalidData(format!("unusable file name: {}", path.display())))?;
    Ok(path.with_file_name(format!(".{}.claimed", name)))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
