//! Submit command implementation.

use crate::cli::SubmitArgs;
use crate::commands::read_text;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use cerberus_domain::traits::{ArtifactStore, AuditEntry, AuditLevel};
use cerberus_domain::{Artifact, ArtifactId, SourceKind};
use cerberus_store::FsStore;
use std::path::Path;

/// Deposit `text` into the Inbox of the store at `root`.
///
/// The store is shared through the filesystem, so a running daemon picks the
/// artifact up on its next classify pass.
pub fn submit_text(root: &Path, text: String) -> Result<ArtifactId> {
    let store = FsStore::open(root)?;
    let artifact = Artifact::captured_now(text, SourceKind::Manual);
    let id = store.deposit(&artifact)?;
    store.append_audit(&AuditEntry::new(AuditLevel::Info, "CAPTURED", id, "cli"))?;
    Ok(id)
}

/// Execute the submit command.
pub fn execute_submit(args: SubmitArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_text(&args.input)?;
    let root = args.root.unwrap_or_else(|| config.pipeline.root.clone());
    let id = submit_text(&root, text)?;

    println!("{}", formatter.success(&format!("Submitted {}", id)));
    Ok(())
}
