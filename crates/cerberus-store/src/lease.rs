//! In-process per-artifact leases

use cerberus_domain::ArtifactId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Exclusive claims on artifact ids
///
/// A stage takes a lease before mutating an artifact and holds it until the
/// mutation is finished; any other stage that asks for the same id is refused
/// and skips the artifact for this cycle. Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct LeaseTable {
    held: Arc<Mutex<HashSet<ArtifactId>>>,
}

impl LeaseTable {
    /// Create an empty lease table
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<ArtifactId>> {
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Try to lease `id`; `None` if another holder has it
    pub fn try_acquire(&self, id: ArtifactId) -> Option<LeaseGuard> {
        if self.lock().insert(id) {
            Some(LeaseGuard {
                table: self.clone(),
                id,
            })
        } else {
            None
        }
    }

    /// Whether `id` is currently leased
    pub fn is_leased(&self, id: ArtifactId) -> bool {
        self.lock().contains(&id)
    }

    /// Number of leases currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no lease is held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its lease when dropped
#[derive(Debug)]
pub struct LeaseGuard {
    table: LeaseTable,
    id: ArtifactId,
}

impl LeaseGuard {
    /// The leased id
    pub fn id(&self) -> ArtifactId {
        self.id
    }
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        self.table.lock().remove(&self.id);
    }
}
