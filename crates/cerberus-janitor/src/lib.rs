//! Cerberus Janitor
//!
//! Background maintenance for the pipeline's holding and terminal locations.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Healing**: re-evaluating quarantined artifacts for promotion to Accepted
//! - **Archiving**: moving accepted artifacts with a final ACCEPT ruling to Archived
//! - **Compaction**: deleting Archived records older than a retention window
//! - **Metrics collection**: tracking sweep operations for monitoring
//!
//! Quarantine is a holding state, not a dead end: the healing pass runs a
//! pluggable [`HealingPolicy`](cerberus_domain::traits::HealingPolicy) over
//! every adjudicated quarantined artifact. Healing only ever promotes.
//!
//! # Usage
//!
//! ```no_run
//! use cerberus_janitor::{Janitor, JanitorConfig, NeverHeal};
//! use cerberus_store::FsStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FsStore::open("/var/lib/cerberus")?;
//! let mut janitor = Janitor::new(JanitorConfig::default()).with_policy(Box::new(NeverHeal));
//!
//! let metrics = janitor.sweep(&store)?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! sweep_interval_ms = 3000
//! heal = true
//! healing_policy = "always"
//! archive_after_secs = 3600
//! archive_retention_days = 0
//! quarantine_retention_days = 0
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod healing;
mod janitor;
mod metrics;

pub use config::{HealingPolicyKind, JanitorConfig};
pub use error::JanitorError;
pub use healing::{policy_for, AlwaysHeal, FnHeal, NeverHeal};
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
