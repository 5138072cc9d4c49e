//! Cerberus Gatekeeper
//!
//! The final adjudicator for placed artifacts.
//!
//! The Gatekeeper provides:
//! - Danger keyword veto (credentials, exploits)
//! - Deception phrase flagging
//! - Covenant alignment scoring
//! - The category decision table (ACCEPT, QUARANTINE, REVIEW)
//!
//! # Examples
//!
//! ```
//! use cerberus_gatekeeper::Adjudicator;
//! use cerberus_domain::{Category, ClassificationResult, Decision, Scores};
//!
//! let adjudicator = Adjudicator::default();
//! let classification = ClassificationResult::scored(Category::Fact, Scores::default(), vec![]);
//!
//! let ruling = adjudicator.adjudicate("the password is hunter2", &classification);
//! assert_eq!(ruling.decision, Decision::Quarantine);
//! ```

#![warn(missing_docs)]

mod adjudicator;
mod config;
mod error;

pub use adjudicator::Adjudicator;
pub use config::AdjudicationConfig;
pub use error::GatekeeperError;
