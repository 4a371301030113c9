// Archival trigger discipline
//
// The archival logic itself belongs to an external service. This module only
// makes sure the trigger fires at most once per process.

pub mod errors;
pub mod guard;
pub mod trigger;

pub use errors::{ArchiveError, ArchiveResult};
pub use guard::{ArchiveGuard, GuardState, GuardStatus, TriggerOutcome};
pub use trigger::{ArchiveReport, ArchiveTrigger, HttpArchiveTrigger};
