// At-most-once archive trigger
//
// The state machine is Idle -> InFlight -> Done, with InFlight falling back to
// Idle when the call fails (or its future is dropped) so a later attempt can
// retry. Only the caller that wins the Idle -> InFlight exchange makes the call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

use super::trigger::ArchiveTrigger;

const IDLE: u8 = 0;
const IN_FLIGHT: u8 = 1;
const DONE: u8 = 2;

/// Observable guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Idle,
    InFlight,
    Done,
}

/// Result of one `trigger_once` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// This call ran the archive trigger
    Fired { archived_count: u64 },
    /// An earlier call already succeeded
    AlreadyDone,
    /// Another call is running the trigger right now
    InFlight,
    /// The trigger failed; the guard stays open for a retry
    Failed(String),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveCompletion {
    pub archived_count: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuardStatus {
    pub state: GuardState,
    #[serde(flatten)]
    pub completion: Option<ArchiveCompletion>,
}

/// Process-wide guard around the archive trigger
pub struct ArchiveGuard {
    state: AtomicU8,
    completion: OnceLock<ArchiveCompletion>,
    trigger: Arc<dyn ArchiveTrigger>,
}

/// Releases the claim back to Idle unless the call succeeded
struct Claim<'a> {
    state: &'a AtomicU8,
    succeeded: bool,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let next = if self.succeeded { DONE } else { IDLE };
        self.state.store(next, Ordering::Release);
    }
}

impl ArchiveGuard {
    pub fn new(trigger: Arc<dyn ArchiveTrigger>) -> Self {
        Self {
            state: AtomicU8::new(IDLE),
            completion: OnceLock::new(),
            trigger,
        }
    }

    /// Run the archive trigger unless it already ran successfully
    pub async fn trigger_once(&self) -> TriggerOutcome {
        if let Err(current) =
            self.state
                .compare_exchange(IDLE, IN_FLIGHT, Ordering::AcqRel, Ordering::Acquire)
        {
            let outcome = if current == DONE {
                TriggerOutcome::AlreadyDone
            } else {
                TriggerOutcome::InFlight
            };
            debug!(?outcome, "Archive trigger skipped");
            return outcome;
        }

        let mut claim = Claim {
            state: &self.state,
            succeeded: false,
        };

        match self.trigger.trigger().await {
            Ok(report) => {
                let completion = ArchiveCompletion {
                    archived_count: report.archived_count,
                    completed_at: Utc::now(),
                };
                // Only the single Idle -> InFlight winner that succeeds gets here
                if self.completion.set(completion).is_err() {
                    debug!("Archive completion already recorded");
                }
                claim.succeeded = true;
                info!(archived_count = report.archived_count, "Archive trigger completed");
                TriggerOutcome::Fired {
                    archived_count: report.archived_count,
                }
            }
            Err(e) => {
                warn!(error = %e, "Archive trigger failed, will retry on next attempt");
                TriggerOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn state(&self) -> GuardState {
        match self.state.load(Ordering::Acquire) {
            IDLE => GuardState::Idle,
            IN_FLIGHT => GuardState::InFlight,
            _ => GuardState::Done,
        }
    }

    pub fn status(&self) -> GuardStatus {
        GuardStatus {
            state: self.state(),
            completion: self.completion.get().copied(),
        }
    }
}
