//! Debounced reorder commit state machine.
//!
//! Storage-location reordering is applied to the cache immediately but
//! pushed to the remote store only after an 800ms quiet period, as one
//! bulk write. From the moment the timer fires until the remote call
//! settles (capped at 1500ms after the fire), inbound invalidation
//! signals are dropped so a stale fetch cannot clobber an order the user
//! just set locally but the remote has not received yet.
//!
//! States and transitions:
//!
//! ```text
//!            reorder                    timer-fire
//!   Idle ─────────────▶ PendingCommit ─────────────▶ Committing
//!    ▲                      │  ▲                        │
//!    │    guard deadline    │  └── reorder (reset) ──┐  │ remote-ack
//!    └── CommittingSettling ◀────────────────────────┴──┘
//! ```
//!
//! A reorder arriving in any phase restarts the debounce window; the
//! guard deadline lapsing in Committing or CommittingSettling returns to
//! Idle lazily on the next observation.

use std::time::Duration;
use tokio::time::Instant;

/// Quiet period after the last reorder before the bulk commit fires.
pub const DEBOUNCE: Duration = Duration::from_millis(800);

/// Hard cap on the reentrancy guard, measured from timer-fire.
pub const SETTLE: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
  /// No reorder pending or in flight.
  Idle,
  /// Cache holds a new order; debounce timer running.
  PendingCommit,
  /// Bulk write issued, remote ack outstanding; guard active.
  Committing,
  /// Remote acked; guard stays active until the settle deadline.
  CommittingSettling,
}

/// Explicit reentrancy state for the reorder path. One instance per
/// engine; constructed fresh so tests get isolated instances.
#[derive(Debug)]
pub struct ReorderState {
  phase: ReorderPhase,
  debounce: Duration,
  settle: Duration,
  /// When the pending commit becomes due.
  commit_at: Option<Instant>,
  /// When the guard stops suppressing invalidations.
  guard_until: Option<Instant>,
}

impl ReorderState {
  pub fn new(debounce: Duration, settle: Duration) -> Self {
    Self {
      phase: ReorderPhase::Idle,
      debounce,
      settle,
      commit_at: None,
      guard_until: None,
    }
  }

  pub fn phase(&self) -> ReorderPhase {
    self.phase
  }

  /// A reorder event: start or reset the quiet-period timer.
  pub fn on_reorder(&mut self, now: Instant) {
    self.phase = ReorderPhase::PendingCommit;
    self.commit_at = Some(now + self.debounce);
    self.guard_until = None;
  }

  /// Deadline the host loop should wake at, if any.
  pub fn deadline(&self) -> Option<Instant> {
    self.commit_at
  }

  /// Whether the quiet period has elapsed and the commit should fire.
  pub fn is_due(&self, now: Instant) -> bool {
    self.phase == ReorderPhase::PendingCommit
      && self.commit_at.is_some_and(|at| now >= at)
  }

  /// Timer-fire: the bulk write is about to be issued.
  pub fn on_commit_start(&mut self, now: Instant) {
    self.phase = ReorderPhase::Committing;
    self.commit_at = None;
    self.guard_until = Some(now + self.settle);
  }

  /// Remote ack: keep the guard up until the settle deadline.
  pub fn on_commit_ack(&mut self, now: Instant) {
    if self.phase == ReorderPhase::Committing {
      if self.guard_expired(now) {
        self.reset();
      } else {
        self.phase = ReorderPhase::CommittingSettling;
      }
    }
  }

  /// Remote rejection: the engine reconciles instead; drop the guard so
  /// that reconciliation (and later invalidations) go through.
  pub fn on_commit_failure(&mut self) {
    self.reset();
  }

  /// Whether an inbound invalidation must be dropped right now.
  ///
  /// A lapsed guard deadline is collapsed to Idle here rather than by a
  /// timer, so the state machine needs no background task.
  pub fn suppresses_invalidation(&mut self, now: Instant) -> bool {
    match self.phase {
      ReorderPhase::Committing | ReorderPhase::CommittingSettling => {
        if self.guard_expired(now) {
          self.reset();
          false
        } else {
          true
        }
      }
      ReorderPhase::Idle | ReorderPhase::PendingCommit => false,
    }
  }

  fn guard_expired(&self, now: Instant) -> bool {
    self.guard_until.map_or(true, |until| now >= until)
  }

  fn reset(&mut self) {
    self.phase = ReorderPhase::Idle;
    self.commit_at = None;
    self.guard_until = None;
  }
}

impl Default for ReorderState {
  fn default() -> Self {
    Self::new(DEBOUNCE, SETTLE)
  }
}
