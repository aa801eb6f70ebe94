//! Scroll-milestone unlock gate for the bonus chapter.
//!
//! Small marker regions ("milestones") sit between the story chapters; each
//! distinct milestone the reader scrolls past counts once toward the unlock.
//! The gate is a two-state machine: LOCKED until enough distinct milestones
//! have been crossed, then UNLOCKED until an explicit reset.

use std::collections::HashSet;

/// Distinct milestones required to unlock.
pub const UNLOCK_THRESHOLD: usize = 3;

/// Outcome of feeding one milestone entry to the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// Milestone was seen before; count unchanged.
    AlreadyCounted,
    /// New milestone counted, gate state unchanged.
    Counted,
    /// New milestone counted and it tipped the gate over the threshold.
    /// Returned exactly once per LOCKED -> UNLOCKED transition.
    Unlocked,
}

#[derive(Debug, Clone)]
pub struct UnlockGate {
    triggered: HashSet<String>,
    unlocked: bool,
    threshold: usize,
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockGate {
    pub fn new() -> Self {
        Self::with_threshold(UNLOCK_THRESHOLD)
    }

    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            triggered: HashSet::new(),
            unlocked: false,
            threshold,
        }
    }

    /// Records entry into a milestone region. Idempotent per id: re-entering
    /// the same region never increases the count. The `Unlocked` event fires
    /// on the call that reaches the threshold and never again without an
    /// intervening [`reset`](Self::reset).
    pub fn on_milestone(&mut self, id: &str) -> GateEvent {
        if !self.triggered.insert(id.to_string()) {
            return GateEvent::AlreadyCounted;
        }
        if !self.unlocked && self.triggered.len() >= self.threshold {
            self.unlocked = true;
            return GateEvent::Unlocked;
        }
        GateEvent::Counted
    }

    /// Back to the initial LOCKED state: clears counted milestones and the
    /// unlocked flag. The only operation that can decrease the count.
    pub fn reset(&mut self) {
        self.triggered.clear();
        self.unlocked = false;
    }

    pub fn count(&self) -> usize {
        self.triggered.len()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
