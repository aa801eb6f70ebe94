//! Rate limiting for scroll-driven evaluation.
//!
//! Scroll events arrive far faster than the page needs to react. `Throttle`
//! allows at most one run per `wait_ms` window and, on the trailing edge, the
//! last suppressed call still runs once the window closes so the final scroll
//! position is never silently dropped. Timestamps come from the caller
//! (`performance.now()` in the page glue, plain numbers in tests), so no
//! wall-clock timer is involved.

/// Which edges of the suppression window trigger a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
    Both,
}

#[derive(Debug, Clone)]
pub struct Throttle {
    wait_ms: f64,
    edge: Edge,
    last_run_ms: Option<f64>,
    pending: bool,
}

impl Throttle {
    pub fn new(wait_ms: f64) -> Self {
        Self::with_edge(wait_ms, Edge::Both)
    }

    pub fn with_edge(wait_ms: f64, edge: Edge) -> Self {
        Self {
            wait_ms,
            edge,
            last_run_ms: None,
            pending: false,
        }
    }

    /// Registers an event at time `now`. Returns true when the caller should
    /// run immediately: the previous window has expired (or none exists) and
    /// the leading edge is enabled. Suppressed events arm the trailing edge.
    pub fn on_event(&mut self, now: f64) -> bool {
        if self.window_open(now) {
            if self.trailing() {
                self.pending = true;
            }
            return false;
        }
        if self.leading() {
            self.last_run_ms = Some(now);
            self.pending = false;
            return true;
        }
        // Trailing-only: the first event opens a window and defers to its end.
        self.last_run_ms = Some(now);
        self.pending = true;
        false
    }

    /// Trailing edge. Returns true at most once per window, after a window
    /// that suppressed at least one event has closed. Callers poll this from
    /// their frame loop.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.pending && !self.window_open(now) {
            self.last_run_ms = Some(now);
            self.pending = false;
            return true;
        }
        false
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    fn window_open(&self, now: f64) -> bool {
        self.last_run_ms.is_some_and(|t| now - t < self.wait_ms)
    }

    fn leading(&self) -> bool {
        matches!(self.edge, Edge::Leading | Edge::Both)
    }

    fn trailing(&self) -> bool {
        matches!(self.edge, Edge::Trailing | Edge::Both)
    }
}
