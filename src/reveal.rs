//! One-way reveal tracking for scroll-in content blocks.
//!
//! Each block starts hidden and is marked revealed the first time it
//! sufficiently intersects the viewport. The transition is monotonic: nothing
//! un-reveals a block for the rest of the page session. The tracker is pure
//! state (no DOM handles) so it runs under native `cargo test`; the `page`
//! module feeds it IntersectionObserver entries and applies CSS classes when
//! it reports a transition.

/// Intersection thresholds handed to the observer. Multiple low values make
/// the first crossing hard to miss on fast scrolls.
pub const REVEAL_THRESHOLDS: [f64; 4] = [0.0, 0.05, 0.1, 0.2];

/// Bottom root margin: start revealing 50px before a block reaches the fold.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// One content region eligible for reveal.
#[derive(Debug, Clone)]
pub struct ObservedBlock {
    id: String,
    revealed: bool,
}

impl ObservedBlock {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// Tracks reveal state for all registered blocks.
#[derive(Debug, Default)]
pub struct RevealTracker {
    blocks: Vec<ObservedBlock>,
    degraded: bool,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail-open tracker for hosts without intersection observation: every
    /// block is revealed at registration time. Content must never stay hidden
    /// because a capability is missing.
    pub fn degraded() -> Self {
        Self {
            blocks: Vec::new(),
            degraded: true,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Registers a block. Returns true when the block is revealed right away
    /// (already on screen at registration, or degraded mode), meaning the
    /// "became visible" notification should fire now rather than on a later
    /// intersection event. Re-registering an id is a no-op apart from a
    /// possible pending immediate reveal.
    pub fn observe(&mut self, id: &str, in_viewport: bool) -> bool {
        let reveal_now = self.degraded || in_viewport;
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            if reveal_now && !block.revealed {
                block.revealed = true;
                return true;
            }
            return false;
        }
        self.blocks.push(ObservedBlock {
            id: id.to_string(),
            revealed: reveal_now,
        });
        reveal_now
    }

    /// Feeds one intersection sample. The first qualifying sample (any
    /// positive intersection) reveals the block and returns true; everything
    /// after that, including zero-intersection samples, is a no-op. Unknown
    /// ids are ignored.
    pub fn on_intersection(&mut self, id: &str, ratio: f64, is_intersecting: bool) -> bool {
        if !(is_intersecting || ratio > 0.0) {
            return false;
        }
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) if !block.revealed => {
                block.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Reveals everything still hidden and returns those ids, in registration
    /// order. Used when the observer capability turns out to be missing after
    /// blocks were already registered.
    pub fn reveal_all(&mut self) -> Vec<String> {
        self.degraded = true;
        let mut newly = Vec::new();
        for block in &mut self.blocks {
            if !block.revealed {
                block.revealed = true;
                newly.push(block.id.clone());
            }
        }
        newly
    }

    pub fn is_revealed(&self, id: &str) -> Option<bool> {
        self.blocks.iter().find(|b| b.id == id).map(|b| b.revealed)
    }

    pub fn blocks(&self) -> &[ObservedBlock] {
        &self.blocks
    }
}
