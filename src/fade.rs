//! Scroll-position fade math for chapters and the hero background.
//!
//! Everything here is stateless recomputation: callers re-read geometry and
//! scroll position at every evaluation, so coalesced or out-of-order scroll
//! events (and layout shifts from a resize) cannot leave stale results
//! behind. Unlike reveal, fading is fully reversible.

/// Fraction of a section's height at which the exit fade begins (the
/// reference page fades from the section midpoint).
pub const DEFAULT_FADE_START_FRACTION: f64 = 0.5;

/// Layout snapshot of one section, in document pixels. Taken fresh per
/// evaluation; never cached across evaluations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionGeometry {
    pub top: f64,
    pub height: f64,
}

/// Computes the binary exit-fade flag for one section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeWindow {
    pub start_fraction: f64,
}

impl Default for FadeWindow {
    fn default() -> Self {
        Self {
            start_fraction: DEFAULT_FADE_START_FRACTION,
        }
    }
}

impl FadeWindow {
    pub fn new(start_fraction: f64) -> Self {
        Self { start_fraction }
    }

    /// True strictly inside (top + height * start_fraction, top + height).
    /// A section with zero or negative height has no fade window.
    pub fn is_fading(&self, geom: SectionGeometry, scroll_top: f64) -> bool {
        if geom.height <= 0.0 {
            return false;
        }
        let start = geom.top + geom.height * self.start_fraction;
        let end = geom.top + geom.height;
        scroll_top > start && scroll_top < end
    }
}

/// Opacity pair for the hero background cross-fade: the background image
/// fades out while the mask fades in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeOpacity {
    pub background: f64,
    pub mask: f64,
}

/// Continuous hero fade: starts one viewport height below the hero top and
/// completes at the hero bottom. Progress is clamped to [0, 1]; a degenerate
/// fade range (hero shorter than one extra viewport) snaps fully faded.
pub fn hero_fade(geom: SectionGeometry, viewport_height: f64, scroll_top: f64) -> FadeOpacity {
    let fade_start = geom.top + viewport_height;
    if scroll_top <= fade_start {
        return FadeOpacity {
            background: 1.0,
            mask: 0.0,
        };
    }
    let fade_range = geom.top + geom.height - fade_start;
    if fade_range <= 0.0 {
        return FadeOpacity {
            background: 0.0,
            mask: 1.0,
        };
    }
    let progress = ((scroll_top - fade_start) / fade_range).min(1.0);
    FadeOpacity {
        background: (1.0 - progress).max(0.0),
        mask: progress,
    }
}

/// Which section the probe position falls inside, for nav highlighting.
/// Sections are scanned in order and the last hit wins, so when spans
/// overlap the later section in document order takes the highlight.
pub fn active_section<'a>(
    sections: &'a [(String, SectionGeometry)],
    probe_pos: f64,
) -> Option<&'a str> {
    let mut current = None;
    for (id, geom) in sections {
        if probe_pos >= geom.top && probe_pos < geom.top + geom.height {
            current = Some(id.as_str());
        }
    }
    current
}
