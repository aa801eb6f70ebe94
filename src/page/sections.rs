// Chapter registry for the scroll story page.
// Static descriptors resolved once at startup. A selector that matches
// nothing in the document logs a warning and is skipped; the other chapters
// still initialize.
use crate::fade::DEFAULT_FADE_START_FRACTION;

/// One major chapter with a fade-on-exit treatment.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionDesc {
    pub id: &'static str,
    pub selector: &'static str,
    /// Fraction of the chapter height at which the exit fade begins.
    pub fade_start_fraction: f64,
}

/// The four story chapters, in document order.
pub static SECTIONS: [SectionDesc; 4] = [
    SectionDesc {
        id: "dao",
        selector: ".dao-section",
        fade_start_fraction: DEFAULT_FADE_START_FRACTION,
    },
    SectionDesc {
        id: "fa",
        selector: ".fa-section",
        fade_start_fraction: DEFAULT_FADE_START_FRACTION,
    },
    SectionDesc {
        id: "qi",
        selector: ".qi-section",
        fade_start_fraction: DEFAULT_FADE_START_FRACTION,
    },
    SectionDesc {
        id: "shu",
        selector: ".shu-section",
        fade_start_fraction: DEFAULT_FADE_START_FRACTION,
    },
];

// --- Selectors and attributes the page glue resolves at startup --------------

/// Blocks that reveal on first intersection.
pub static REVEAL_SELECTORS: &str = ".content-section, .scroll-text-block";
/// Attribute carrying the tracker id of a reveal block.
pub static REVEAL_ID_ATTR: &str = "data-reveal-id";

/// Milestone regions counted by the unlock gate.
pub static MILESTONE_SELECTOR: &str = ".buffer-section.scroll-trigger";
/// Attribute naming a milestone region.
pub static MILESTONE_ATTR: &str = "data-buffer";

/// Hero banner and its cross-fading layers.
pub static HERO_SELECTOR: &str = ".hero";
pub static HERO_BACKGROUND_SELECTOR: &str = ".hero-background-layer";
pub static HERO_MASK_SELECTOR: &str = ".hero-fade-mask";

/// Nav highlight inputs.
pub static NAV_SECTION_SELECTORS: &str = ".content-section, .hero";
pub static NAV_LINK_SELECTOR: &str = ".nav-link";
pub static NAVBAR_ID: &str = "navbar";
pub static HOME_SECTION_ID: &str = "home";

/// Bonus chapter unlocked by the gate, and where a reset scrolls back to.
pub static EASTER_EGG_ID: &str = "easter-egg";
pub static RETURN_SECTION_ID: &str = "shu";

// --- CSS classes applied by the glue -----------------------------------------

pub static CLASS_VISIBLE: &str = "visible";
pub static CLASS_FADING: &str = "fading-out";
pub static CLASS_UNLOCKED: &str = "is-unlocked";
pub static CLASS_ACTIVE: &str = "active";
pub static CLASS_SCROLLED: &str = "scrolled";
