//! Shanshui Scroll core crate.
//!
//! Drives a single-page scrolling story site: content blocks reveal once as
//! they enter the viewport, each chapter fades out over the second half of
//! its own height on the way out, and crossing enough milestone regions
//! unlocks a bonus chapter. The state machines (`reveal`, `fade`, `unlock`,
//! `throttle`) are pure Rust and natively testable; all wasm/DOM wiring lives
//! in `page`.

use wasm_bindgen::prelude::*;

pub mod fade;
pub mod page;
pub mod reveal;
pub mod throttle;
pub mod unlock;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Unified entrypoints (called from the host page once the DOM is ready)
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    page::start_page()
}

#[wasm_bindgen]
pub fn reset_easter_egg() -> Result<(), JsValue> {
    page::reset_gate()
}
