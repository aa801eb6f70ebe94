//! DOM glue for the scroll story page.
//!
//! Everything stateful lives in a thread-local `PageState`; browser callbacks
//! (IntersectionObserver entries, scroll events, the animation-frame loop)
//! borrow it, feed the pure state machines in `reveal` / `fade` / `unlock`,
//! and apply the resulting CSS-class and style changes. All layout geometry
//! is re-read at evaluation time so resizes never leave stale measurements
//! behind.
//!
//! Anomalies never propagate to the host page: a missing element or a missing
//! observer capability logs a console warning, disables that one feature, and
//! lets the rest of the page initialize.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, Window, window,
};

use crate::fade::{FadeWindow, SectionGeometry, active_section, hero_fade};
use crate::reveal::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLDS, RevealTracker};
use crate::throttle::Throttle;
use crate::unlock::{GateEvent, UnlockGate};

mod sections;
pub use sections::{SECTIONS, SectionDesc};
use sections::{
    CLASS_ACTIVE, CLASS_FADING, CLASS_SCROLLED, CLASS_UNLOCKED, CLASS_VISIBLE, EASTER_EGG_ID,
    HERO_BACKGROUND_SELECTOR, HERO_MASK_SELECTOR, HERO_SELECTOR, HOME_SECTION_ID,
    MILESTONE_ATTR, MILESTONE_SELECTOR, NAV_LINK_SELECTOR, NAV_SECTION_SELECTORS, NAVBAR_ID,
    RETURN_SECTION_ID, REVEAL_ID_ATTR, REVEAL_SELECTORS,
};

// --- Scroll evaluation cadence -----------------------------------------------

/// Per-pixel fades track the scroll position at roughly frame rate.
pub const FADE_THROTTLE_MS: f64 = 16.0;
/// Nav highlighting is coarse; 100ms is plenty.
pub const HIGHLIGHT_THROTTLE_MS: f64 = 100.0;

/// Probe offset below the navbar when deciding the highlighted section.
const NAV_PROBE_OFFSET_PX: f64 = 100.0;
/// Near the top of the page the home link is highlighted unconditionally.
const TOP_OVERRIDE_PX: f64 = 100.0;
/// Scroll depth past which the navbar switches to its condensed styling.
const NAVBAR_SCROLLED_PX: f64 = 50.0;

// --- Page state ---------------------------------------------------------------

/// One chapter with an active exit-fade treatment.
struct FadeTarget {
    el: HtmlElement,
    window: FadeWindow,
    /// Last applied state, so the class list is only touched on transitions.
    fading: bool,
}

/// Hero banner cross-fade layers.
struct HeroFade {
    section: HtmlElement,
    background: HtmlElement,
    mask: HtmlElement,
}

/// Nav highlight inputs resolved at startup.
struct NavHighlight {
    navbar: HtmlElement,
    links: Vec<Element>,
    sections: Vec<(String, HtmlElement)>,
}

struct PageState {
    reveal: RevealTracker,
    gate: UnlockGate,
    fade_targets: Vec<FadeTarget>,
    hero: Option<HeroFade>,
    nav: Option<NavHighlight>,
    fade_throttle: Throttle,
    highlight_throttle: Throttle,
    /// Keeps the observers (and their observed targets) alive for the page
    /// lifetime; teardown is implicit at page unload.
    observers: Vec<IntersectionObserver>,
}

// RefCell::new isn't const on this toolchain; allow Clippy lint until a const initializer is feasible.
thread_local! {
    static PAGE_STATE: std::cell::RefCell<Option<PageState>> = std::cell::RefCell::new(None);
}

// --- Entry points -------------------------------------------------------------

pub fn start_page() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Register reveal blocks. A block already overlapping the viewport is
    // revealed immediately (scroll restoration, short pages) instead of
    // waiting for its first observer event.
    let viewport_h = viewport_height(&win);
    let mut reveal = RevealTracker::new();
    let reveal_blocks = query_all(&doc, REVEAL_SELECTORS);
    for (i, el) in reveal_blocks.iter().enumerate() {
        let id = if el.id().is_empty() {
            format!("block-{i}")
        } else {
            el.id()
        };
        el.set_attribute(REVEAL_ID_ATTR, &id)?;
        let rect = el.get_bounding_client_rect();
        let in_viewport = rect.top() < viewport_h && rect.bottom() > 0.0;
        if reveal.observe(&id, in_viewport) {
            el.class_list().add_1(CLASS_VISIBLE).ok();
        }
    }

    // Milestone regions for the unlock gate; make sure each carries a name.
    let milestone_blocks = query_all(&doc, MILESTONE_SELECTOR);
    for (i, el) in milestone_blocks.iter().enumerate() {
        if el.get_attribute(MILESTONE_ATTR).is_none() {
            el.set_attribute(MILESTONE_ATTR, &format!("buffer-{i}"))?;
        }
    }

    // Resolve the chapter registry into fade targets once, up front.
    let mut fade_targets = Vec::new();
    for desc in SECTIONS.iter() {
        match resolve_html(&doc, desc.selector) {
            Some(el) => fade_targets.push(FadeTarget {
                el,
                window: FadeWindow::new(desc.fade_start_fraction),
                fading: false,
            }),
            None => warn(&format!(
                "section '{}' not found; exit fade disabled for '{}'",
                desc.selector, desc.id
            )),
        }
    }

    // Hero cross-fade needs all three elements.
    let hero = match (
        resolve_html(&doc, HERO_SELECTOR),
        resolve_html(&doc, HERO_BACKGROUND_SELECTOR),
        resolve_html(&doc, HERO_MASK_SELECTOR),
    ) {
        (Some(section), Some(background), Some(mask)) => Some(HeroFade {
            section,
            background,
            mask,
        }),
        _ => {
            warn("hero layers not found; background fade disabled");
            None
        }
    };

    let nav = match doc
        .get_element_by_id(NAVBAR_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        Some(navbar) => {
            let links = query_all(&doc, NAV_LINK_SELECTOR);
            let nav_sections = query_all(&doc, NAV_SECTION_SELECTORS)
                .into_iter()
                .filter_map(|el| {
                    let id = el.id();
                    if id.is_empty() {
                        return None;
                    }
                    el.dyn_into::<HtmlElement>().ok().map(|h| (id, h))
                })
                .collect();
            Some(NavHighlight {
                navbar,
                links,
                sections: nav_sections,
            })
        }
        None => {
            warn("navbar not found; nav highlight disabled");
            None
        }
    };

    PAGE_STATE.with(|cell| {
        cell.replace(Some(PageState {
            reveal,
            gate: UnlockGate::new(),
            fade_targets,
            hero,
            nav,
            fade_throttle: Throttle::new(FADE_THROTTLE_MS),
            highlight_throttle: Throttle::new(HIGHLIGHT_THROTTLE_MS),
            observers: Vec::new(),
        }))
    });

    install_reveal_observer(&reveal_blocks)?;
    install_milestone_observer(&doc, &milestone_blocks)?;
    install_scroll_listener(&win)?;
    start_scroll_loop();

    // Evaluate once so the page reflects the initial scroll position.
    let scroll = scroll_top(&win);
    let vh = viewport_height(&win);
    PAGE_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            evaluate_fades(state, scroll, vh);
            evaluate_highlight(state, scroll);
        }
    });
    Ok(())
}

/// Relocks the gate, hides the bonus chapter, and scrolls back to the last
/// story chapter. The reader can then earn the unlock again (the unlock
/// notification fires again after a reset).
pub fn reset_gate() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    PAGE_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.gate.reset();
        }
    });

    if let Some(egg) = doc.get_element_by_id(EASTER_EGG_ID) {
        egg.class_list().remove_1(CLASS_UNLOCKED).ok();
    }
    if let Some(target) = doc.get_element_by_id(RETURN_SECTION_ID) {
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(ScrollBehavior::Smooth);
        target.scroll_into_view_with_scroll_into_view_options(&opts);
    }
    web_sys::console::log_1(&"easter egg reset".into());
    Ok(())
}

// --- Observer wiring -----------------------------------------------------------

fn install_reveal_observer(blocks: &[Element]) -> Result<(), JsValue> {
    if blocks.is_empty() {
        return Ok(());
    }
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        PAGE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let target = entry.target();
                    let Some(id) = target.get_attribute(REVEAL_ID_ATTR) else {
                        continue;
                    };
                    if state.reveal.on_intersection(
                        &id,
                        entry.intersection_ratio(),
                        entry.is_intersecting(),
                    ) {
                        target.class_list().add_1(CLASS_VISIBLE).ok();
                    }
                }
            }
        });
    }) as Box<dyn FnMut(js_sys::Array)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin(REVEAL_ROOT_MARGIN);
    let thresholds: js_sys::Array = REVEAL_THRESHOLDS.iter().copied().map(JsValue::from).collect();
    init.set_threshold(&thresholds.into());

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            for el in blocks {
                observer.observe(el);
            }
            callback.forget();
            PAGE_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.observers.push(observer);
                }
            });
        }
        Err(_) => {
            // Fail-open: content must never stay hidden because the host
            // lacks intersection observation.
            warn("IntersectionObserver unavailable; revealing all blocks");
            PAGE_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.reveal.reveal_all();
                }
            });
            for el in blocks {
                el.class_list().add_1(CLASS_VISIBLE).ok();
            }
        }
    }
    Ok(())
}

fn install_milestone_observer(doc: &Document, blocks: &[Element]) -> Result<(), JsValue> {
    if blocks.is_empty() || doc.get_element_by_id(EASTER_EGG_ID).is_none() {
        warn("easter egg markup not found; unlock gate disabled");
        return Ok(());
    }
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        PAGE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let Some(id) = entry.target().get_attribute(MILESTONE_ATTR) else {
                        continue;
                    };
                    match state.gate.on_milestone(&id) {
                        GateEvent::AlreadyCounted => {}
                        GateEvent::Counted => {
                            web_sys::console::log_1(
                                &format!(
                                    "milestone '{}' counted ({}/{})",
                                    id,
                                    state.gate.count(),
                                    state.gate.threshold()
                                )
                                .into(),
                            );
                        }
                        GateEvent::Unlocked => {
                            web_sys::console::log_1(
                                &format!(
                                    "milestone '{}' counted ({}/{}); easter egg unlocked",
                                    id,
                                    state.gate.count(),
                                    state.gate.threshold()
                                )
                                .into(),
                            );
                            if let Some(d) = window().and_then(|w| w.document()) {
                                if let Some(egg) = d.get_element_by_id(EASTER_EGG_ID) {
                                    egg.class_list().add_1(CLASS_UNLOCKED).ok();
                                }
                            }
                        }
                    }
                }
            }
        });
    }) as Box<dyn FnMut(js_sys::Array)>);

    // No early trigger here: a milestone counts when its top enters the viewport.
    let init = IntersectionObserverInit::new();
    init.set_root_margin("0px");
    init.set_threshold(&JsValue::from(0.0));

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            for el in blocks {
                observer.observe(el);
            }
            callback.forget();
            PAGE_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.observers.push(observer);
                }
            });
        }
        Err(_) => {
            // Unlike reveal, the game is not fail-open; it just stays locked.
            warn("IntersectionObserver unavailable; easter egg stays locked");
        }
    }
    Ok(())
}

// --- Scroll wiring -------------------------------------------------------------

fn install_scroll_listener(win: &Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        let now = now_ms();
        PAGE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                let run_fades = state.fade_throttle.on_event(now);
                let run_highlight = state.highlight_throttle.on_event(now);
                if run_fades || run_highlight {
                    if let Some(w) = window() {
                        let scroll = scroll_top(&w);
                        if run_fades {
                            let vh = viewport_height(&w);
                            evaluate_fades(state, scroll, vh);
                        }
                        if run_highlight {
                            evaluate_highlight(state, scroll);
                        }
                    }
                }
            }
        });
    }) as Box<dyn FnMut(web_sys::Event)>);
    win.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Animation-frame loop servicing the trailing edge of both throttles, so the
/// final scroll position of a fling is never dropped.
fn start_scroll_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        PAGE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                let run_fades = state.fade_throttle.poll(ts);
                let run_highlight = state.highlight_throttle.poll(ts);
                if run_fades || run_highlight {
                    if let Some(w) = window() {
                        let scroll = scroll_top(&w);
                        if run_fades {
                            let vh = viewport_height(&w);
                            evaluate_fades(state, scroll, vh);
                        }
                        if run_highlight {
                            evaluate_highlight(state, scroll);
                        }
                    }
                }
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

// --- Evaluation ----------------------------------------------------------------

fn evaluate_fades(state: &mut PageState, scroll: f64, viewport_h: f64) {
    for target in &mut state.fade_targets {
        let fading = target.window.is_fading(geometry_of(&target.el), scroll);
        if fading != target.fading {
            target.fading = fading;
            if fading {
                target.el.class_list().add_1(CLASS_FADING).ok();
            } else {
                target.el.class_list().remove_1(CLASS_FADING).ok();
            }
        }
    }
    if let Some(hero) = &state.hero {
        let opacity = hero_fade(geometry_of(&hero.section), viewport_h, scroll);
        hero.background
            .style()
            .set_property("opacity", &opacity.background.to_string())
            .ok();
        hero.mask
            .style()
            .set_property("opacity", &opacity.mask.to_string())
            .ok();
    }
}

fn evaluate_highlight(state: &mut PageState, scroll: f64) {
    let Some(nav) = state.nav.as_mut() else {
        return;
    };
    let navbar_height = nav.navbar.offset_height() as f64;
    let probe = scroll + navbar_height + NAV_PROBE_OFFSET_PX;
    let geoms: Vec<(String, SectionGeometry)> = nav
        .sections
        .iter()
        .map(|(id, el)| (id.clone(), geometry_of(el)))
        .collect();
    let mut current = active_section(&geoms, probe).map(str::to_owned);
    if scroll < TOP_OVERRIDE_PX {
        current = Some(HOME_SECTION_ID.to_string());
    }
    for link in &nav.links {
        let href = link.get_attribute("href").unwrap_or_default();
        let is_current = current
            .as_deref()
            .is_some_and(|id| href == format!("#{id}"));
        if is_current {
            link.class_list().add_1(CLASS_ACTIVE).ok();
        } else {
            link.class_list().remove_1(CLASS_ACTIVE).ok();
        }
    }
    if scroll > NAVBAR_SCROLLED_PX {
        nav.navbar.class_list().add_1(CLASS_SCROLLED).ok();
    } else {
        nav.navbar.class_list().remove_1(CLASS_SCROLLED).ok();
    }
}

// --- Small DOM helpers ----------------------------------------------------------

fn geometry_of(el: &HtmlElement) -> SectionGeometry {
    SectionGeometry {
        top: el.offset_top() as f64,
        height: el.offset_height() as f64,
    }
}

fn scroll_top(win: &Window) -> f64 {
    win.page_y_offset().unwrap_or(0.0)
}

fn viewport_height(win: &Window) -> f64 {
    win.inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = doc.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(node) = list.item(i) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    out.push(el);
                }
            }
        }
    }
    out
}

fn resolve_html(doc: &Document, selector: &str) -> Option<HtmlElement> {
    doc.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}
