// Native tests for the scroll state machines: reveal monotonicity, fade
// window math, the unlock gate, and throttling under a fake clock.

use shanshui_scroll::fade::{FadeWindow, SectionGeometry, active_section, hero_fade};
use shanshui_scroll::reveal::RevealTracker;
use shanshui_scroll::throttle::{Edge, Throttle};
use shanshui_scroll::unlock::{GateEvent, UnlockGate};

fn geom(top: f64, height: f64) -> SectionGeometry {
    SectionGeometry { top, height }
}

// --- Reveal -------------------------------------------------------------------

#[test]
fn reveal_is_monotonic() {
    let mut tracker = RevealTracker::new();
    tracker.observe("intro", false);
    assert_eq!(tracker.is_revealed("intro"), Some(false));

    assert!(tracker.on_intersection("intro", 0.1, true));
    assert_eq!(tracker.is_revealed("intro"), Some(true));

    // Later events, including zero-intersection ones, never un-reveal.
    assert!(!tracker.on_intersection("intro", 0.0, false));
    assert_eq!(tracker.is_revealed("intro"), Some(true));
}

#[test]
fn reveal_notification_fires_exactly_once() {
    let mut tracker = RevealTracker::new();
    tracker.observe("intro", false);
    let notifications = (0..5)
        .filter(|_| tracker.on_intersection("intro", 0.2, true))
        .count();
    assert_eq!(notifications, 1);
}

#[test]
fn block_on_screen_at_registration_reveals_immediately() {
    let mut tracker = RevealTracker::new();
    assert!(tracker.observe("hero-text", true));
    assert_eq!(tracker.is_revealed("hero-text"), Some(true));
    // No duplicate notification from a later event.
    assert!(!tracker.on_intersection("hero-text", 0.5, true));
}

#[test]
fn re_registration_is_idempotent() {
    let mut tracker = RevealTracker::new();
    assert!(!tracker.observe("intro", false));
    // Registering again while now on screen reveals once.
    assert!(tracker.observe("intro", true));
    assert!(!tracker.observe("intro", true));
    assert_eq!(tracker.blocks().len(), 1);
}

#[test]
fn zero_intersection_does_not_reveal() {
    let mut tracker = RevealTracker::new();
    tracker.observe("intro", false);
    assert!(!tracker.on_intersection("intro", 0.0, false));
    assert_eq!(tracker.is_revealed("intro"), Some(false));
    // Any positive ratio qualifies even without the intersecting flag.
    assert!(tracker.on_intersection("intro", 0.01, false));
}

#[test]
fn degraded_tracker_reveals_everything_at_registration() {
    let mut tracker = RevealTracker::degraded();
    assert!(tracker.observe("a", false));
    assert!(tracker.observe("b", false));
    assert!(tracker.blocks().iter().all(|b| b.is_revealed()));
}

#[test]
fn reveal_all_reports_only_newly_revealed_blocks() {
    let mut tracker = RevealTracker::new();
    tracker.observe("a", true);
    tracker.observe("b", false);
    tracker.observe("c", false);
    assert_eq!(tracker.reveal_all(), vec!["b".to_string(), "c".to_string()]);
    assert!(tracker.is_degraded());
    // Second pass finds nothing left to reveal.
    assert!(tracker.reveal_all().is_empty());
}

// --- Fade ---------------------------------------------------------------------

#[test]
fn fade_window_truth_table() {
    let fade = FadeWindow::default();
    let section = geom(1000.0, 400.0);
    assert!(!fade.is_fading(section, 1000.0));
    assert!(fade.is_fading(section, 1250.0));
    assert!(fade.is_fading(section, 1399.0));
    assert!(!fade.is_fading(section, 1400.0));
    assert!(!fade.is_fading(section, 900.0));
}

#[test]
fn fade_is_reversible() {
    let fade = FadeWindow::default();
    let section = geom(1000.0, 400.0);
    assert!(fade.is_fading(section, 1250.0));
    // Scrolling back up before exiting the section clears the flag.
    assert!(!fade.is_fading(section, 1000.0));
}

#[test]
fn degenerate_height_has_no_fade_window() {
    let fade = FadeWindow::default();
    assert!(!fade.is_fading(geom(1000.0, 0.0), 1000.0));
    assert!(!fade.is_fading(geom(1000.0, -50.0), 1000.0));
}

#[test]
fn fade_start_fraction_is_tunable() {
    let fade = FadeWindow::new(0.25);
    let section = geom(0.0, 1000.0);
    assert!(!fade.is_fading(section, 250.0));
    assert!(fade.is_fading(section, 251.0));
}

#[test]
fn hero_fade_progress_is_clamped() {
    // Hero spans 0..2000px, viewport is 800px: fade runs 800..2000.
    let hero = geom(0.0, 2000.0);
    let before = hero_fade(hero, 800.0, 400.0);
    assert_eq!(before.background, 1.0);
    assert_eq!(before.mask, 0.0);

    let midway = hero_fade(hero, 800.0, 1400.0);
    assert!(midway.background > 0.0 && midway.background < 1.0);
    assert!((midway.background + midway.mask - 1.0).abs() < 1e-9);

    let past = hero_fade(hero, 800.0, 5000.0);
    assert_eq!(past.background, 0.0);
    assert_eq!(past.mask, 1.0);
}

#[test]
fn hero_shorter_than_fade_start_snaps_fully_faded() {
    let hero = geom(0.0, 600.0);
    let res = hero_fade(hero, 800.0, 900.0);
    assert_eq!(res.background, 0.0);
    assert_eq!(res.mask, 1.0);
}

#[test]
fn active_section_picks_last_containing_span() {
    let sections = vec![
        ("home".to_string(), geom(0.0, 1000.0)),
        ("dao".to_string(), geom(1000.0, 800.0)),
        ("fa".to_string(), geom(1800.0, 800.0)),
    ];
    assert_eq!(active_section(&sections, 500.0), Some("home"));
    assert_eq!(active_section(&sections, 1000.0), Some("dao"));
    assert_eq!(active_section(&sections, 2599.0), Some("fa"));
    assert_eq!(active_section(&sections, 2600.0), None);
    // Overlapping spans: the later section wins.
    let overlapping = vec![
        ("dao".to_string(), geom(0.0, 1000.0)),
        ("fa".to_string(), geom(900.0, 800.0)),
    ];
    assert_eq!(active_section(&overlapping, 950.0), Some("fa"));
}

// --- Unlock gate ----------------------------------------------------------------

#[test]
fn duplicate_milestones_count_once() {
    let mut gate = UnlockGate::new();
    assert_eq!(gate.on_milestone("a"), GateEvent::Counted);
    assert_eq!(gate.on_milestone("a"), GateEvent::AlreadyCounted);
    assert_eq!(gate.on_milestone("b"), GateEvent::Counted);
    assert_eq!(gate.count(), 2);
    assert!(!gate.is_unlocked());
    assert_eq!(gate.on_milestone("c"), GateEvent::Unlocked);
    assert_eq!(gate.count(), 3);
    assert!(gate.is_unlocked());
}

#[test]
fn unlock_fires_exactly_once() {
    let mut gate = UnlockGate::new();
    gate.on_milestone("a");
    gate.on_milestone("b");
    assert_eq!(gate.on_milestone("c"), GateEvent::Unlocked);
    // A fourth distinct milestone still counts but never re-fires the unlock.
    assert_eq!(gate.on_milestone("d"), GateEvent::Counted);
    assert_eq!(gate.count(), 4);
}

#[test]
fn reset_restores_locked_and_allows_re_unlock() {
    let mut gate = UnlockGate::new();
    gate.on_milestone("a");
    gate.on_milestone("b");
    gate.on_milestone("c");
    assert!(gate.is_unlocked());

    gate.reset();
    assert!(!gate.is_unlocked());
    assert_eq!(gate.count(), 0);

    // The same milestones unlock again after the reset.
    gate.on_milestone("a");
    gate.on_milestone("b");
    assert_eq!(gate.on_milestone("c"), GateEvent::Unlocked);
}

#[test]
fn gate_never_unlocks_below_threshold() {
    let mut gate = UnlockGate::with_threshold(2);
    assert_eq!(gate.on_milestone("a"), GateEvent::Counted);
    assert!(!gate.is_unlocked());
    assert_eq!(gate.on_milestone("b"), GateEvent::Unlocked);
}

// --- Throttle -------------------------------------------------------------------

#[test]
fn throttle_leading_edge_fires_immediately() {
    let mut throttle = Throttle::new(16.0);
    assert!(throttle.on_event(0.0));
    assert!(!throttle.on_event(5.0));
    assert!(!throttle.on_event(10.0));
    // Window expired: the next event runs on the leading edge again.
    assert!(throttle.on_event(20.0));
}

#[test]
fn throttle_trailing_edge_runs_suppressed_call() {
    let mut throttle = Throttle::new(16.0);
    assert!(throttle.on_event(0.0));
    assert!(!throttle.on_event(5.0));
    // Still inside the window: nothing yet.
    assert!(!throttle.poll(10.0));
    // Window closed: the suppressed call runs once.
    assert!(throttle.poll(16.0));
    assert!(!throttle.poll(17.0));
}

#[test]
fn throttle_without_pending_does_not_fire_trailing() {
    let mut throttle = Throttle::new(16.0);
    assert!(throttle.on_event(0.0));
    // No suppressed event, so the trailing edge stays quiet.
    assert!(!throttle.poll(100.0));
}

#[test]
fn leading_only_throttle_never_fires_trailing() {
    let mut throttle = Throttle::with_edge(16.0, Edge::Leading);
    assert!(throttle.on_event(0.0));
    assert!(!throttle.on_event(5.0));
    assert!(!throttle.poll(32.0));
    assert!(throttle.on_event(32.0));
}

#[test]
fn trailing_only_throttle_defers_first_call() {
    let mut throttle = Throttle::with_edge(16.0, Edge::Trailing);
    assert!(!throttle.on_event(0.0));
    assert!(!throttle.poll(10.0));
    assert!(throttle.poll(16.0));
}
