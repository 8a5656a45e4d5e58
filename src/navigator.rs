//! Catalog position state machine driven by joypad presses and the slideshow timer.

use tracing::debug;

use crate::input::{Button, EdgeDetector, InputMask};

pub const DEFAULT_PAGE_STEP: usize = 5;

const PREV: Button = Button::Left;
const NEXT: Button = Button::Right;
const PAGE_BACK: Button = Button::Down;
const PAGE_FORWARD: Button = Button::Up;
const TOGGLE_SLIDESHOW: Button = Button::Y;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    /// A new index was computed this tick and the image must be reloaded.
    Navigating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Prev,
    Next,
    PageBack,
    PageForward,
    ToggleSlideshow,
    SlideshowAdvance,
}

/// Outcome of a tick that matched a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub action: Action,
    pub from: usize,
    pub to: usize,
}

impl Navigation {
    #[must_use]
    pub fn reload_required(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug)]
pub struct Navigator {
    index: usize,
    last_index: usize,
    page_step: usize,
    slideshow: bool,
    edges: EdgeDetector,
    state: NavState,
}

impl Navigator {
    /// Navigator over a catalog of `len` entries, positioned at the first one.
    ///
    /// # Panics
    /// If `len` is zero.
    pub fn new(len: usize) -> Self {
        Self::with_index(len, 0)
    }

    /// Navigator positioned at `index`, clamped to the last entry.
    ///
    /// # Panics
    /// If `len` is zero; catalogs are never empty.
    pub fn with_index(len: usize, index: usize) -> Self {
        assert!(len > 0, "navigator needs at least one entry");
        let last_index = len - 1;
        Self {
            index: index.min(last_index),
            last_index,
            page_step: DEFAULT_PAGE_STEP,
            slideshow: false,
            edges: EdgeDetector::default(),
            state: NavState::Idle,
        }
    }

    #[must_use]
    pub fn page_step(mut self, step: usize) -> Self {
        self.page_step = step.max(1);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn slideshow_enabled(&self) -> bool {
        self.slideshow
    }

    /// Advance one tick. `held` is the raw joypad snapshot; `timer_fired` is
    /// the slideshow cadence signal for this tick.
    ///
    /// At most one rule applies per tick, checked in order: prev, next,
    /// page-back, page-forward, toggle-slideshow, then slideshow advance.
    pub fn on_tick(&mut self, held: InputMask, timer_fired: bool) -> Option<Navigation> {
        let pressed = self.edges.update(held);
        let from = self.index;

        let mut action = self.apply_buttons(pressed);
        if action.is_none() && self.slideshow && timer_fired && self.index < self.last_index {
            self.index += 1;
            action = Some(Action::SlideshowAdvance);
        }

        let nav = action.map(|action| Navigation {
            action,
            from,
            to: self.index,
        });
        self.state = match nav {
            Some(n) if n.reload_required() => NavState::Navigating,
            _ => NavState::Idle,
        };
        if let Some(n) = &nav {
            debug!(action = ?n.action, from = n.from, to = n.to, slideshow = self.slideshow, "navigate");
        }
        nav
    }

    fn apply_buttons(&mut self, pressed: InputMask) -> Option<Action> {
        if pressed.contains(PREV) && self.index > 0 {
            self.index -= 1;
            return Some(Action::Prev);
        }
        if pressed.contains(NEXT) && self.index < self.last_index {
            self.index += 1;
            return Some(Action::Next);
        }
        if pressed.contains(PAGE_BACK) {
            self.index = self.index.saturating_sub(self.page_step);
            return Some(Action::PageBack);
        }
        if pressed.contains(PAGE_FORWARD) {
            self.index = self.index.saturating_add(self.page_step).min(self.last_index);
            return Some(Action::PageForward);
        }
        if pressed.contains(TOGGLE_SLIDESHOW) {
            self.slideshow = !self.slideshow;
            return Some(Action::ToggleSlideshow);
        }
        None
    }
}

/// Frame counter producing the slideshow cadence.
#[derive(Debug, Clone)]
pub struct SlideshowClock {
    frame: u64,
    interval: u64,
}

impl SlideshowClock {
    pub fn new(interval: u64) -> Self {
        Self {
            frame: 0,
            interval: interval.max(1),
        }
    }

    /// Report whether the current frame is on the cadence, then count it.
    /// Frame 0 (the first tick) is on the cadence.
    pub fn tick(&mut self) -> bool {
        let fired = self.frame % self.interval == 0;
        self.frame = self.frame.wrapping_add(1);
        fired
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(b: Button) -> InputMask {
        InputMask::EMPTY.with(b)
    }

    /// Press `b` on one tick and release it on the next.
    fn tap(nav: &mut Navigator, b: Button) -> Option<Navigation> {
        let out = nav.on_tick(press(b), false);
        nav.on_tick(InputMask::EMPTY, false);
        out
    }

    #[test]
    fn starts_idle_at_zero_without_slideshow() {
        let nav = Navigator::new(7);
        assert_eq!(nav.index(), 0);
        assert_eq!(nav.state(), NavState::Idle);
        assert!(!nav.slideshow_enabled());
    }

    #[test]
    fn prev_and_next_stop_at_the_ends() {
        let mut nav = Navigator::new(3);
        assert!(tap(&mut nav, Button::Left).is_none());
        assert_eq!(nav.index(), 0);
        tap(&mut nav, Button::Right);
        tap(&mut nav, Button::Right);
        assert_eq!(nav.index(), 2);
        assert!(tap(&mut nav, Button::Right).is_none());
        assert_eq!(nav.index(), 2);
        let n = tap(&mut nav, Button::Left).unwrap();
        assert_eq!((n.action, n.from, n.to), (Action::Prev, 2, 1));
    }

    #[test]
    fn page_jumps_snap_to_boundaries() {
        let mut nav = Navigator::with_index(20, 8);
        tap(&mut nav, Button::Down);
        assert_eq!(nav.index(), 3);
        tap(&mut nav, Button::Down);
        assert_eq!(nav.index(), 0);
        tap(&mut nav, Button::Up);
        assert_eq!(nav.index(), 5);
        let mut nav = Navigator::with_index(20, 14);
        tap(&mut nav, Button::Up);
        assert_eq!(nav.index(), 19);
    }

    #[test]
    fn page_back_at_first_entry_does_not_reload() {
        let mut nav = Navigator::new(4);
        let n = nav.on_tick(press(Button::Down), false).unwrap();
        assert_eq!(n.action, Action::PageBack);
        assert!(!n.reload_required());
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut nav = Navigator::with_index(10, 5);
        let held = [Button::Left, Button::Right, Button::Y].into_iter().collect();
        let n = nav.on_tick(held, false).unwrap();
        assert_eq!(n.action, Action::Prev);
        assert_eq!(nav.index(), 4);
        assert!(!nav.slideshow_enabled());
    }

    #[test]
    fn blocked_prev_falls_through_to_next() {
        let mut nav = Navigator::new(3);
        let held = [Button::Left, Button::Right].into_iter().collect();
        assert_eq!(nav.on_tick(held, false).unwrap().action, Action::Next);
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn toggle_does_not_move() {
        let mut nav = Navigator::new(3);
        let n = tap(&mut nav, Button::Y).unwrap();
        assert_eq!(n.action, Action::ToggleSlideshow);
        assert!(!n.reload_required());
        assert!(nav.slideshow_enabled());
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn slideshow_only_advances_on_timer() {
        let mut nav = Navigator::new(3);
        tap(&mut nav, Button::Y);
        assert!(nav.on_tick(InputMask::EMPTY, false).is_none());
        let n = nav.on_tick(InputMask::EMPTY, true).unwrap();
        assert_eq!(n.action, Action::SlideshowAdvance);
        assert_eq!(nav.state(), NavState::Navigating);
        nav.on_tick(InputMask::EMPTY, true);
        assert_eq!(nav.index(), 2);
        assert!(nav.on_tick(InputMask::EMPTY, true).is_none());
        assert_eq!(nav.index(), 2);
    }

    #[test]
    fn buttons_beat_slideshow() {
        let mut nav = Navigator::with_index(10, 5);
        tap(&mut nav, Button::Y);
        let n = nav.on_tick(press(Button::Left), true).unwrap();
        assert_eq!(n.action, Action::Prev);
        assert_eq!(nav.index(), 4);
    }

    #[test]
    fn single_entry_catalog_never_moves() {
        let mut nav = Navigator::new(1);
        for b in [Button::Left, Button::Right, Button::Up, Button::Down] {
            tap(&mut nav, b);
            assert_eq!(nav.index(), 0);
        }
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn custom_page_step() {
        let mut nav = Navigator::new(10).page_step(3);
        tap(&mut nav, Button::Up);
        assert_eq!(nav.index(), 3);
    }

    #[test]
    fn huge_page_step_snaps_to_the_ends() {
        let mut nav = Navigator::with_index(7, 3).page_step(usize::MAX);
        let n = tap(&mut nav, Button::Up).unwrap();
        assert_eq!((n.action, n.to), (Action::PageForward, 6));
        tap(&mut nav, Button::Down);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    #[should_panic(expected = "at least one entry")]
    fn empty_catalog_is_rejected() {
        let _ = Navigator::new(0);
    }

    #[test]
    fn clock_fires_on_first_frame_then_every_interval() {
        let mut clock = SlideshowClock::new(4);
        let fired: Vec<bool> = (0..9).map(|_| clock.tick()).collect();
        assert_eq!(
            fired,
            vec![true, false, false, false, true, false, false, false, true]
        );
        assert_eq!(clock.frame(), 9);
    }
}
