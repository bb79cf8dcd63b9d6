//! Day/night theme selection.
//!
//! The user picks a [`ThemeMode`]; the visual [`Theme`] is derived from it,
//! and in automatic mode from the local hour as well. Only the mode is
//! persisted.

use std::fmt;
use std::str::FromStr;

use crate::clock::Clock;
use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Auto,
    Day,
    Night,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Day => "day",
            ThemeMode::Night => "night",
        }
    }

    /// auto -> day -> night -> auto
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Day,
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Auto,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Auto => "自适应",
            ThemeMode::Day => "日间",
            ThemeMode::Night => "夜间",
        }
    }

    pub fn toggle_hint(self) -> String {
        format!(
            "当前模式：{} (点击切换至{})",
            self.label(),
            self.next().label()
        )
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownThemeMode(pub String);

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ThemeMode::Auto),
            "day" => Ok(ThemeMode::Day),
            "night" => Ok(ThemeMode::Night),
            other => Err(UnknownThemeMode(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Tech,
    Childlike,
}

impl Theme {
    /// Night runs from 18:00 to 06:00.
    pub fn for_hour(hour: u32) -> Self {
        if hour >= 18 || hour < 6 {
            Theme::Tech
        } else {
            Theme::Childlike
        }
    }

    pub fn for_mode(mode: ThemeMode, hour: u32) -> Self {
        match mode {
            ThemeMode::Auto => Theme::for_hour(hour),
            ThemeMode::Day => Theme::Childlike,
            ThemeMode::Night => Theme::Tech,
        }
    }

    pub fn is_tech(self) -> bool {
        self == Theme::Tech
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Tech => "theme-tech",
            Theme::Childlike => "theme-childlike",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub theme: Theme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn Fn(ThemeState)>;

pub struct ThemeController<S, C> {
    store: S,
    clock: C,
    key: String,
    state: ThemeState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: usize,
}

impl<S: KeyValueStore, C: Clock> ThemeController<S, C> {
    /// Restore the persisted mode, defaulting to automatic.
    pub fn load(store: S, clock: C, key: impl Into<String>) -> Self {
        let key = key.into();
        let mode = match store.get(&key) {
            Ok(Some(raw)) => raw.parse::<ThemeMode>().unwrap_or_else(|UnknownThemeMode(raw)| {
                log::warn!("ignoring unknown theme mode {:?}", raw);
                ThemeMode::Auto
            }),
            Ok(None) => ThemeMode::Auto,
            Err(e) => {
                log::warn!("theme mode unavailable, using auto: {}", e);
                ThemeMode::Auto
            }
        };
        let theme = Theme::for_mode(mode, clock.local_hour());
        Self {
            store,
            clock,
            key,
            state: ThemeState { mode, theme },
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.state.mode
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.persist(mode);
        let next = ThemeState {
            mode,
            theme: Theme::for_mode(mode, self.clock.local_hour()),
        };
        self.apply(next);
    }

    pub fn toggle_mode(&mut self) -> ThemeMode {
        let next = self.state.mode.next();
        self.set_mode(next);
        next
    }

    /// Polling tick: in automatic mode, re-derive the theme from the clock.
    /// Returns whether the theme changed.
    pub fn refresh(&mut self) -> bool {
        if self.state.mode != ThemeMode::Auto {
            return false;
        }
        let theme = Theme::for_hour(self.clock.local_hour());
        if theme == self.state.theme {
            return false;
        }
        self.persist(self.state.mode);
        self.apply(ThemeState {
            mode: self.state.mode,
            theme,
        });
        true
    }

    pub fn subscribe(&mut self, listener: impl Fn(ThemeState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn persist(&self, mode: ThemeMode) {
        if let Err(e) = self.store.set(&self.key, mode.as_str()) {
            log::warn!("theme mode {} not persisted: {}", mode, e);
        }
    }

    fn apply(&mut self, next: ThemeState) {
        if next == self.state {
            return;
        }
        log::debug!(
            "theme {:?}/{:?} -> {:?}/{:?}",
            self.state.mode,
            self.state.theme,
            next.mode,
            next.theme
        );
        self.state = next;
        for (_, listener) in &self.listeners {
            listener(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    const KEY: &str = "app-theme-mode";

    fn controller(hour: u32) -> (ThemeController<MemoryStore, FixedClock>, MemoryStore, FixedClock) {
        let store = MemoryStore::new();
        let clock = FixedClock::at(hour);
        let controller = ThemeController::load(store.clone(), clock.clone(), KEY);
        (controller, store, clock)
    }

    #[test]
    fn night_window_covers_evening_and_early_morning() {
        for hour in (18..24).chain(0..6) {
            assert_eq!(Theme::for_hour(hour), Theme::Tech, "hour {}", hour);
        }
        for hour in 6..18 {
            assert_eq!(Theme::for_hour(hour), Theme::Childlike, "hour {}", hour);
        }
    }

    #[rstest]
    #[case(ThemeMode::Day, 23, Theme::Childlike)]
    #[case(ThemeMode::Night, 12, Theme::Tech)]
    #[case(ThemeMode::Auto, 5, Theme::Tech)]
    #[case(ThemeMode::Auto, 6, Theme::Childlike)]
    #[case(ThemeMode::Auto, 17, Theme::Childlike)]
    #[case(ThemeMode::Auto, 18, Theme::Tech)]
    fn mode_and_hour_pick_theme(#[case] mode: ThemeMode, #[case] hour: u32, #[case] theme: Theme) {
        assert_eq!(Theme::for_mode(mode, hour), theme);
        assert_eq!(Theme::for_mode(mode, hour).is_tech(), theme == Theme::Tech);
    }

    #[test]
    fn toggle_is_a_three_cycle() {
        for start in [ThemeMode::Auto, ThemeMode::Day, ThemeMode::Night] {
            assert_eq!(start.next().next().next(), start);
            assert_ne!(start.next(), start);
        }
        let (mut controller, _, _) = controller(10);
        assert_eq!(controller.toggle_mode(), ThemeMode::Day);
        assert_eq!(controller.toggle_mode(), ThemeMode::Night);
        assert_eq!(controller.toggle_mode(), ThemeMode::Auto);
    }

    #[test]
    fn defaults_to_auto_without_stored_mode() {
        let (controller, _, _) = controller(20);
        assert_eq!(controller.mode(), ThemeMode::Auto);
        assert_eq!(controller.theme(), Theme::Tech);
    }

    #[test]
    fn restores_persisted_mode() {
        let store = MemoryStore::new();
        store.set(KEY, "day").unwrap();
        let controller = ThemeController::load(store, FixedClock::at(22), KEY);
        assert_eq!(controller.mode(), ThemeMode::Day);
        assert_eq!(controller.theme(), Theme::Childlike);
    }

    #[test]
    fn unknown_or_unreadable_mode_falls_back_to_auto() {
        let store = MemoryStore::new();
        store.set(KEY, "sepia").unwrap();
        let controller = ThemeController::load(store, FixedClock::at(9), KEY);
        assert_eq!(controller.mode(), ThemeMode::Auto);

        let mut controller =
            ThemeController::load(MemoryStore::unavailable(), FixedClock::at(9), KEY);
        assert_eq!(controller.mode(), ThemeMode::Auto);
        controller.set_mode(ThemeMode::Night);
        assert_eq!(controller.theme(), Theme::Tech);
    }

    #[test]
    fn set_mode_persists() {
        let (mut controller, store, _) = controller(9);
        controller.set_mode(ThemeMode::Night);
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("night"));
        assert_eq!(controller.theme(), Theme::Tech);

        controller.set_mode(ThemeMode::Auto);
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("auto"));
        assert_eq!(controller.theme(), Theme::Childlike);
    }

    #[test]
    fn refresh_follows_clock_only_in_auto() {
        let (mut controller, _, clock) = controller(17);
        assert_eq!(controller.theme(), Theme::Childlike);

        clock.set_hour(18);
        assert!(controller.refresh());
        assert_eq!(controller.theme(), Theme::Tech);
        assert!(!controller.refresh());

        controller.set_mode(ThemeMode::Day);
        clock.set_hour(23);
        assert!(!controller.refresh());
        assert_eq!(controller.theme(), Theme::Childlike);
    }

    #[test]
    fn subscribers_see_changes_until_unsubscribed() {
        let (mut controller, _, clock) = controller(12);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let id = controller.subscribe(move |state| sink.borrow_mut().push(state));

        controller.set_mode(ThemeMode::Auto);
        controller.set_mode(ThemeMode::Night);
        clock.set_hour(1);
        controller.set_mode(ThemeMode::Auto);
        controller.unsubscribe(id);
        controller.set_mode(ThemeMode::Day);

        assert_eq!(
            *seen.borrow(),
            vec![
                ThemeState {
                    mode: ThemeMode::Night,
                    theme: Theme::Tech
                },
                ThemeState {
                    mode: ThemeMode::Auto,
                    theme: Theme::Tech
                },
            ]
        );
    }

    #[test]
    fn toggle_hint_names_current_and_next() {
        assert_eq!(
            ThemeMode::Auto.toggle_hint(),
            "当前模式：自适应 (点击切换至日间)"
        );
        assert_eq!(
            ThemeMode::Night.toggle_hint(),
            "当前模式：夜间 (点击切换至自适应)"
        );
    }
}
