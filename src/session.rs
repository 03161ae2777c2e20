use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;

/// Live user toggles, shared between the UI (writer) and the controller (reader).
///
/// Each flag is independent; nothing needs ordering across them, so relaxed
/// loads and stores are enough.
#[derive(Debug, Default)]
pub struct Toggles {
    translation_enabled: AtomicBool,
    simulate_copy: AtomicBool,
    show_original: AtomicBool,
}

/// Values of all toggles at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleSnapshot {
    pub translation_enabled: bool,
    pub simulate_copy: bool,
    pub show_original: bool,
}

/// Identifies one toggle for UI bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    TranslationEnabled,
    SimulateCopy,
    ShowOriginal,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [
        Toggle::TranslationEnabled,
        Toggle::SimulateCopy,
        Toggle::ShowOriginal,
    ];

    /// Checkbox caption.
    pub fn label(self) -> &'static str {
        match self {
            Toggle::TranslationEnabled => "Open",
            Toggle::SimulateCopy => "Mark",
            Toggle::ShowOriginal => "With original text",
        }
    }

    /// Letter used with Alt as the keyboard shortcut.
    pub fn shortcut(self) -> egui::Key {
        match self {
            Toggle::TranslationEnabled => egui::Key::T,
            Toggle::SimulateCopy => egui::Key::Y,
            Toggle::ShowOriginal => egui::Key::U,
        }
    }
}

impl Toggles {
    pub fn new(initial: ToggleSnapshot) -> Self {
        Self {
            translation_enabled: AtomicBool::new(initial.translation_enabled),
            simulate_copy: AtomicBool::new(initial.simulate_copy),
            show_original: AtomicBool::new(initial.show_original),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(ToggleSnapshot {
            translation_enabled: cfg.translation_enabled,
            simulate_copy: cfg.simulate_copy,
            show_original: cfg.show_original,
        })
    }

    fn flag(&self, toggle: Toggle) -> &AtomicBool {
        match toggle {
            Toggle::TranslationEnabled => &self.translation_enabled,
            Toggle::SimulateCopy => &self.simulate_copy,
            Toggle::ShowOriginal => &self.show_original,
        }
    }

    pub fn get(&self, toggle: Toggle) -> bool {
        self.flag(toggle).load(Ordering::Relaxed)
    }

    pub fn set(&self, toggle: Toggle, on: bool) {
        self.flag(toggle).store(on, Ordering::Relaxed);
    }

    /// Flip a toggle and return its new value.
    pub fn flip(&self, toggle: Toggle) -> bool {
        !self.flag(toggle).fetch_xor(true, Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ToggleSnapshot {
        ToggleSnapshot {
            translation_enabled: self.get(Toggle::TranslationEnabled),
            simulate_copy: self.get(Toggle::SimulateCopy),
            show_original: self.get(Toggle::ShowOriginal),
        }
    }
}

/// Per-process translation state. Owned by a single controller.
#[derive(Debug, Default)]
pub struct Session {
    previous_text: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    /// Record `text` as the latest clipboard value.
    ///
    /// Returns false (and leaves state alone) when it matches the previous one.
    pub fn observe(&mut self, text: &str) -> bool {
        if self.previous_text == text {
            return false;
        }
        self.previous_text.clear();
        self.previous_text.push_str(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_start_from_config_defaults() {
        let toggles = Toggles::from_config(&Config::default());
        assert_eq!(
            toggles.snapshot(),
            ToggleSnapshot { translation_enabled: false, simulate_copy: true, show_original: false }
        );
    }

    #[test]
    fn flip_returns_new_value() {
        let toggles = Toggles::default();
        assert!(toggles.flip(Toggle::ShowOriginal));
        assert!(toggles.get(Toggle::ShowOriginal));
        assert!(!toggles.flip(Toggle::ShowOriginal));
        assert!(!toggles.get(Toggle::ShowOriginal));
        // others untouched
        assert!(!toggles.get(Toggle::TranslationEnabled));
        assert!(!toggles.get(Toggle::SimulateCopy));
    }

    #[test]
    fn shortcuts_are_distinct() {
        let keys: Vec<_> = Toggle::ALL.iter().map(|t| t.shortcut()).collect();
        assert_eq!(keys, vec![egui::Key::T, egui::Key::Y, egui::Key::U]);
    }

    #[test]
    fn session_observe_only_updates_on_change() {
        let mut session = Session::new();
        assert_eq!(session.previous_text(), "");
        assert!(session.observe("hello"));
        assert_eq!(session.previous_text(), "hello");
        assert!(!session.observe("hello"));
        assert!(session.observe("world"));
        assert_eq!(session.previous_text(), "world");
    }
}
