//! Translation pane controller.
//!
//! Consumes watcher notifications one at a time and turns each into at most one
//! translation: optional copy keystroke, clipboard read, size guard,
//! normalization, duplicate suppression, translate, render.

use crate::clipboard::ClipboardSource;
use crate::keystroke::CopyTrigger;
use crate::session::{Session, Toggles};
use crate::text;
use crate::translate::Translator;
use crate::watcher::Notification;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Where rendered text goes.
pub trait DisplaySink {
    fn show(&mut self, text: String);
}

impl DisplaySink for Sender<String> {
    fn show(&mut self, text: String) {
        if self.send(text).is_err() {
            tracing::debug!("display closed, dropping translation");
        }
    }
}

/// What a single notification ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Disabled,
    NoText,
    TooLong,
    Unchanged,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub max_chars: usize,
    /// Pause after the copy keystroke so the target app can fill the clipboard.
    pub copy_settle: Duration,
}

pub struct PaneController {
    session: Session,
    toggles: Arc<Toggles>,
    settings: ControllerSettings,
    clipboard: Box<dyn ClipboardSource>,
    copier: Box<dyn CopyTrigger>,
    translator: Box<dyn Translator>,
    display: Box<dyn DisplaySink>,
}

impl PaneController {
    pub fn new(
        toggles: Arc<Toggles>,
        settings: ControllerSettings,
        clipboard: Box<dyn ClipboardSource>,
        copier: Box<dyn CopyTrigger>,
        translator: Box<dyn Translator>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            session: Session::new(),
            toggles,
            settings,
            clipboard,
            copier,
            translator,
            display,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one "clipboard may have changed" notification.
    pub fn handle_notification(&mut self) -> Outcome {
        let toggles = self.toggles.snapshot();
        if !toggles.translation_enabled {
            return Outcome::Disabled;
        }

        if toggles.simulate_copy {
            match self.copier.trigger_copy() {
                Ok(()) => {
                    if !self.settings.copy_settle.is_zero() {
                        thread::sleep(self.settings.copy_settle);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "copy keystroke failed"),
            }
        }

        let Some(raw) = self.clipboard.read_text() else {
            return Outcome::NoText;
        };
        if !text::within_limit(&raw, self.settings.max_chars) {
            return Outcome::TooLong;
        }

        let normalized = text::normalize(&raw);
        if normalized.is_empty() {
            return Outcome::NoText;
        }
        if !self.session.observe(&normalized) {
            return Outcome::Unchanged;
        }

        match self.translator.translate(&normalized) {
            Ok(translation) => {
                let shown = text::compose_display(&translation, &normalized, toggles.show_original);
                self.display.show(shown);
                Outcome::Rendered
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    chars = normalized.chars().count(),
                    "translation failed"
                );
                Outcome::Failed
            }
        }
    }

    /// Serve notifications until every sender is gone.
    pub fn run(mut self, rx: Receiver<Notification>) {
        tracing::info!("controller running");
        for _notification in rx.iter() {
            let outcome = self.handle_notification();
            tracing::debug!(?outcome, "notification handled");
        }
        tracing::info!(
            last_chars = self.session().previous_text().chars().count(),
            "controller stopped"
        );
    }
}
