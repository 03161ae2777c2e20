//! Simulated copy keystroke sent to the focused application.

use crate::error::InputError;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

/// Something that can ask the focused application to copy its selection.
pub trait CopyTrigger {
    fn trigger_copy(&mut self) -> Result<(), InputError>;
}

/// `enigo`-backed copy chord: Cmd+C on macOS, Ctrl+C elsewhere.
#[derive(Default)]
pub struct CopyKeystroke {
    enigo: Option<Enigo>,
}

impl CopyKeystroke {
    pub fn new() -> Self {
        Self::default()
    }

    fn enigo(&mut self) -> Result<&mut Enigo, InputError> {
        if self.enigo.is_none() {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| InputError::InitFailed(e.to_string()))?;
            self.enigo = Some(enigo);
        }
        self.enigo
            .as_mut()
            .ok_or_else(|| InputError::InitFailed("keyboard handle missing".into()))
    }
}

impl CopyTrigger for CopyKeystroke {
    fn trigger_copy(&mut self) -> Result<(), InputError> {
        #[cfg(target_os = "macos")]
        let modifier = Key::Meta;
        #[cfg(not(target_os = "macos"))]
        let modifier = Key::Control;

        let enigo = self.enigo()?;
        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| InputError::KeyFailed(e.to_string()))?;
        let clicked = enigo
            .key(Key::Unicode('c'), Direction::Click)
            .map_err(|e| InputError::KeyFailed(e.to_string()));
        // Always release the modifier, even if the click failed.
        let released = enigo
            .key(modifier, Direction::Release)
            .map_err(|e| InputError::KeyFailed(e.to_string()));
        clicked.and(released)
    }
}
