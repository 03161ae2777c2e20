//! Global left-button release watcher.
//!
//! Runs on a background thread and emits a payload-free [`Notification`]
//! whenever the left button goes up. The watcher never reads the clipboard;
//! that is the controller's job.
//!
//! On Windows and Linux an `rdev` event hook delivers every release, including
//! touchpad taps whose press and release arrive back to back. On macOS the
//! hook must live on the main thread, so the button state is polled with
//! `device_query` instead; releases shorter than one poll interval are missed
//! there.

use crate::error::WatcherError;
use crossbeam_channel::{Sender, TrySendError};
use std::thread;
use std::time::Duration;

/// "The clipboard may have changed."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification;

pub struct WatcherHandle {
    #[allow(dead_code)]
    thread: thread::JoinHandle<()>,
}

/// Start the watcher thread.
///
/// Blocks until the thread reports whether the OS hook could be installed, so
/// a missing hook surfaces here as an error instead of a silent dead thread.
pub fn spawn(
    tx: Sender<Notification>,
    poll_interval: Duration,
) -> Result<WatcherHandle, WatcherError> {
    let (ready_tx, ready_rx) = crossbeam_channel::bounded::<bool>(1);

    let thread = thread::Builder::new()
        .name("mouse-watcher".into())
        .spawn(move || backend::run(tx, ready_tx, poll_interval))?;

    match backend::await_ready(&ready_rx) {
        Ok(true) => Ok(WatcherHandle { thread }),
        Ok(false) => Err(WatcherError::HookUnavailable),
        Err(_) => Err(WatcherError::StartupLost),
    }
}

/// Queue a notification. Returns false once the consumer has gone away.
fn notify(tx: &Sender<Notification>) -> bool {
    match tx.try_send(Notification) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            // A check is already queued; it will see the same clipboard.
            tracing::trace!("notification queue full, dropping marker");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

#[cfg(not(target_os = "macos"))]
mod backend {
    use super::{notify, Notification};
    use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
    use rdev::{Button, Event, EventType};
    use std::time::Duration;

    /// `rdev::listen` only returns on failure, and does so right away. Silence
    /// for this long means the hook is installed.
    const HOOK_GRACE: Duration = Duration::from_millis(300);

    pub(super) fn is_left_release(event: &EventType) -> bool {
        matches!(event, EventType::ButtonRelease(Button::Left))
    }

    pub(super) fn run(tx: Sender<Notification>, ready_tx: Sender<bool>, _poll_interval: Duration) {
        tracing::info!("mouse watcher hooking input events");
        let mut open = true;
        let result = rdev::listen(move |event: Event| {
            if open && is_left_release(&event.event_type) {
                open = notify(&tx);
            }
        });
        if let Err(e) = result {
            tracing::error!(error = ?e, "mouse hook failed");
            let _ = ready_tx.send(false);
        }
    }

    pub(super) fn await_ready(ready_rx: &Receiver<bool>) -> Result<bool, RecvTimeoutError> {
        match ready_rx.recv_timeout(HOOK_GRACE) {
            Err(RecvTimeoutError::Timeout) => Ok(true),
            other => other,
        }
    }
}

#[cfg(target_os = "macos")]
mod backend {
    use super::{notify, Notification};
    use crossbeam_channel::{Receiver, RecvError, Sender};
    use device_query::{DeviceQuery, DeviceState};
    use std::thread;
    use std::time::Duration;

    /// Index of the left button in `MouseState::button_pressed`.
    const LEFT_BUTTON: usize = 1;

    /// Turns sampled button state into release edges.
    #[derive(Debug, Default)]
    pub(super) struct ReleaseDetector {
        was_pressed: bool,
    }

    impl ReleaseDetector {
        /// Feed one sample; true exactly when the button was just released.
        pub(super) fn observe(&mut self, pressed: bool) -> bool {
            let released = self.was_pressed && !pressed;
            self.was_pressed = pressed;
            released
        }
    }

    pub(super) fn run(tx: Sender<Notification>, ready_tx: Sender<bool>, poll_interval: Duration) {
        let Some(device) = DeviceState::checked_new() else {
            let _ = ready_tx.send(false);
            return;
        };
        let _ = ready_tx.send(true);
        tracing::info!(poll_ms = poll_interval.as_millis() as u64, "mouse watcher polling");

        let mut detector = ReleaseDetector::default();
        loop {
            let mouse = device.get_mouse();
            let pressed = mouse.button_pressed.get(LEFT_BUTTON).copied().unwrap_or(false);
            if detector.observe(pressed) && !notify(&tx) {
                break;
            }
            thread::sleep(poll_interval);
        }
        tracing::info!("mouse watcher stopped");
    }

    pub(super) fn await_ready(ready_rx: &Receiver<bool>) -> Result<bool, RecvError> {
        ready_rx.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_drops_markers_when_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        assert!(notify(&tx));
        assert!(notify(&tx));
        assert_eq!(rx.len(), 1);
        assert_eq!(rx.try_recv(), Ok(Notification));
    }

    #[test]
    fn notify_reports_disconnect() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        assert!(!notify(&tx));
    }

    #[cfg(not(target_os = "macos"))]
    mod hook {
        use super::super::backend::is_left_release;
        use rdev::{Button, EventType};

        fn releases(events: &[EventType]) -> usize {
            events.iter().filter(|e| is_left_release(e)).count()
        }

        #[test]
        fn back_to_back_tap_still_fires() {
            // touchpad tap: press and release with nothing in between
            let tap = [
                EventType::ButtonPress(Button::Left),
                EventType::ButtonRelease(Button::Left),
            ];
            assert_eq!(releases(&tap), 1);
        }

        #[test]
        fn each_release_fires_once() {
            let clicks = [
                EventType::ButtonPress(Button::Left),
                EventType::MouseMove { x: 10.0, y: 10.0 },
                EventType::ButtonRelease(Button::Left),
                EventType::ButtonPress(Button::Left),
                EventType::ButtonRelease(Button::Left),
            ];
            assert_eq!(releases(&clicks), 2);
        }

        #[test]
        fn other_buttons_and_wheel_are_ignored() {
            let noise = [
                EventType::ButtonRelease(Button::Right),
                EventType::ButtonRelease(Button::Middle),
                EventType::ButtonPress(Button::Left),
                EventType::Wheel { delta_x: 0, delta_y: -1 },
            ];
            assert_eq!(releases(&noise), 0);
        }
    }

    #[cfg(target_os = "macos")]
    mod polling {
        use super::super::backend::ReleaseDetector;

        #[test]
        fn detector_fires_once_per_click() {
            let mut d = ReleaseDetector::default();
            let samples = [false, true, true, true, false, false, false];
            let fired: Vec<bool> = samples.iter().map(|&p| d.observe(p)).collect();
            assert_eq!(fired, vec![false, false, false, false, true, false, false]);
        }

        #[test]
        fn detector_counts_separate_clicks() {
            let mut d = ReleaseDetector::default();
            let samples = [true, false, true, false, true, false];
            let count = samples.iter().filter(|&&p| d.observe(p)).count();
            assert_eq!(count, 3);
        }
    }
}
