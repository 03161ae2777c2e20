//! Error types for the fallible seams of the overlay.

use thiserror::Error;

/// Errors raised while installing the global mouse watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// The OS refused the input hook (no display server, missing
    /// accessibility permission, ...).
    #[error("global mouse hook unavailable - check display access or accessibility permission")]
    HookUnavailable,

    /// The watcher thread could not be started.
    #[error("failed to spawn watcher thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The watcher thread exited before reporting whether the hook works.
    #[error("watcher thread exited during startup")]
    StartupLost,
}

/// Errors from a translation backend.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("backend returned an empty translation")]
    Empty,

    /// Backend cannot be used with the current configuration.
    #[error("translator not configured: {0}")]
    Setup(String),
}

/// Errors from simulated keyboard input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to initialize keyboard simulation: {0}")]
    InitFailed(String),

    #[error("failed to simulate key: {0}")]
    KeyFailed(String),
}
