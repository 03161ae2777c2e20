#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use anyhow::Context;
use std::sync::Arc;
use std::thread;

mod clipboard;
mod config;
mod controller;
mod error;
mod keystroke;
mod logger;
mod session;
mod text;
mod translate;
mod ui;
mod watcher;

use controller::{ControllerSettings, PaneController};

/// Pending "clipboard may have changed" markers; more than a few are redundant.
const NOTIFICATION_QUEUE: usize = 4;

fn main() {
    // Init logger first
    logger::init();
    if let Err(e) = run() {
        tracing::error!("fatal: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cfg = config::Config::load();
    tracing::info!(
        backend = ?cfg.backend,
        source = %cfg.source_lang,
        target = %cfg.target_lang,
        "config loaded"
    );

    let toggles = Arc::new(session::Toggles::from_config(&cfg));
    let translator = translate::from_config(&cfg).context("building translator")?;

    // Channels
    let (notify_tx, notify_rx) =
        crossbeam_channel::bounded::<watcher::Notification>(NOTIFICATION_QUEUE);
    let (display_tx, display_rx) = crossbeam_channel::unbounded::<String>();

    // Controller on its own thread; it alone owns the session
    {
        let toggles = Arc::clone(&toggles);
        let settings = ControllerSettings {
            max_chars: cfg.max_chars,
            copy_settle: cfg.copy_settle(),
        };
        thread::Builder::new()
            .name("translation-controller".into())
            .spawn(move || {
                let controller = PaneController::new(
                    toggles,
                    settings,
                    Box::new(clipboard::SystemClipboard::new()),
                    Box::new(keystroke::CopyKeystroke::new()),
                    translator,
                    Box::new(display_tx),
                );
                controller.run(notify_rx);
            })
            .context("spawning controller thread")?;
    }

    let _watcher =
        watcher::spawn(notify_tx, cfg.poll_interval()).context("starting mouse watcher")?;

    // Run UI on main thread (blocks)
    ui::run_ui_main_thread(display_rx, toggles, cfg.font_size)
}
