use crate::session::{Toggle, Toggles};
use crossbeam_channel::Receiver;
use eframe::egui;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

const WINDOW_TITLE: &str = "☀";
const REPAINT_EVERY: Duration = Duration::from_millis(120);

/// ln of the zoom factor egui-winit reports for one Ctrl+wheel notch
/// (`exp(50pt / 200)`).
const ZOOM_LN_PER_NOTCH: f32 = 0.25;
const NOTCH_EPSILON: f32 = 1e-3;

#[cfg(target_os = "windows")]
const CJK_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\msyh.ttc",
    r"C:\Windows\Fonts\msyh.ttf",
    r"C:\Windows\Fonts\simsun.ttc",
    r"C:\Windows\Fonts\simhei.ttf",
];
#[cfg(target_os = "macos")]
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
];

/// Apply `steps` points to `size`, ignoring steps that would leave it non-positive.
pub fn step_font_size(size: f32, steps: i32) -> f32 {
    let next = size + steps as f32;
    if next > 0.0 {
        next
    } else {
        size
    }
}

/// Turn an egui zoom factor into whole wheel notches, carrying the remainder
/// in `carry` so slow trackpad scrolls still add up.
fn zoom_notches(carry: &mut f32, zoom_delta: f32) -> i32 {
    if zoom_delta <= 0.0 || zoom_delta == 1.0 {
        return 0;
    }
    *carry += zoom_delta.ln() / ZOOM_LN_PER_NOTCH;
    // absorb float noise from exp/ln so a full notch is never 0.99999
    let whole = (*carry + NOTCH_EPSILON.copysign(*carry)).trunc();
    *carry -= whole;
    whole as i32
}

fn install_cjk_font(ctx: &egui::Context) {
    let loaded = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|path| fs::read(path).ok().map(|bytes| (*path, bytes)));
    let Some((path, bytes)) = loaded else {
        tracing::warn!("no CJK font found; translations may render as boxes");
        return;
    };
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
    fonts.families.entry(egui::FontFamily::Proportional).or_default().push("cjk".to_owned());
    fonts.families.entry(egui::FontFamily::Monospace).or_default().push("cjk".to_owned());
    ctx.set_fonts(fonts);
    tracing::info!(path, "loaded CJK font");
}

struct OverlayApp {
    text: String,
    rx: Receiver<String>,
    toggles: Arc<Toggles>,
    font_size: f32,
    zoom_carry: f32,
    fonts_set: bool,
}

impl OverlayApp {
    fn handle_shortcuts(&self, ctx: &egui::Context) {
        for toggle in Toggle::ALL {
            if ctx.input_mut(|i| i.consume_key(egui::Modifiers::ALT, toggle.shortcut())) {
                let on = self.toggles.flip(toggle);
                tracing::debug!(toggle = toggle.label(), on, "toggle via shortcut");
            }
        }
    }

    fn handle_font_zoom(&mut self, ctx: &egui::Context) {
        let notches = zoom_notches(&mut self.zoom_carry, ctx.input(|i| i.zoom_delta()));
        if notches != 0 {
            self.font_size = step_font_size(self.font_size, notches);
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Wake up periodically so we can poll the channel even without user events
        ctx.request_repaint_after(REPAINT_EVERY);
        if !self.fonts_set {
            self.fonts_set = true;
            install_cjk_font(ctx);
        }
        // Keep only the latest translation
        while let Ok(new_text) = self.rx.try_recv() {
            self.text = new_text;
        }
        self.handle_shortcuts(ctx);
        self.handle_font_zoom(ctx);

        egui::TopBottomPanel::top("toggles").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for toggle in Toggle::ALL {
                    let mut on = self.toggles.get(toggle);
                    let resp = ui
                        .checkbox(&mut on, toggle.label())
                        .on_hover_text(format!("Alt+{}", toggle.shortcut().name()));
                    if resp.changed() {
                        self.toggles.set(toggle, on);
                    }
                }
            });
        });

        let surface = egui::Frame::none().fill(egui::Color32::BLACK).inner_margin(8.0);
        egui::CentralPanel::default().frame(surface).show(ctx, |ui| {
            let drag_id = ui.id().with("drag_surface");
            let drag = ui.interact(ui.max_rect(), drag_id, egui::Sense::drag());
            if drag.drag_started_by(egui::PointerButton::Primary) {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .drag_to_scroll(false)
                .show(ui, |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&self.text)
                                .size(self.font_size)
                                .color(egui::Color32::WHITE),
                        )
                        .wrap(true)
                        .selectable(false),
                    );
                });
        });
    }
}

/// Run the overlay event loop on the main thread (blocking).
pub fn run_ui_main_thread(
    rx: Receiver<String>,
    toggles: Arc<Toggles>,
    font_size: f32,
) -> anyhow::Result<()> {
    tracing::info!("starting overlay event loop");
    let app = OverlayApp {
        text: String::new(),
        rx,
        toggles,
        font_size,
        zoom_carry: 0.0,
        fonts_set: false,
    };
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([500.0, 700.0])
            .with_position([100.0, 500.0])
            .with_always_on_top(),
        ..Default::default()
    };
    eframe::run_native(WINDOW_TITLE, native_options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("overlay window error: {}", e))?;
    tracing::info!("overlay event loop exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_steps_up_and_down() {
        assert_eq!(step_font_size(26.0, 1), 27.0);
        assert_eq!(step_font_size(26.0, -3), 23.0);
    }

    #[test]
    fn font_never_reaches_zero() {
        assert_eq!(step_font_size(1.0, -1), 1.0);
        assert_eq!(step_font_size(2.0, -5), 2.0);
        assert_eq!(step_font_size(2.0, -1), 1.0);
    }

    #[test]
    fn one_notch_per_wheel_click() {
        let mut carry = 0.0;
        let notch = ZOOM_LN_PER_NOTCH.exp();
        assert_eq!(zoom_notches(&mut carry, notch), 1);
        assert_eq!(zoom_notches(&mut carry, 1.0 / notch), -1);
        assert_eq!(zoom_notches(&mut carry, 1.0), 0);
    }

    #[test]
    fn small_zoom_deltas_accumulate() {
        let mut carry = 0.0;
        let quarter = (ZOOM_LN_PER_NOTCH / 4.0).exp();
        let total: i32 = (0..8).map(|_| zoom_notches(&mut carry, quarter)).sum();
        assert_eq!(total, 2);
    }
}
