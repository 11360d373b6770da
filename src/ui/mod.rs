//! User interface using egui.
//!
//! Provides the focus legend and controls overlay.

use egui::{Color32, Context, RichText};

use crate::catalog::Catalog;
use crate::controls::CameraDirector;

/// Highlight for the selected body's legend row.
const SELECTED_COLOR: Color32 = Color32::from_rgb(250, 204, 21);

/// UI state and rendering.
pub struct Ui {
    /// Whether the side panel is visible
    pub panel_visible: bool,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            panel_visible: true,
        }
    }

    /// Render the legend. Reads the director's selection; never writes to it.
    pub fn render(&mut self, ctx: &Context, catalog: &Catalog, director: &CameraDirector, fps: f32) {
        // Toggle panel with Tab key
        if ctx.input(|i| i.key_pressed(egui::Key::Tab)) {
            self.panel_visible = !self.panel_visible;
        }

        if !self.panel_visible {
            return;
        }

        egui::SidePanel::left("controls")
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Planet Focus Controls");
                ui.separator();

                for (name, key) in director.keybinds().iter() {
                    let label = catalog
                        .get(name)
                        .map(|body| body.display_name())
                        .unwrap_or_else(|| name.to_string());
                    let selected = director.selected() == Some(name);

                    ui.horizontal(|ui| {
                        ui.label(RichText::new(key.to_string()).monospace().strong());
                        let text = RichText::new(label);
                        ui.label(if selected {
                            text.color(SELECTED_COLOR)
                        } else {
                            text
                        });
                    });
                }

                if director.focus.is_transitioning() {
                    ui.label(RichText::new("Moving...").italics().weak());
                }

                ui.separator();
                ui.label(format!("FPS: {:.1}", fps));
                ui.separator();

                ui.collapsing("Mouse", |ui| {
                    ui.label("Left Drag: Rotate");
                    ui.label("Right Drag: Pan");
                    ui.label("Shift+Drag: Pan");
                    ui.label("Scroll: Zoom");
                });

                ui.collapsing("Keyboard", |ui| {
                    ui.label("1-9: Focus body");
                    ui.label("Arrows: Move");
                    ui.label("+ / -: Zoom");
                    ui.label("Tab: Toggle Panel");
                    ui.label("ESC: Quit");
                });
            });
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}
