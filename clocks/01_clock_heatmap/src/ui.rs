//! UI module - egui side panel
//!
//! Live time readout, view status, color scheme and size selectors, the
//! legend for the active scheme and an "About" section.

use nannou::color::Srgb;
use nannou_egui::egui;
use shared::{seconds_to_time_string, TimeFormat};

use crate::interaction::ViewState;
use crate::palette::{cell_color, indicator_color, ColorScheme};
use crate::viewport::SizePreset;

const LEGEND_STEPS: usize = 48;

type ColorFn = fn(f32, ColorScheme) -> Srgb<u8>;

/// Result of side panel interactions
#[derive(Default)]
pub struct SidePanelResult {
    /// Color scheme selection changed
    pub scheme_changed: bool,
    /// Canvas size selection changed
    pub size_changed: bool,
    /// Zoom out button in the panel was pressed
    pub zoom_out: bool,
}

/// Short description of what the canvas is showing
pub fn describe_view(view: &ViewState) -> String {
    if view.is_zoomed {
        format!(
            "Zoomed {:.0}× at ({:.0}, {:.0})",
            view.zoom_level, view.zoom_position.x, view.zoom_position.y
        )
    } else {
        "Overview of all 43,200 clocks".to_string()
    }
}

/// Draw the side panel with all controls
pub fn draw_side_panel(
    ctx: &egui::Context,
    width: f32,
    current_seconds: u32,
    view: &ViewState,
    color_scheme: &mut ColorScheme,
    size: &mut SizePreset,
    show_about: &mut bool,
) -> SidePanelResult {
    let mut result = SidePanelResult::default();

    egui::SidePanel::right("side_panel")
        .resizable(false)
        .default_width(width)
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ui.heading("Current Time");
            ui.add_space(5.0);
            ui.label(
                egui::RichText::new(seconds_to_time_string(current_seconds, TimeFormat::Full))
                    .size(32.0)
                    .color(egui::Color32::from_rgb(245, 230, 211)),
            );
            ui.label(
                egui::RichText::new(describe_view(view))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(166, 144, 128)),
            );
            if view.is_zoomed && ui.button("Zoom out").clicked() {
                result.zoom_out = true;
            }

            ui.add_space(15.0);
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(10.0);

                    ui.heading("Color Scheme");
                    ui.add_space(5.0);
                    for scheme in ColorScheme::ALL {
                        if ui
                            .selectable_label(*color_scheme == scheme, scheme.label())
                            .clicked()
                            && *color_scheme != scheme
                        {
                            *color_scheme = scheme;
                            result.scheme_changed = true;
                        }
                    }

                    ui.add_space(8.0);
                    draw_legend(ui, *color_scheme);

                    ui.add_space(15.0);
                    ui.separator();
                    ui.add_space(10.0);

                    ui.heading("Size");
                    ui.add_space(5.0);
                    for preset in SizePreset::ALL {
                        if ui.selectable_label(*size == preset, preset.label()).clicked()
                            && *size != preset
                        {
                            *size = preset;
                            result.size_changed = true;
                        }
                    }

                    ui.add_space(15.0);
                    ui.separator();
                    ui.add_space(10.0);

                    ui.horizontal(|ui| {
                        ui.heading("About");
                        if ui.small_button(if *show_about { "▼" } else { "▶" }).clicked() {
                            *show_about = !*show_about;
                        }
                    });
                    if *show_about {
                        ui.add_space(5.0);
                        draw_about(ui);
                    }

                    ui.add_space(10.0);
                });
        });

    result
}

/// Gradient strip from "half a day off" to "right now"
fn draw_legend(ui: &mut egui::Ui, scheme: ColorScheme) {
    for (label, color_fn) in [
        ("Cells", cell_color as ColorFn),
        ("Indicators", indicator_color as ColorFn),
    ] {
        ui.label(
            egui::RichText::new(label)
                .size(11.0)
                .color(egui::Color32::from_rgb(140, 130, 120)),
        );

        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 12.0),
            egui::Sense::hover(),
        );
        let step_w = rect.width() / LEGEND_STEPS as f32;
        let painter = ui.painter();
        for i in 0..LEGEND_STEPS {
            let c = i as f32 / (LEGEND_STEPS - 1) as f32;
            let color = color_fn(c, scheme);
            let x = rect.left() + i as f32 * step_w;
            painter.rect_filled(
                egui::Rect::from_min_size(egui::pos2(x, rect.top()), egui::vec2(step_w + 0.5, 12.0)),
                0.0,
                egui::Color32::from_rgb(color.red, color.green, color.blue),
            );
        }
    }

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("6 h off").size(10.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new("right now").size(10.0));
        });
    });
}

fn draw_about(ui: &mut egui::Ui) {
    let body = egui::Color32::from_rgb(180, 175, 170);
    for paragraph in [
        "Every cell is a clock stuck at one second of the 12-hour dial: \
         240 columns × 180 rows cover all 43,200 of them, left to right, \
         top to bottom.",
        "Color shows how close each stuck clock is to the real time. White \
         cells are within 21 seconds; the exact match sits among them.",
        "Click to zoom in, click again to zoom further. Drag, scroll or use \
         the arrow keys to pan. Ctrl + scroll or +/- changes zoom, Esc \
         returns to the overview.",
    ] {
        ui.label(egui::RichText::new(paragraph).size(11.0).color(body));
        ui.add_space(4.0);
    }
}
