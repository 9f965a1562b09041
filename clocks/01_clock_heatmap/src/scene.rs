//! Scene module - builds the per-frame display list
//!
//! The whole visible grid is rebuilt on every frame: 43,200 fills in the
//! overview, or the viewport's cells when zoomed. Shapes are in canvas space
//! and painted by `drawing`.

use nannou::prelude::*;
use shared::{correctness, is_correct, seconds_to_time_string, TimeFormat};

use crate::drawing::colors;
use crate::grid::{cells, Cell};
use crate::interaction::ViewState;
use crate::palette::{cell_color, indicator_color};
use crate::viewport::{DisplayMode, RenderConfig, Viewport};

/// Inset of each overview cell, relative to its smaller side
pub const OVERVIEW_PADDING_RATIO: f32 = 0.05;
/// Overview cells smaller than this get no border
pub const MIN_BORDER_CELL: f32 = 3.0;
/// Zoomed cells smaller than this get no grid lines
pub const MIN_GRID_LINE_CELL: f32 = 8.0;
/// Zoomed cells smaller than this are drawn as micro-rects instead of dots
pub const MIN_DOT_CELL: f32 = 4.0;

const BUTTON_WIDTH: f32 = 90.0;
const BUTTON_HEIGHT: f32 = 28.0;
const BUTTON_MARGIN: f32 = 10.0;
const TOOLTIP_WIDTH: f32 = 150.0;
const TOOLTIP_HEIGHT: f32 = 60.0;
const TOOLTIP_OFFSET: f32 = 12.0;

pub const OVERVIEW_HINT: &str = "Click anywhere to zoom in";

/// Axis-aligned rectangle in canvas space (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CanvasRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        let amount = amount.min(self.w / 2.0).min(self.h / 2.0);
        Self::new(
            self.x + amount,
            self.y + amount,
            self.w - 2.0 * amount,
            self.h - 2.0 * amount,
        )
    }
}

/// Outline of a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgba<u8>,
    pub weight: f32,
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: CanvasRect,
        fill: Srgba<u8>,
        stroke: Option<Stroke>,
    },
    RoundedRect {
        rect: CanvasRect,
        radius: f32,
        fill: Srgba<u8>,
        stroke: Option<Stroke>,
    },
    Dot {
        center: Vec2,
        radius: f32,
        fill: Srgba<u8>,
    },
    Line {
        start: Vec2,
        end: Vec2,
        color: Srgba<u8>,
        weight: f32,
    },
    Text {
        text: String,
        center: Vec2,
        width: f32,
        font_size: u32,
        color: Srgba<u8>,
    },
}

/// Ordered display list for one frame
#[derive(Debug, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            shapes: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Location of the fixed "Zoom out" button
pub fn zoom_out_button(config: &RenderConfig) -> CanvasRect {
    CanvasRect::new(
        config.width as f32 - BUTTON_WIDTH - BUTTON_MARGIN,
        BUTTON_MARGIN,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

/// Build the frame for the current view state and live time
pub fn build_scene(view: &ViewState, config: &RenderConfig, current_seconds: u32) -> Scene {
    if view.is_zoomed {
        build_zoomed(view, config, current_seconds)
    } else {
        build_overview(config, current_seconds)
    }
}

fn opaque(color: Srgb<u8>) -> Srgba<u8> {
    srgba(color.red, color.green, color.blue, 255)
}

fn canvas_background(scene: &mut Scene, config: &RenderConfig) {
    scene.push(Shape::Rect {
        rect: CanvasRect::new(0.0, 0.0, config.width as f32, config.height as f32),
        fill: colors::CANVAS_BG,
        stroke: None,
    });
}

fn build_overview(config: &RenderConfig, current_seconds: u32) -> Scene {
    let mut scene = Scene::with_capacity(shared::CYCLE_SECONDS as usize + 3);
    canvas_background(&mut scene, config);

    let cell = config.overview_cell_size();
    let padding = cell.min_element() * OVERVIEW_PADDING_RATIO;
    let with_border = cell.min_element() >= MIN_BORDER_CELL;

    for c in cells() {
        let value = correctness(c.seconds(), current_seconds);
        let rect = CanvasRect::new(c.x as f32 * cell.x, c.y as f32 * cell.y, cell.x, cell.y)
            .inset(padding);

        let (fill, border) = if is_correct(value) {
            (colors::CORRECT_FILL, colors::AMBER)
        } else {
            (opaque(cell_color(value, config.color_scheme)), colors::CELL_BORDER)
        };

        scene.push(Shape::Rect {
            rect,
            fill,
            stroke: with_border.then_some(Stroke {
                color: border,
                weight: 1.0,
            }),
        });
    }

    hint_label(&mut scene, OVERVIEW_HINT);
    scene
}

fn hint_label(scene: &mut Scene, text: &str) {
    let rect = CanvasRect::new(10.0, 10.0, 200.0, 26.0);
    scene.push(Shape::RoundedRect {
        rect,
        radius: 4.0,
        fill: colors::OVERLAY_BG,
        stroke: None,
    });
    scene.push(Shape::Text {
        text: text.to_string(),
        center: rect.center(),
        width: rect.w,
        font_size: 12,
        color: colors::TEXT_PRIMARY,
    });
}

fn build_zoomed(view: &ViewState, config: &RenderConfig, current_seconds: u32) -> Scene {
    let viewport = view.viewport(config);
    let columns = viewport.columns();
    let rows = viewport.rows();
    let mode = viewport.display_mode();

    // body plus label or indicator
    let mut scene = Scene::with_capacity(columns.len() * rows.len() * 2 + 16);
    canvas_background(&mut scene, config);

    for y in rows.clone() {
        for x in columns.clone() {
            let cell = Cell { x, y };
            let value = correctness(cell.seconds(), current_seconds);
            let origin = viewport.canvas_position(vec2(x as f32, y as f32));
            let rect = CanvasRect::new(origin.x, origin.y, viewport.cell.x, viewport.cell.y);
            let body = cell_body(&mut scene, rect, value);

            match mode {
                DisplayMode::Full | DisplayMode::Minimal => {
                    cell_label(&mut scene, body, rect.w, cell, value, mode)
                }
                DisplayMode::ColorOnly => {
                    scene.push(color_only_shape(rect, indicator_color(value, config.color_scheme)))
                }
            }
        }
    }

    if viewport.cell.min_element() >= MIN_GRID_LINE_CELL {
        grid_lines(&mut scene, &viewport, config);
    }

    if let Some(hovered) = view.hovered {
        tooltip(&mut scene, &viewport, config, hovered.cell, hovered.describe(current_seconds));
    }

    zoom_out_overlay(&mut scene, config);
    scene
}

/// Rounded cell background and border, shared by every zoomed display mode
fn cell_body(scene: &mut Scene, rect: CanvasRect, value: f32) -> CanvasRect {
    let correct = is_correct(value);
    let body = rect.inset(1.0);

    let stroke = if correct {
        Stroke {
            color: colors::AMBER,
            weight: 2.0,
        }
    } else {
        let alpha = ((0.2 + 0.6 * value) * 255.0).round() as u8;
        Stroke {
            color: srgba(128, 128, 128, alpha),
            weight: 1.0,
        }
    };

    scene.push(Shape::RoundedRect {
        rect: body,
        radius: body.w.min(body.h) * 0.15,
        fill: if correct {
            colors::CORRECT_FILL
        } else {
            colors::CELL_BG
        },
        stroke: Some(stroke),
    });
    body
}

/// Time label, dark on the white correct body and light on the dark one
fn cell_label(
    scene: &mut Scene,
    body: CanvasRect,
    cell_w: f32,
    cell: Cell,
    value: f32,
    mode: DisplayMode,
) {
    let format = if mode == DisplayMode::Full {
        TimeFormat::Full
    } else {
        TimeFormat::Minimal
    };
    let color = if is_correct(value) {
        colors::CORRECT_TEXT
    } else {
        colors::TEXT_PRIMARY
    };

    scene.push(Shape::Text {
        text: seconds_to_time_string(cell.seconds(), format),
        center: body.center(),
        width: body.w,
        font_size: label_font_size(cell_w),
        color,
    });
}

/// Font size for a cell label, clamped to 8..=10 px
pub fn label_font_size(cell_w: f32) -> u32 {
    (cell_w / 3.5).clamp(8.0, 10.0).round() as u32
}

/// Dot for cells big enough to show one, a filled micro-rect otherwise
pub fn color_only_shape(rect: CanvasRect, color: Srgb<u8>) -> Shape {
    let size = rect.w.min(rect.h);
    if size >= MIN_DOT_CELL {
        Shape::Dot {
            center: rect.center(),
            radius: size * 0.35,
            fill: opaque(color),
        }
    } else {
        Shape::Rect {
            rect,
            fill: opaque(color),
            stroke: None,
        }
    }
}

fn grid_lines(scene: &mut Scene, viewport: &Viewport, config: &RenderConfig) {
    let (w, h) = (config.width as f32, config.height as f32);

    for x in viewport.columns() {
        let px = viewport.canvas_position(vec2(x as f32, 0.0)).x;
        if px > 0.0 && px < w {
            scene.push(Shape::Line {
                start: vec2(px, 0.0),
                end: vec2(px, h),
                color: colors::GRID_LINE,
                weight: 1.0,
            });
        }
    }

    for y in viewport.rows() {
        let py = viewport.canvas_position(vec2(0.0, y as f32)).y;
        if py > 0.0 && py < h {
            scene.push(Shape::Line {
                start: vec2(0.0, py),
                end: vec2(w, py),
                color: colors::GRID_LINE,
                weight: 1.0,
            });
        }
    }
}

fn tooltip(
    scene: &mut Scene,
    viewport: &Viewport,
    config: &RenderConfig,
    cell: Cell,
    lines: [String; 3],
) {
    let anchor = viewport.canvas_position(vec2(cell.x as f32 + 1.0, cell.y as f32 + 1.0));
    let x = (anchor.x + TOOLTIP_OFFSET).clamp(0.0, (config.width as f32 - TOOLTIP_WIDTH).max(0.0));
    let y =
        (anchor.y + TOOLTIP_OFFSET).clamp(0.0, (config.height as f32 - TOOLTIP_HEIGHT).max(0.0));
    let rect = CanvasRect::new(x, y, TOOLTIP_WIDTH, TOOLTIP_HEIGHT);

    scene.push(Shape::RoundedRect {
        rect,
        radius: 4.0,
        fill: colors::TOOLTIP_BG,
        stroke: Some(Stroke {
            color: colors::TOOLTIP_BORDER,
            weight: 1.0,
        }),
    });

    let line_height = TOOLTIP_HEIGHT / 3.0;
    for (i, line) in lines.into_iter().enumerate() {
        scene.push(Shape::Text {
            text: line,
            center: vec2(rect.center().x, y + line_height * (i as f32 + 0.5)),
            width: TOOLTIP_WIDTH - 8.0,
            font_size: 12,
            color: colors::TEXT_PRIMARY,
        });
    }
}

fn zoom_out_overlay(scene: &mut Scene, config: &RenderConfig) {
    let rect = zoom_out_button(config);
    scene.push(Shape::RoundedRect {
        rect,
        radius: 4.0,
        fill: colors::BUTTON_BG,
        stroke: Some(Stroke {
            color: colors::TOOLTIP_BORDER,
            weight: 1.0,
        }),
    });
    scene.push(Shape::Text {
        text: "Zoom out".to_string(),
        center: rect.center(),
        width: rect.w,
        font_size: 12,
        color: colors::TEXT_PRIMARY,
    });
}
