//! Drawing module - paints a `Scene` onto the nannou canvas
//!
//! Scenes are built in canvas space (top-left origin, y down); nannou draws
//! in window space (centered origin, y up). `CanvasLayout` converts between
//! the two and masks whatever spills past the canvas edges.

use nannou::prelude::*;

use crate::scene::{CanvasRect, Scene, Shape};
use crate::viewport::RenderConfig;

/// Color palette for the heatmap chrome
pub mod colors {
    use nannou::color::Alpha;
    use nannou::prelude::*;

    const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Srgba<u8> {
        Alpha {
            color: Srgb {
                red,
                green,
                blue,
                standard: std::marker::PhantomData,
            },
            alpha,
        }
    }

    /// Window background around the canvas
    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 24,
        green: 24,
        blue: 28,
        standard: std::marker::PhantomData,
    };

    /// Heatmap canvas backdrop
    pub const CANVAS_BG: Srgba<u8> = rgba(8, 8, 10, 255);

    /// Near-black body of a zoomed cell
    pub const CELL_BG: Srgba<u8> = rgba(20, 20, 20, 255);

    /// Fill of a cell showing the right time
    pub const CORRECT_FILL: Srgba<u8> = rgba(255, 255, 255, 255);

    /// Label on a correct cell
    pub const CORRECT_TEXT: Srgba<u8> = rgba(0, 0, 0, 255);

    /// Border of a correct cell
    pub const AMBER: Srgba<u8> = rgba(255, 179, 71, 255);

    /// Border of an overview cell
    pub const CELL_BORDER: Srgba<u8> = rgba(0, 0, 0, 80);

    /// Lines between zoomed cells
    pub const GRID_LINE: Srgba<u8> = rgba(255, 255, 255, 24);

    /// Backing of the instructional label
    pub const OVERLAY_BG: Srgba<u8> = rgba(0, 0, 0, 170);

    pub const TOOLTIP_BG: Srgba<u8> = rgba(32, 34, 40, 235);
    pub const TOOLTIP_BORDER: Srgba<u8> = rgba(120, 120, 120, 200);
    pub const BUTTON_BG: Srgba<u8> = rgba(44, 46, 52, 230);

    /// Text primary
    pub const TEXT_PRIMARY: Srgba<u8> = rgba(220, 215, 210, 255);
}

/// Placement of the canvas inside the window
#[derive(Debug, Clone, Copy)]
pub struct CanvasLayout {
    /// Window-space x of the canvas' left edge
    pub left: f32,
    /// Window-space y of the canvas' top edge
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasLayout {
    /// Center the canvas in the window area left of the side panel
    pub fn calculate(window_rect: Rect, side_panel_width: f32, config: &RenderConfig) -> Self {
        let width = config.width as f32;
        let height = config.height as f32;
        let area_center_x = (window_rect.left() + window_rect.right() - side_panel_width) / 2.0;
        let area_center_y = window_rect.y();

        Self {
            left: area_center_x - width / 2.0,
            top: area_center_y + height / 2.0,
            width,
            height,
        }
    }

    /// Window point to canvas point
    pub fn to_canvas(&self, p: Point2) -> Vec2 {
        vec2(p.x - self.left, self.top - p.y)
    }

    /// Canvas point to window point
    pub fn to_window(&self, p: Vec2) -> Point2 {
        pt2(self.left + p.x, self.top - p.y)
    }

    /// Whether a window point falls on the canvas
    pub fn contains(&self, p: Point2) -> bool {
        let c = self.to_canvas(p);
        c.x >= 0.0 && c.x <= self.width && c.y >= 0.0 && c.y <= self.height
    }

    fn rect_center(&self, rect: &CanvasRect) -> Point2 {
        self.to_window(rect.center())
    }
}

/// Paint every shape of the scene, then mask the canvas margins
pub fn draw_scene(draw: &Draw, layout: &CanvasLayout, scene: &Scene, window_rect: Rect) {
    for shape in &scene.shapes {
        draw_shape(draw, layout, shape);
    }
    draw_canvas_mask(draw, layout, window_rect);
}

fn draw_shape(draw: &Draw, layout: &CanvasLayout, shape: &Shape) {
    match shape {
        Shape::Rect { rect, fill, stroke } => {
            let center = layout.rect_center(rect);
            match stroke {
                Some(stroke) => {
                    draw.rect()
                        .xy(center)
                        .w_h(rect.w, rect.h)
                        .color(*fill)
                        .stroke(stroke.color)
                        .stroke_weight(stroke.weight);
                }
                None => {
                    draw.rect().xy(center).w_h(rect.w, rect.h).color(*fill);
                }
            }
        }
        Shape::RoundedRect {
            rect,
            radius,
            fill,
            stroke,
        } => {
            let points = rounded_rect_points(layout, rect, *radius);
            match stroke {
                Some(stroke) => {
                    draw.polygon()
                        .color(*fill)
                        .stroke(stroke.color)
                        .stroke_weight(stroke.weight)
                        .points(points);
                }
                None => {
                    draw.polygon().color(*fill).points(points);
                }
            }
        }
        Shape::Dot {
            center,
            radius,
            fill,
        } => {
            draw.ellipse()
                .xy(layout.to_window(*center))
                .radius(*radius)
                .color(*fill);
        }
        Shape::Line {
            start,
            end,
            color,
            weight,
        } => {
            draw.line()
                .start(layout.to_window(*start))
                .end(layout.to_window(*end))
                .color(*color)
                .weight(*weight);
        }
        Shape::Text {
            text,
            center,
            width,
            font_size,
            color,
        } => {
            draw.text(text)
                .xy(layout.to_window(*center))
                .color(*color)
                .font_size(*font_size)
                .w(*width);
        }
    }
}

const CORNER_SEGMENTS: usize = 4;

/// Outline of a rounded rectangle in window space
fn rounded_rect_points(layout: &CanvasLayout, rect: &CanvasRect, radius: f32) -> Vec<Point2> {
    let r = radius.clamp(0.0, rect.w.min(rect.h) / 2.0);
    let center = layout.rect_center(rect);
    let half = vec2(rect.w / 2.0 - r, rect.h / 2.0 - r);

    // Corner centers counter-clockwise from top-right, with their start angle
    let corners = [
        (vec2(half.x, half.y), 0.0),
        (vec2(-half.x, half.y), PI / 2.0),
        (vec2(-half.x, -half.y), PI),
        (vec2(half.x, -half.y), PI * 1.5),
    ];

    let mut points = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS + 1));
    for (offset, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + (PI / 2.0) * step as f32 / CORNER_SEGMENTS as f32;
            points.push(center + offset + vec2(angle.cos(), angle.sin()) * r);
        }
    }
    points
}

/// Cover the window outside the canvas so partial cells don't spill over
fn draw_canvas_mask(draw: &Draw, layout: &CanvasLayout, window_rect: Rect) {
    let right = layout.left + layout.width;
    let bottom = layout.top - layout.height;

    let bands = [
        // left
        Rect::from_corners(
            pt2(window_rect.left(), window_rect.bottom()),
            pt2(layout.left, window_rect.top()),
        ),
        // right
        Rect::from_corners(
            pt2(right, window_rect.bottom()),
            pt2(window_rect.right(), window_rect.top()),
        ),
        // top
        Rect::from_corners(pt2(layout.left, layout.top), pt2(right, window_rect.top())),
        // bottom
        Rect::from_corners(pt2(layout.left, window_rect.bottom()), pt2(right, bottom)),
    ];

    for band in bands {
        if band.w() > 0.0 && band.h() > 0.0 {
            draw.rect().xy(band.xy()).wh(band.wh()).color(colors::BACKGROUND);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorScheme;
    use crate::viewport::SizePreset;

    fn layout() -> CanvasLayout {
        let config = RenderConfig::from_preset(SizePreset::Small, ColorScheme::Default);
        let window = Rect::from_w_h(1000.0, 600.0);
        CanvasLayout::calculate(window, 300.0, &config)
    }

    #[test]
    fn test_canvas_centered_left_of_panel() {
        let layout = layout();
        // Area spans x in [-500, 200], centered at -150
        assert_eq!(layout.left, -450.0);
        assert_eq!(layout.top, 225.0);
    }

    #[test]
    fn test_window_canvas_round_trip() {
        let layout = layout();
        let window = pt2(-100.0, 40.0);
        let canvas = layout.to_canvas(window);
        assert_eq!(canvas, vec2(350.0, 185.0));
        assert_eq!(layout.to_window(canvas), window);
    }

    #[test]
    fn test_contains() {
        let layout = layout();
        assert!(layout.contains(pt2(-450.0, 225.0)));
        assert!(layout.contains(pt2(150.0, -225.0)));
        assert!(!layout.contains(pt2(151.0, 0.0)));
        assert!(!layout.contains(pt2(0.0, 226.0)));
    }

    #[test]
    fn test_rounded_rect_points_stay_inside() {
        let layout = layout();
        let rect = CanvasRect::new(10.0, 10.0, 40.0, 30.0);
        let points = rounded_rect_points(&layout, &rect, 6.0);
        assert_eq!(points.len(), 4 * (CORNER_SEGMENTS + 1));

        let min = layout.to_window(vec2(10.0, 40.0));
        let max = layout.to_window(vec2(50.0, 10.0));
        for p in points {
            assert!(p.x >= min.x - 1e-3 && p.x <= max.x + 1e-3);
            assert!(p.y >= min.y - 1e-3 && p.y <= max.y + 1e-3);
        }
    }
}
