//! Viewport module - canvas/grid transforms and per-cell display modes
//!
//! Canvas space has its origin at the top-left corner of the heatmap canvas
//! with y growing downward, measured in pixels. Grid space is measured in
//! cells with the same orientation.

use nannou::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::{GRID_HEIGHT, GRID_WIDTH};
use crate::palette::ColorScheme;

/// Cell width needed to show the full `H:MM:SS` label
pub const MIN_CLOCK_SIZE: f32 = 30.0;
/// Cell height needed to show the full label
pub const MIN_CLOCK_HEIGHT: f32 = MIN_CLOCK_SIZE * 0.75;
/// Cell width needed for the `H:MM` label
pub const MIN_MINIMAL_WIDTH: f32 = 18.0;
/// Cell height needed for the `H:MM` label
pub const MIN_MINIMAL_HEIGHT: f32 = 15.0;

/// Canvas sizes offered by the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    Medium,
    #[default]
    Large,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Small, SizePreset::Medium, SizePreset::Large];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SizePreset::Small => (600, 450),
            SizePreset::Medium => (900, 675),
            SizePreset::Large => (1200, 900),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizePreset::Small => "Small (600×450)",
            SizePreset::Medium => "Medium (900×675)",
            SizePreset::Large => "Large (1200×900)",
        }
    }
}

/// Host-owned render settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    pub color_scheme: ColorScheme,
}

impl RenderConfig {
    pub fn new(width: u32, height: u32, color_scheme: ColorScheme) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            color_scheme,
        }
    }

    pub fn from_preset(preset: SizePreset, color_scheme: ColorScheme) -> Self {
        let (width, height) = preset.dimensions();
        Self::new(width, height, color_scheme)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }

    /// Pixel size of one cell in the overview grid
    pub fn overview_cell_size(&self) -> Vec2 {
        vec2(
            self.width as f32 / GRID_WIDTH as f32,
            self.height as f32 / GRID_HEIGHT as f32,
        )
    }

    /// Grid units per canvas pixel, used to scale drag gestures
    pub fn grid_per_pixel(&self) -> Vec2 {
        grid_size() / self.size()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_preset(SizePreset::default(), ColorScheme::default())
    }
}

/// Size of the grid in cells
pub fn grid_size() -> Vec2 {
    vec2(GRID_WIDTH as f32, GRID_HEIGHT as f32)
}

/// Clamp a grid-space point to the grid bounds (inclusive of the far edge)
pub fn clamp_to_grid(p: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, grid_size())
}

/// Grid position under a canvas point in the overview
pub fn overview_grid_position(canvas_pos: Vec2, config: &RenderConfig) -> Vec2 {
    canvas_pos / config.overview_cell_size()
}

/// Level of detail drawn for a zoomed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DisplayMode {
    /// No text, just a dot or a filled micro-rect
    ColorOnly,
    /// `H:MM`
    Minimal,
    /// `H:MM:SS`
    Full,
}

impl DisplayMode {
    /// Pick the richest mode that fits the measured cell size
    pub fn select(cell_w: f32, cell_h: f32) -> Self {
        if cell_w >= MIN_CLOCK_SIZE && cell_h >= MIN_CLOCK_HEIGHT {
            DisplayMode::Full
        } else if cell_w >= MIN_MINIMAL_WIDTH && cell_h >= MIN_MINIMAL_HEIGHT {
            DisplayMode::Minimal
        } else {
            DisplayMode::ColorOnly
        }
    }
}

/// Visible part of the grid while zoomed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner in grid space
    pub start: Vec2,
    /// Extent in grid units
    pub size: Vec2,
    /// Pixel size of one cell
    pub cell: Vec2,
}

impl Viewport {
    /// Compute the viewport centered on `focus`, kept inside the grid
    pub fn compute(focus: Vec2, zoom_level: f32, config: &RenderConfig) -> Self {
        let canvas = config.size();
        let size = (canvas / zoom_level.max(f32::EPSILON)).min(grid_size());
        let max_start = grid_size() - size;
        let start = (focus - size / 2.0).clamp(Vec2::ZERO, max_start);
        let cell = canvas / size;
        Self { start, size, cell }
    }

    /// Grid position under a canvas point
    pub fn grid_position(&self, canvas_pos: Vec2) -> Vec2 {
        self.start + canvas_pos / self.cell
    }

    /// Canvas position of a grid point
    pub fn canvas_position(&self, grid_pos: Vec2) -> Vec2 {
        (grid_pos - self.start) * self.cell
    }

    /// Column range of cells at least partly visible
    pub fn columns(&self) -> std::ops::Range<u32> {
        visible_range(self.start.x, self.size.x, GRID_WIDTH)
    }

    /// Row range of cells at least partly visible
    pub fn rows(&self) -> std::ops::Range<u32> {
        visible_range(self.start.y, self.size.y, GRID_HEIGHT)
    }

    pub fn display_mode(&self) -> DisplayMode {
        DisplayMode::select(self.cell.x, self.cell.y)
    }
}

fn visible_range(start: f32, extent: f32, limit: u32) -> std::ops::Range<u32> {
    let first = start.floor().max(0.0) as u32;
    let last = ((start + extent).ceil().max(0.0) as u32).min(limit);
    first.min(last)..last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn large() -> RenderConfig {
        RenderConfig::from_preset(SizePreset::Large, ColorScheme::Default)
    }

    #[test]
    fn test_presets() {
        assert_eq!(SizePreset::Small.dimensions(), (600, 450));
        assert_eq!(SizePreset::Medium.dimensions(), (900, 675));
        assert_eq!(SizePreset::Large.dimensions(), (1200, 900));
        assert_eq!(SizePreset::default(), SizePreset::Large);
    }

    #[test]
    fn test_overview_center_maps_to_grid_center() {
        let pos = overview_grid_position(vec2(600.0, 450.0), &large());
        assert_eq!(pos, vec2(120.0, 90.0));
    }

    #[test]
    fn test_viewport_centered() {
        let vp = Viewport::compute(vec2(120.0, 90.0), 10.0, &large());
        assert_eq!(vp.size, vec2(120.0, 90.0));
        assert_eq!(vp.start, vec2(60.0, 45.0));
        assert_eq!(vp.cell, vec2(10.0, 10.0));
        assert_eq!(vp.columns(), 60..180);
        assert_eq!(vp.rows(), 45..135);
    }

    #[test]
    fn test_viewport_clamped_at_edges() {
        let vp = Viewport::compute(vec2(0.0, 0.0), 20.0, &large());
        assert_eq!(vp.start, Vec2::ZERO);

        let vp = Viewport::compute(grid_size(), 20.0, &large());
        assert_eq!(vp.start + vp.size, grid_size());
    }

    #[test]
    fn test_viewport_never_exceeds_grid() {
        let wide = RenderConfig::new(2400, 1800, ColorScheme::Default);
        let vp = Viewport::compute(vec2(10.0, 10.0), 5.0, &wide);
        assert_eq!(vp.size, grid_size());
        assert_eq!(vp.start, Vec2::ZERO);
        assert_eq!(vp.cell, vec2(10.0, 10.0));
    }

    #[test]
    fn test_grid_position_round_trip() {
        let vp = Viewport::compute(vec2(100.0, 50.0), 25.0, &large());
        let grid = vp.grid_position(vec2(310.0, 220.0));
        let back = vp.canvas_position(grid);
        assert!((back - vec2(310.0, 220.0)).length() < 1e-3);
    }

    #[test]
    fn test_display_mode_thresholds() {
        assert_eq!(DisplayMode::select(30.0, 22.5), DisplayMode::Full);
        assert_eq!(DisplayMode::select(30.0, 22.0), DisplayMode::Minimal);
        assert_eq!(DisplayMode::select(18.0, 15.0), DisplayMode::Minimal);
        assert_eq!(DisplayMode::select(17.9, 40.0), DisplayMode::ColorOnly);
        assert_eq!(DisplayMode::select(5.0, 5.0), DisplayMode::ColorOnly);
    }

    #[test]
    fn test_display_mode_monotonic() {
        let mut previous = DisplayMode::ColorOnly;
        for step in 0..400 {
            let w = step as f32 * 0.25;
            let mode = DisplayMode::select(w, w * 0.75);
            assert!(mode >= previous, "downgrade at width {}", w);
            previous = mode;
        }
    }
}
