//! Interaction module - zoom, pan, hover and drag state
//!
//! All view mutations go through [`ViewState`]. Every handler returns whether
//! the view changed so the caller can decide what to log. Positions passed in
//! are canvas-space pixels (see `viewport`).

use nannou::prelude::*;
use shared::{correctness, seconds_to_time_string, TimeFormat};

use crate::grid::Cell;
use crate::scene::zoom_out_button;
use crate::viewport::{clamp_to_grid, grid_size, overview_grid_position, RenderConfig, Viewport};

pub const MIN_ZOOM: f32 = 5.0;
pub const MAX_ZOOM: f32 = 40.0;
pub const DEFAULT_ZOOM: f32 = 10.0;
/// Zoom added by clicking while already zoomed
pub const CLICK_ZOOM_STEP: f32 = 5.0;
/// Zoom added or removed by keys and modified wheel events
pub const ZOOM_STEP: f32 = 2.0;
/// Grid units moved by one arrow key press
pub const PAN_STEP: f32 = 5.0;
/// Pointer travel (pixels) below which a press and release count as a click
pub const CLICK_SLOP: f32 = 4.0;

/// Keys the heatmap reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
    Escape,
}

/// Coarse interaction state derived from [`ViewState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    ZoomedViewing,
    ZoomedDragging,
}

/// Clock cell under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoveredClock {
    pub cell: Cell,
    pub seconds: u32,
}

impl HoveredClock {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            seconds: cell.seconds(),
        }
    }

    /// Tooltip lines: coordinate, time, correctness percentage
    pub fn describe(&self, current_seconds: u32) -> [String; 3] {
        [
            format!("({}, {})", self.cell.x, self.cell.y),
            seconds_to_time_string(self.seconds, TimeFormat::Full),
            format!(
                "{:.1}% correct",
                correctness(self.seconds, current_seconds) * 100.0
            ),
        ]
    }
}

/// View state owned by the heatmap
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub is_zoomed: bool,
    /// Focal point in grid space
    pub zoom_position: Vec2,
    /// Pixels per cell before viewport clamping
    pub zoom_level: f32,
    pub hovered: Option<HoveredClock>,
    pub is_dragging: bool,
    /// Canvas-space anchor of the current drag
    pub drag_start: Vec2,
    /// Where the current press started, for click detection
    press_origin: Option<Vec2>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            is_zoomed: false,
            zoom_position: grid_size() / 2.0,
            zoom_level: DEFAULT_ZOOM,
            hovered: None,
            is_dragging: false,
            drag_start: Vec2::ZERO,
            press_origin: None,
        }
    }
}

impl ViewState {
    /// Zoomed view centered on `position`, with both values clamped
    #[cfg(test)]
    pub(crate) fn zoomed_at(position: Vec2, level: f32) -> Self {
        Self {
            is_zoomed: true,
            zoom_position: clamp_to_grid(position),
            zoom_level: clamp_zoom(level),
            ..Self::default()
        }
    }

    pub fn state(&self) -> InteractionState {
        match (self.is_zoomed, self.is_dragging) {
            (false, _) => InteractionState::Idle,
            (true, false) => InteractionState::ZoomedViewing,
            (true, true) => InteractionState::ZoomedDragging,
        }
    }

    pub fn viewport(&self, config: &RenderConfig) -> Viewport {
        Viewport::compute(self.zoom_position, self.zoom_level, config)
    }

    /// Grid position under a canvas point for the current render mode
    pub fn grid_position(&self, canvas_pos: Vec2, config: &RenderConfig) -> Vec2 {
        if self.is_zoomed {
            self.viewport(config).grid_position(canvas_pos)
        } else {
            overview_grid_position(canvas_pos, config)
        }
    }

    /// Click handling: zoom in, zoom further, or leave via the button
    pub fn click(&mut self, canvas_pos: Vec2, config: &RenderConfig) -> bool {
        if !self.is_zoomed {
            let target = self.grid_position(canvas_pos, config).floor();
            self.is_zoomed = true;
            self.zoom_level = DEFAULT_ZOOM;
            self.zoom_position = clamp_to_grid(target);
            tracing::debug!(x = self.zoom_position.x, y = self.zoom_position.y, "zoomed in");
            return true;
        }

        if zoom_out_button(config).contains(canvas_pos) {
            return self.zoom_out();
        }

        let target = self.grid_position(canvas_pos, config).floor();
        self.zoom_position = clamp_to_grid(target);
        self.zoom_level = clamp_zoom(self.zoom_level + CLICK_ZOOM_STEP);
        self.hovered = None;
        tracing::debug!(
            x = self.zoom_position.x,
            y = self.zoom_position.y,
            level = self.zoom_level,
            "zoomed further"
        );
        true
    }

    /// Return to the overview
    pub fn zoom_out(&mut self) -> bool {
        let changed = self.is_zoomed || self.hovered.is_some() || self.is_dragging;
        self.is_zoomed = false;
        self.hovered = None;
        self.is_dragging = false;
        self.press_origin = None;
        if changed {
            tracing::debug!("zoomed out");
        }
        changed
    }

    pub fn pointer_down(&mut self, canvas_pos: Vec2, config: &RenderConfig) -> bool {
        self.press_origin = Some(canvas_pos);
        if !self.is_zoomed || zoom_out_button(config).contains(canvas_pos) {
            return false;
        }
        self.is_dragging = true;
        self.drag_start = canvas_pos;
        true
    }

    pub fn pointer_move(&mut self, canvas_pos: Vec2, config: &RenderConfig) -> bool {
        if !self.is_zoomed {
            return self.hovered.take().is_some();
        }

        if self.is_dragging {
            let delta = canvas_pos - self.drag_start;
            self.drag_start = canvas_pos;
            return self.pan(-delta * config.grid_per_pixel());
        }

        let grid = self.grid_position(canvas_pos, config);
        let hovered = Cell::at(grid.x, grid.y).map(HoveredClock::new);
        if hovered == self.hovered {
            return false;
        }
        self.hovered = hovered;
        true
    }

    /// Ends a drag; a release close to the press point is also a click
    pub fn pointer_up(&mut self, canvas_pos: Vec2, config: &RenderConfig) -> bool {
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);
        let is_click = self
            .press_origin
            .take()
            .is_some_and(|origin| origin.distance(canvas_pos) < CLICK_SLOP);

        if is_click {
            self.click(canvas_pos, config) || was_dragging
        } else {
            was_dragging
        }
    }

    pub fn pointer_leave(&mut self) -> bool {
        let changed = self.is_dragging || self.hovered.is_some();
        self.is_dragging = false;
        self.hovered = None;
        self.press_origin = None;
        changed
    }

    /// Wheel input in pixels, positive y meaning scroll down
    ///
    /// With the modifier held the wheel zooms, otherwise it pans.
    pub fn wheel(&mut self, delta: Vec2, modifier: bool, config: &RenderConfig) -> bool {
        if !self.is_zoomed || delta == Vec2::ZERO {
            return false;
        }

        if modifier {
            return match delta.y.partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Less) => self.adjust_zoom(ZOOM_STEP),
                Some(std::cmp::Ordering::Greater) => self.adjust_zoom(-ZOOM_STEP),
                _ => false,
            };
        }

        let cells = delta / self.viewport(config).cell;
        self.pan(cells)
    }

    pub fn key(&mut self, key: InputKey) -> bool {
        if !self.is_zoomed {
            return false;
        }

        match key {
            InputKey::Left => self.pan(vec2(-PAN_STEP, 0.0)),
            InputKey::Right => self.pan(vec2(PAN_STEP, 0.0)),
            InputKey::Up => self.pan(vec2(0.0, -PAN_STEP)),
            InputKey::Down => self.pan(vec2(0.0, PAN_STEP)),
            InputKey::ZoomIn => self.adjust_zoom(ZOOM_STEP),
            InputKey::ZoomOut => self.adjust_zoom(-ZOOM_STEP),
            InputKey::Escape => self.zoom_out(),
        }
    }

    // The cell under the pointer changes with the viewport, so any hover is
    // dropped until the next pointer move.
    fn pan(&mut self, delta: Vec2) -> bool {
        let before = self.zoom_position;
        self.zoom_position = clamp_to_grid(before + delta);
        self.viewport_moved(self.zoom_position != before)
    }

    fn adjust_zoom(&mut self, step: f32) -> bool {
        let before = self.zoom_level;
        self.zoom_level = clamp_zoom(before + step);
        self.viewport_moved(self.zoom_level != before)
    }

    fn viewport_moved(&mut self, changed: bool) -> bool {
        if changed {
            self.hovered = None;
        }
        changed
    }
}

fn clamp_zoom(level: f32) -> f32 {
    level.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorScheme;
    use crate::viewport::SizePreset;
    use proptest::prelude::*;

    fn large() -> RenderConfig {
        RenderConfig::from_preset(SizePreset::Large, ColorScheme::Default)
    }

    fn zoomed_at(x: f32, y: f32) -> ViewState {
        ViewState::zoomed_at(vec2(x, y), DEFAULT_ZOOM)
    }

    #[test]
    fn test_click_center_zooms_to_grid_center() {
        let mut view = ViewState::default();
        assert!(view.click(vec2(600.0, 450.0), &large()));
        assert_eq!(view.state(), InteractionState::ZoomedViewing);
        assert_eq!(view.zoom_position, vec2(120.0, 90.0));
        assert_eq!(view.zoom_level, DEFAULT_ZOOM);
    }

    #[test]
    fn test_click_while_zoomed_zooms_further() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        // Viewport starts at (60, 45) with 10px cells
        assert!(view.click(vec2(105.0, 203.0), &config));
        assert_eq!(view.zoom_position, vec2(70.0, 65.0));
        assert_eq!(view.zoom_level, 15.0);

        view.zoom_level = 38.0;
        view.click(vec2(300.0, 300.0), &config);
        assert_eq!(view.zoom_level, MAX_ZOOM);
    }

    #[test]
    fn test_click_on_zoom_out_button() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        view.hovered = Some(HoveredClock::new(Cell { x: 1, y: 1 }));
        let button = zoom_out_button(&config);
        assert!(view.click(button.center(), &config));
        assert_eq!(view.state(), InteractionState::Idle);
        assert!(view.hovered.is_none());
    }

    #[test]
    fn test_escape_returns_to_idle_and_clears_hover() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        view.pointer_move(vec2(300.0, 300.0), &config);
        assert!(view.hovered.is_some());

        assert!(view.key(InputKey::Escape));
        assert_eq!(view.state(), InteractionState::Idle);
        assert!(view.hovered.is_none());
    }

    #[test]
    fn test_idle_ignores_keys_and_wheel() {
        let config = large();
        let mut view = ViewState::default();
        let before = view.clone();
        for key in [
            InputKey::Left,
            InputKey::Right,
            InputKey::Up,
            InputKey::Down,
            InputKey::ZoomIn,
            InputKey::ZoomOut,
            InputKey::Escape,
        ] {
            assert!(!view.key(key));
        }
        assert!(!view.wheel(vec2(0.0, 120.0), false, &config));
        assert!(!view.wheel(vec2(0.0, -120.0), true, &config));
        assert_eq!(view, before);
    }

    #[test]
    fn test_drag_is_incremental_and_scaled() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        assert!(view.pointer_down(vec2(500.0, 400.0), &config));
        assert_eq!(view.state(), InteractionState::ZoomedDragging);

        // 240 / 1200 = 0.2 grid units per pixel
        view.pointer_move(vec2(550.0, 400.0), &config);
        assert!((view.zoom_position.x - 110.0).abs() < 1e-4);
        assert_eq!(view.drag_start, vec2(550.0, 400.0));

        view.pointer_move(vec2(550.0, 350.0), &config);
        assert!((view.zoom_position.y - 100.0).abs() < 1e-4);

        assert!(view.pointer_up(vec2(550.0, 350.0), &config));
        assert_eq!(view.state(), InteractionState::ZoomedViewing);
    }

    #[test]
    fn test_drag_clamps_to_grid() {
        let config = large();
        let mut view = zoomed_at(5.0, 5.0);
        view.pointer_down(vec2(100.0, 100.0), &config);
        view.pointer_move(vec2(5000.0, 5000.0), &config);
        assert_eq!(view.zoom_position, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_down_on_button_does_not_drag() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        let center = zoom_out_button(&config).center();
        assert!(!view.pointer_down(center, &config));
        assert!(!view.is_dragging);
        // Releasing on the button leaves zoom
        assert!(view.pointer_up(center, &config));
        assert_eq!(view.state(), InteractionState::Idle);
    }

    #[test]
    fn test_press_release_in_overview_is_click() {
        let config = large();
        let mut view = ViewState::default();
        assert!(!view.pointer_down(vec2(600.0, 450.0), &config));
        assert!(view.pointer_up(vec2(601.0, 451.0), &config));
        assert!(view.is_zoomed);
        assert_eq!(view.zoom_position, vec2(120.0, 90.0));
    }

    #[test]
    fn test_long_drag_is_not_click() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        view.pointer_down(vec2(500.0, 400.0), &config);
        view.pointer_move(vec2(520.0, 400.0), &config);
        view.pointer_up(vec2(520.0, 400.0), &config);
        assert_eq!(view.zoom_level, DEFAULT_ZOOM);
    }

    #[test]
    fn test_hover_tracks_cell_and_clears_outside() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        assert!(view.pointer_move(vec2(5.0, 5.0), &config));
        assert_eq!(view.hovered.map(|h| h.cell), Some(Cell { x: 60, y: 45 }));
        assert_eq!(view.hovered.map(|h| h.seconds), Some(45 * 240 + 60));

        // Viewport pinned to the top-left corner of the grid
        let mut view = zoomed_at(0.0, 0.0);
        assert!(view.pointer_move(vec2(5.0, 5.0), &config));
        assert_eq!(view.hovered.map(|h| h.cell), Some(Cell { x: 0, y: 0 }));
        assert!(!view.pointer_move(vec2(6.0, 6.0), &config));

        assert!(view.pointer_move(vec2(-50.0, 5.0), &config));
        assert!(view.hovered.is_none());
    }

    #[test]
    fn test_pointer_leave_keeps_mode() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        view.pointer_down(vec2(10.0, 10.0), &config);
        assert!(view.pointer_leave());
        assert_eq!(view.state(), InteractionState::ZoomedViewing);
        assert!(view.hovered.is_none());
    }

    #[test]
    fn test_keys_pan_and_zoom() {
        let mut view = zoomed_at(120.0, 90.0);
        view.key(InputKey::Right);
        view.key(InputKey::Up);
        assert_eq!(view.zoom_position, vec2(125.0, 85.0));
        view.key(InputKey::ZoomIn);
        assert_eq!(view.zoom_level, 12.0);
        for _ in 0..10 {
            view.key(InputKey::ZoomOut);
        }
        assert_eq!(view.zoom_level, MIN_ZOOM);
        assert!(!view.key(InputKey::ZoomOut));
    }

    #[test]
    fn test_wheel_zoom_and_pan() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        assert!(view.wheel(vec2(0.0, -100.0), true, &config));
        assert_eq!(view.zoom_level, 12.0);
        assert!(view.wheel(vec2(0.0, 100.0), true, &config));
        assert_eq!(view.zoom_level, 10.0);

        assert!(view.wheel(vec2(30.0, 50.0), false, &config));
        assert_eq!(view.zoom_position, vec2(123.0, 95.0));
    }

    #[test]
    fn test_horizontal_wheel_with_modifier_keeps_zoom() {
        let config = large();
        let mut view = zoomed_at(120.0, 90.0);
        assert!(!view.wheel(vec2(80.0, 0.0), true, &config));
        assert!(!view.wheel(vec2(-80.0, 0.0), true, &config));
        assert_eq!(view.zoom_level, DEFAULT_ZOOM);
        assert_eq!(view.zoom_position, vec2(120.0, 90.0));
    }

    #[test]
    fn test_viewport_changes_drop_stale_hover() {
        let config = large();
        let hover = |view: &mut ViewState| {
            view.pointer_move(vec2(300.0, 300.0), &config);
            assert!(view.hovered.is_some());
        };

        let mut view = zoomed_at(120.0, 90.0);
        hover(&mut view);
        assert!(view.key(InputKey::Left));
        assert!(view.hovered.is_none());

        hover(&mut view);
        assert!(view.key(InputKey::ZoomIn));
        assert!(view.hovered.is_none());

        hover(&mut view);
        assert!(view.wheel(vec2(0.0, 40.0), false, &config));
        assert!(view.hovered.is_none());

        hover(&mut view);
        assert!(view.click(vec2(300.0, 300.0), &config));
        assert!(view.hovered.is_none());

        // Nothing moved, so the hover stays
        let mut view = zoomed_at(0.0, 0.0);
        hover(&mut view);
        assert!(!view.key(InputKey::Left));
        assert!(view.hovered.is_some());
    }

    #[test]
    fn test_tooltip_lines() {
        let clock = HoveredClock::new(Cell::from_seconds(3600 + 61));
        let [coord, time, pct] = clock.describe(3600 + 61);
        assert_eq!(coord, "(61, 15)");
        assert_eq!(time, "1:01:01");
        assert_eq!(pct, "100.0% correct");
    }

    #[derive(Debug, Clone)]
    enum Event {
        Click(f32, f32),
        Down(f32, f32),
        Move(f32, f32),
        Up(f32, f32),
        Leave,
        Wheel(f32, f32, bool),
        Key(u8),
    }

    fn event() -> impl Strategy<Value = Event> {
        let coord = -2000.0f32..4000.0;
        prop_oneof![
            (coord.clone(), coord.clone()).prop_map(|(x, y)| Event::Click(x, y)),
            (coord.clone(), coord.clone()).prop_map(|(x, y)| Event::Down(x, y)),
            (coord.clone(), coord.clone()).prop_map(|(x, y)| Event::Move(x, y)),
            (coord.clone(), coord.clone()).prop_map(|(x, y)| Event::Up(x, y)),
            Just(Event::Leave),
            (-5000.0f32..5000.0, -5000.0f32..5000.0, any::<bool>())
                .prop_map(|(x, y, m)| Event::Wheel(x, y, m)),
            (0u8..7).prop_map(Event::Key),
        ]
    }

    proptest! {
        #[test]
        fn view_state_stays_clamped(
            events in prop::collection::vec(event(), 1..80),
            preset in 0usize..3,
        ) {
            let config = RenderConfig::from_preset(SizePreset::ALL[preset], ColorScheme::Default);
            let mut view = ViewState::default();
            for e in events {
                match e {
                    Event::Click(x, y) => { view.click(vec2(x, y), &config); }
                    Event::Down(x, y) => { view.pointer_down(vec2(x, y), &config); }
                    Event::Move(x, y) => { view.pointer_move(vec2(x, y), &config); }
                    Event::Up(x, y) => { view.pointer_up(vec2(x, y), &config); }
                    Event::Leave => { view.pointer_leave(); }
                    Event::Wheel(x, y, m) => { view.wheel(vec2(x, y), m, &config); }
                    Event::Key(k) => {
                        let key = [
                            InputKey::Left,
                            InputKey::Right,
                            InputKey::Up,
                            InputKey::Down,
                            InputKey::ZoomIn,
                            InputKey::ZoomOut,
                            InputKey::Escape,
                        ][k as usize];
                        view.key(key);
                    }
                }
                prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&view.zoom_level));
                prop_assert!(view.zoom_position.cmpge(Vec2::ZERO).all());
                prop_assert!(view.zoom_position.cmple(grid_size()).all());
                if !view.is_zoomed {
                    prop_assert!(!view.is_dragging);
                }
            }
        }
    }
}
