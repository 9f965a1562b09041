//! Clock Heatmap
//!
//! 43,200 clocks, one per second of the 12-hour dial, each stuck at its own
//! time. The grid is colored by how close every stuck clock is to the real
//! time. Click to zoom into individual clocks.

mod drawing;
mod grid;
mod interaction;
mod palette;
mod scene;
mod ui;
mod viewport;

use std::time::Instant;

use chrono_tz::Tz;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::Deserialize;
use shared::CycleTicker;
use tracing_subscriber::EnvFilter;

use crate::drawing::{colors, draw_scene, CanvasLayout};
use crate::interaction::{InputKey, ViewState};
use crate::palette::ColorScheme;
use crate::scene::build_scene;
use crate::ui::{draw_side_panel, SidePanelResult};
use crate::viewport::{RenderConfig, SizePreset};

const CLOCK_NAME: &str = "clock_heatmap";
const SIDE_PANEL_WIDTH: f32 = 280.0;
/// Space between the canvas and the window edges
const CANVAS_MARGIN: f32 = 20.0;
/// Pixels scrolled per wheel line
const WHEEL_LINE_PX: f32 = 40.0;

fn main() {
    init_tracing();
    nannou::app(model).update(update).run();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Startup options read from `clock_heatmap.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Config {
    color_scheme: ColorScheme,
    size: SizePreset,
    /// IANA zone name; system local time when absent
    timezone: Option<String>,
}

impl Config {
    fn load() -> Self {
        match shared::load_config::<Config>(CLOCK_NAME) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Config::default()
            }
        }
    }

    fn zone(&self) -> Option<Tz> {
        let name = self.timezone.as_deref()?;
        match shared::parse_timezone(name) {
            Ok(tz) => Some(tz),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to system local time");
                None
            }
        }
    }
}

/// Application state
struct Model {
    window_id: WindowId,
    /// Zoom, pan, hover and drag state
    view: ViewState,
    /// Canvas size and color scheme
    render: RenderConfig,
    size: SizePreset,
    /// Live cycle value, refreshed once per second
    ticker: CycleTicker,
    show_about: bool,
    /// Whether the pointer was over the canvas on the last move
    pointer_on_canvas: bool,
    /// egui integration
    egui: Egui,
}

impl Model {
    fn layout(&self, app: &App) -> CanvasLayout {
        CanvasLayout::calculate(app.window_rect(), SIDE_PANEL_WIDTH, &self.render)
    }

    fn canvas_point(&self, app: &App, pos: Point2) -> Vec2 {
        self.layout(app).to_canvas(pos)
    }
}

fn window_size(render: &RenderConfig) -> (u32, u32) {
    let w = render.width as f32 + SIDE_PANEL_WIDTH + CANVAS_MARGIN * 2.0;
    let h = render.height as f32 + CANVAS_MARGIN * 2.0;
    (w as u32, h as u32)
}

fn model(app: &App) -> Model {
    app.set_exit_on_escape(false);

    let config = Config::load();
    let render = RenderConfig::from_preset(config.size, config.color_scheme);
    let (width, height) = window_size(&render);

    let window_id = app
        .new_window()
        .title("Clock Heatmap")
        .size(width, height)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .mouse_exited(mouse_exited)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let ticker = CycleTicker::new(config.zone(), Instant::now());
    tracing::info!(
        scheme = ?render.color_scheme,
        width = render.width,
        height = render.height,
        zone = ?ticker.zone(),
        "clock heatmap started"
    );

    Model {
        window_id,
        view: ViewState::default(),
        render,
        size: config.size,
        ticker,
        show_about: true,
        pointer_on_canvas: false,
        egui,
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    if model.ticker.tick(Instant::now()) {
        tracing::trace!(seconds = model.ticker.current_seconds(), "tick");
    }

    let mut color_scheme = model.render.color_scheme;
    let mut size = model.size;
    let mut show_about = model.show_about;
    let current_seconds = model.ticker.current_seconds();

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let result: SidePanelResult = draw_side_panel(
        &ctx,
        SIDE_PANEL_WIDTH,
        current_seconds,
        &model.view,
        &mut color_scheme,
        &mut size,
        &mut show_about,
    );

    drop(ctx);

    model.show_about = show_about;

    if result.scheme_changed {
        tracing::debug!(scheme = ?color_scheme, "color scheme changed");
        model.render.color_scheme = color_scheme;
    }

    if result.size_changed {
        tracing::debug!(size = ?size, "canvas size changed");
        model.size = size;
        model.render = RenderConfig::from_preset(size, model.render.color_scheme);
        model.view.pointer_leave();
        model.pointer_on_canvas = false;

        if let Some(window) = app.window(model.window_id) {
            let (w, h) = window_size(&model.render);
            window.set_inner_size_points(w as f32, h as f32);
        }
    }

    if result.zoom_out {
        model.view.zoom_out();
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(colors::BACKGROUND);

    let layout = model.layout(app);
    let scene = build_scene(&model.view, &model.render, model.ticker.current_seconds());
    draw_scene(&draw, &layout, &scene, window_rect);

    // A frame that can't be presented is skipped; the next one retries
    if let Err(e) = draw.to_frame(app, &frame) {
        tracing::debug!(error = ?e, "skipped frame");
        return;
    }

    if let Err(e) = model.egui.draw_to_frame(&frame) {
        tracing::debug!(error = ?e, "skipped egui frame");
    }
}

fn input_key(key: Key) -> Option<InputKey> {
    match key {
        Key::Left => Some(InputKey::Left),
        Key::Right => Some(InputKey::Right),
        Key::Up => Some(InputKey::Up),
        Key::Down => Some(InputKey::Down),
        Key::Equals | Key::Plus | Key::NumpadAdd => Some(InputKey::ZoomIn),
        Key::Minus | Key::NumpadSubtract => Some(InputKey::ZoomOut),
        Key::Escape => Some(InputKey::Escape),
        _ => None,
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if let Some(input) = input_key(key) {
        if model.view.key(input) {
            tracing::trace!(key = ?input, state = ?model.view.state(), "view changed");
        }
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }

    let pos = app.mouse.position();
    if model.layout(app).contains(pos) {
        let canvas = model.canvas_point(app, pos);
        model.view.pointer_down(canvas, &model.render);
    }
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }

    let canvas = model.canvas_point(app, app.mouse.position());
    if model.view.pointer_up(canvas, &model.render) {
        tracing::trace!(state = ?model.view.state(), "view changed");
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if model.layout(app).contains(pos) {
        model.pointer_on_canvas = true;
        let canvas = model.canvas_point(app, pos);
        model.view.pointer_move(canvas, &model.render);
    } else if model.pointer_on_canvas {
        model.pointer_on_canvas = false;
        model.view.pointer_leave();
    }
}

fn mouse_exited(_app: &App, model: &mut Model) {
    model.pointer_on_canvas = false;
    model.view.pointer_leave();
}

fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if !model.pointer_on_canvas {
        return;
    }

    // Positive y scrolls down, as on the web
    let pixels = match delta {
        MouseScrollDelta::LineDelta(x, y) => vec2(-x, -y) * WHEEL_LINE_PX,
        MouseScrollDelta::PixelDelta(pos) => vec2(-pos.x as f32, -pos.y as f32),
    };
    let modifier = app.keys.mods.ctrl() || app.keys.mods.logo();

    if model.view.wheel(pixels, modifier, &model.render) {
        tracing::trace!(
            level = model.view.zoom_level,
            x = model.view.zoom_position.x,
            y = model.view.zoom_position.y,
            "view changed"
        );
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events
    model.egui.handle_raw_event(event);
}
