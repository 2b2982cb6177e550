// src/main.rs
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

// Declare modules directly in the binary crate root
mod font;
mod gfx;
mod life;
mod render;

use std::sync::Arc;
use std::time::Instant;

use pollster::block_on;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::font::FontAtlas;
use crate::gfx::Gfx;
use crate::life::LifeGrid;
use crate::render::OverlayState;

// -----------------------------
// Constants
// -----------------------------
const SCREEN_WIDTH: u32 = 1280;
const SCREEN_HEIGHT: u32 = 720;

/// Window pixels per grid cell at the native window size.
const CELL_PX: u32 = 6;
const GRID_WIDTH: u32 = SCREEN_WIDTH / CELL_PX;
const GRID_HEIGHT: u32 = SCREEN_HEIGHT / CELL_PX;

/// How often the automaton advances while running, decoupled from the
/// display frame rate.
const GENERATIONS_PER_SEC: f32 = 15.0;

const MIN_BRUSH_RADIUS: i32 = 1;
const MAX_BRUSH_RADIUS: i32 = 5;

#[derive(Default, Clone, Copy)]
struct InputState {
    cursor: Option<(f32, f32)>,
    left_down: bool,
    right_down: bool,
    wheel_delta: f32,
}

// -----------------------------
// App
// -----------------------------
struct App {
    window: Option<Arc<Window>>,
    gfx: Option<Gfx>,

    grid: LifeGrid,
    font: FontAtlas,
    input: InputState,

    running: bool,
    brush_radius: i32,

    last_frame: Instant,
    step_accum: f32,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gfx: None,
            grid: LifeGrid::new(GRID_WIDTH, GRID_HEIGHT),
            font: FontAtlas::new(),
            input: InputState::default(),
            running: false,
            brush_radius: MIN_BRUSH_RADIUS,
            last_frame: Instant::now(),
            step_accum: 0.0,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Conways Game of Life")
            .with_inner_size(LogicalSize::new(SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64))
            .with_resizable(false);

        let win = Arc::new(el.create_window(attrs).expect("create_window"));
        let size = win.inner_size();
        let gfx = block_on(Gfx::new(
            win.clone(),
            size.width,
            size.height,
            GRID_WIDTH,
            GRID_HEIGHT,
        ));

        log::info!(
            "grid {}x{} at {} px per cell",
            GRID_WIDTH,
            GRID_HEIGHT,
            CELL_PX
        );

        self.window = Some(win);
        self.gfx = Some(gfx);
        self.last_frame = Instant::now();
        self.step_accum = 0.0;
    }

    fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => el.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    match event.logical_key {
                        Key::Named(NamedKey::Escape) => el.exit(),

                        Key::Named(NamedKey::Space) => {
                            self.running = !self.running;
                            self.step_accum = 0.0;
                        }

                        Key::Character(ref s) if s.as_str().eq_ignore_ascii_case("r") => {
                            self.grid.clear();
                            self.running = false;
                        }

                        _ => {}
                    }
                }
            }

            WindowEvent::Resized(sz) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize(sz.width, sz.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor = Some((position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.input.cursor = None;
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let down = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.left_down = down,
                    MouseButton::Right => self.input.right_down = down,
                    _ => {}
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.input.wheel_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, el: &ActiveEventLoop) {
        el.set_control_flow(ControlFlow::Poll);

        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        let now = Instant::now();
        let mut dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        if !dt.is_finite() || dt < 0.0 {
            dt = 0.0;
        }
        if dt > 0.25 {
            dt = 0.25;
        }

        // Wheel -> brush radius, whole notches only.
        let ticks = self.input.wheel_delta.trunc();
        if ticks != 0.0 {
            self.brush_radius =
                (self.brush_radius + ticks as i32).clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
            self.input.wheel_delta -= ticks;
        }

        // Cursor position in grid cells, tracking the current surface size.
        let (sw, sh) = gfx.surface_size();
        let cursor_cell = self.input.cursor.map(|(mx, my)| {
            let gx = (mx * GRID_WIDTH as f32 / sw as f32).floor() as i32;
            let gy = (my * GRID_HEIGHT as f32 / sh as f32).floor() as i32;
            (gx, gy)
        });

        // Frame cycle: seed staging, apply edits, maybe step, then commit.
        self.grid.begin_frame();

        if let Some((gx, gy)) = cursor_cell {
            if self.input.left_down {
                self.grid.apply_brush(true, gx, gy, self.brush_radius);
            } else if self.input.right_down {
                self.grid.apply_brush(false, gx, gy, self.brush_radius);
            }
        }

        if self.running {
            self.step_accum += dt;
            if self.step_accum >= 1.0 / GENERATIONS_PER_SEC {
                self.grid.step_generation();
                self.step_accum = 0.0;
            }
        }

        self.grid.commit();

        let overlay = OverlayState {
            cursor_cell,
            brush_radius: self.brush_radius,
            paused: !self.running,
        };
        render::rasterize_grid(&self.grid, &mut gfx.grid_layer.upload, gfx.grid_layer.bpr as usize);
        render::rasterize_ui(
            &mut gfx.ui_layer.upload,
            gfx.ui_layer.bpr as usize,
            self.grid.width(),
            self.grid.height(),
            &self.font,
            &overlay,
        );
        gfx.render();
    }
}

fn main() -> Result<(), winit::error::EventLoopError> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)
}
