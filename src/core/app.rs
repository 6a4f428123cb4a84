//! Application context.
//!
//! Owns every platform and GPU resource as one explicitly-lifetimed value,
//! created in bootstrap order and released in reverse.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Mat4;

use crate::context::GlContext;
use crate::input::{Action, LoopState};
use crate::pipeline::ShaderProgram;
use crate::render::{self, DrawStyle};
use crate::scene::Scene;
use crate::window::{BestConfigPolicy, XWindow};

use super::run_loop::{self, LoopApp};

/// Bootstrap configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub initial_width: u32,
    pub initial_height: u32,
    pub texture_path: PathBuf,
    /// Framebuffer-config selection rule; defaults to the historical quirk.
    pub best_config_policy: BestConfigPolicy,
    /// Draw-call pattern; defaults to the historical six-fan sequence.
    pub draw_style: DrawStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "smilex".to_string(),
            initial_width: 800,
            initial_height: 600,
            texture_path: PathBuf::from("resources/smiley.bmp"),
            best_config_policy: BestConfigPolicy::default(),
            draw_style: DrawStyle::default(),
        }
    }
}

/// Everything the demo owns, in teardown-reverse declaration order so field
/// drops release GPU objects while the context is still current.
pub struct App {
    scene: Scene,
    pipeline: ShaderProgram,
    context: GlContext,
    window: XWindow,

    projection: Mat4,
    loop_state: LoopState,
    fullscreen: bool,
    draw_style: DrawStyle,
}

impl App {
    /// Runs the full bootstrap sequence: window, context, pipeline, scene.
    ///
    /// Any failure propagates to the caller; resources created before the
    /// failing step release themselves on drop.
    pub fn bootstrap(config: AppConfig) -> Result<Self> {
        let window = XWindow::create(&config).context("window creation failed")?;
        let context = GlContext::create(&window).context("context creation failed")?;

        render::init_raster_state();

        let pipeline = ShaderProgram::build().context("shader pipeline failed")?;
        let scene = Scene::create(&config.texture_path).context("scene upload failed")?;

        let (width, height) = window.size();
        let mut app = Self {
            scene,
            pipeline,
            context,
            window,
            projection: Mat4::IDENTITY,
            loop_state: LoopState::default(),
            fullscreen: false,
            draw_style: config.draw_style,
        };

        app.resize(width as i32, height as i32);

        Ok(app)
    }

    /// Runs the event/render loop until close or Escape.
    pub fn run(&mut self) {
        run_loop::drive(self);
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::CloseRequested => self.loop_state.note_close_requested(),
            Action::EscapePressed => self.loop_state.note_escape_pressed(),
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                self.window.set_fullscreen(self.fullscreen);
            }
            Action::Resized { width, height } => {
                self.window.set_size(width.max(0) as u32, height.max(0) as u32);
                self.resize(width, height);
            }
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        let (width, height) = render::clamp_surface(width, height);

        unsafe {
            gl::Viewport(0, 0, width, height);
        }

        self.projection = render::perspective_for(width, height);
    }

    /// Releases everything in reverse bootstrap order. Idempotent and safe
    /// on a partially initialized context.
    pub fn shutdown(&mut self) {
        self.scene.release();
        self.pipeline.release();
        self.context.release();
        self.window.release();
    }
}

impl LoopApp for App {
    fn pump(&mut self) {
        let mut actions = Vec::new();
        self.window.pump_events(|action| actions.push(action));

        for action in actions {
            self.handle_action(action);
        }
    }

    fn frame(&mut self) {
        render::draw_frame(&self.pipeline, &self.scene, self.projection, self.draw_style);

        unsafe {
            x11::glx::glXSwapBuffers(self.window.display(), self.window.drawable());
        }
    }

    fn exit_requested(&self) -> bool {
        self.loop_state.should_exit()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
