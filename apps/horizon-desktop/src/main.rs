mod context;
mod scenes;

use anyhow::Result;
use clap::{Parser, Subcommand};
use context::{AppContext, PIXELS_PER_LINE, WindowCommand, action_for_key};
use horizon_render::{Camera, FrameInfo, GraphicsApi, Scene};
use horizon_render_gl::{GlSurface, GlowBackend};
use horizon_tools::{CameraInspector, FrameRecorder, FrameTimer, RecorderConfig};
use scenes::{BlackHoleScene, CubesScene, QuadScene, ScenePaths};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

#[derive(Parser, Debug)]
#[command(name = "horizon-desktop", about = "OpenGL camera and shader demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Window width in pixels (defaults per demo)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Window height in pixels (defaults per demo)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Directory holding the GLSL sources
    #[arg(long, global = true, default_value = "./shaders")]
    shader_dir: PathBuf,

    /// Directory holding textures and sky maps
    #[arg(long, global = true, default_value = "./resources")]
    asset_dir: PathBuf,

    #[command(subcommand)]
    demo: Demo,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Demo {
    /// Ten textured cubes spinning in front of the camera
    Cubes,
    /// A single textured quad
    Quad,
    /// Raymarched black hole in front of a sky map
    BlackHole {
        /// Pipe every frame to ffmpeg and encode it into this file
        #[arg(long)]
        record: Option<PathBuf>,

        /// Use a horizontal-cross cubemap instead of the HDR panorama
        #[arg(long)]
        cross_map: bool,
    },
}

impl Demo {
    fn default_size(&self) -> (u32, u32) {
        match self {
            Demo::Cubes | Demo::Quad => (800, 600),
            Demo::BlackHole { .. } => (1700, 1000),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Demo::Cubes => "Cubes",
            Demo::Quad => "Quad",
            Demo::BlackHole { .. } => "Black Hole",
        }
    }

    /// The black hole starts with the camera and pointer captured.
    fn locks_on_start(&self) -> bool {
        matches!(self, Demo::BlackHole { .. })
    }

    fn record_path(&self) -> Option<&Path> {
        match self {
            Demo::BlackHole { record, .. } => record.as_deref(),
            _ => None,
        }
    }
}

impl Cli {
    fn window_size(&self) -> (u32, u32) {
        let (width, height) = self.demo.default_size();
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }
}

fn build_scene(
    demo: &Demo,
    gl: &GlowBackend,
    paths: &ScenePaths,
    camera: &mut Camera,
) -> Box<dyn Scene<GlowBackend>> {
    match demo {
        Demo::Cubes => Box::new(CubesScene::new(gl, paths)),
        Demo::Quad => Box::new(QuadScene::new(gl, paths)),
        Demo::BlackHole { cross_map, .. } => {
            Box::new(BlackHoleScene::new(gl, paths, *cross_map, camera))
        }
    }
}

/// Live GL state; exists between `resumed` and `exiting`.
struct Gpu {
    surface: GlSurface,
    gl: GlowBackend,
    scene: Box<dyn Scene<GlowBackend>>,
}

struct App {
    demo: Demo,
    paths: ScenePaths,
    size: (u32, u32),
    ctx: AppContext,
    gpu: Option<Gpu>,
    recorder: Option<FrameRecorder>,
    frame: Vec<u8>,
    shown_fps: f32,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli) -> Self {
        let size = cli.window_size();
        Self {
            paths: ScenePaths {
                shader_dir: cli.shader_dir,
                asset_dir: cli.asset_dir,
            },
            demo: cli.demo,
            size,
            ctx: AppContext::new(size.0, size.1, Camera::default()),
            gpu: None,
            recorder: None,
            frame: Vec::new(),
            shown_fps: -1.0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.size;
        let recording = self.demo.record_path().map(Path::to_path_buf);
        let attrs = Window::default_attributes()
            .with_title(self.demo.title())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(recording.is_none());
        let (surface, context) = GlSurface::new(event_loop, attrs, true)?;
        let gl = GlowBackend::new(context);
        tracing::info!("OpenGL {}", gl.version());

        let size = surface.window().inner_size();
        self.ctx.on_resize(size.width, size.height);
        surface.resize(size.width, size.height);

        let scene = build_scene(&self.demo, &gl, &self.paths, &mut self.ctx.camera);

        if let Some(output) = recording {
            let config = RecorderConfig::new(output, size.width, size.height);
            match FrameRecorder::start(&config) {
                Ok(recorder) => {
                    self.frame = vec![0; recorder.frame_len()];
                    self.recorder = Some(recorder);
                    self.ctx.recording = true;
                }
                Err(e) => tracing::error!("recording disabled: {e}"),
            }
        }

        self.gpu = Some(Gpu { surface, gl, scene });
        if self.demo.locks_on_start() {
            if let Some(command) = self.ctx.on_click() {
                self.apply(command, event_loop);
            }
        }
        self.ctx.timer = FrameTimer::new();
        tracing::info!(demo = self.demo.title(), "scene ready");
        Ok(())
    }

    fn apply(&mut self, command: WindowCommand, event_loop: &ActiveEventLoop) {
        if command == WindowCommand::Quit {
            event_loop.exit();
            return;
        }
        let Some(gpu) = &self.gpu else {
            return;
        };
        let window = gpu.surface.window();
        match command {
            WindowCommand::Quit => {}
            WindowCommand::SetFullscreen(on) => {
                window.set_fullscreen(on.then_some(Fullscreen::Borderless(None)));
            }
            WindowCommand::GrabCursor(true) => {
                self.ctx.raw_motion = grab_cursor(window);
                window.set_cursor_visible(false);
            }
            WindowCommand::GrabCursor(false) => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("failed to release cursor: {e}");
                }
                window.set_cursor_visible(true);
                self.ctx.raw_motion = false;
            }
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let dt = self.ctx.timer.tick();
        self.ctx.update(dt);
        gpu.scene.update(&mut self.ctx.camera, dt);

        let (width, height) = (self.ctx.width, self.ctx.height);
        gpu.gl.viewport(0, 0, width as i32, height as i32);
        let frame = FrameInfo {
            camera: &self.ctx.camera,
            width,
            height,
            time: self.ctx.timer.elapsed(),
        };
        gpu.scene.draw(&gpu.gl, &frame);

        if let Some(recorder) = self.recorder.as_mut() {
            // the encoder was started at a fixed size; the window may differ
            self.frame.resize(recorder.frame_len(), 0);
            gpu.gl.read_pixels_rgb(recorder.width(), recorder.height(), &mut self.frame);
            if let Err(e) = recorder.write_frame(&self.frame) {
                tracing::error!("recording stopped: {e}");
                self.recorder = None;
                self.ctx.recording = false;
            }
        }

        let fps = self.ctx.timer.fps();
        if fps != self.shown_fps {
            self.shown_fps = fps;
            let title = CameraInspector::title(self.demo.title(), &self.ctx.camera, fps);
            gpu.surface.window().set_title(&title);
        }

        if let Err(e) = gpu.surface.swap_buffers() {
            tracing::error!("{e}");
        }
    }
}

/// Lock the pointer in place, falling back to confining it to the window.
/// Returns whether the hard lock took.
fn grab_cursor(window: &Window) -> bool {
    if window.set_cursor_grab(CursorGrabMode::Locked).is_ok() {
        return true;
    }
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    false
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.ctx.on_resize(size.width, size.height);
                if let Some(gpu) = &self.gpu {
                    gpu.surface.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.ctx.on_focus_change(focused);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let Some(action) = action_for_key(key) else {
                    return;
                };
                if repeat && action.is_edge_triggered() {
                    return;
                }
                if let Some(command) = self.ctx.on_key(action, state == ElementState::Pressed) {
                    self.apply(command, event_loop);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(command) = self.ctx.on_click() {
                    self.apply(command, event_loop);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.ctx.on_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(p) => (
                        (p.x / PIXELS_PER_LINE) as f32,
                        (p.y / PIXELS_PER_LINE) as f32,
                    ),
                };
                self.ctx.on_scroll(dx, dy);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.ctx.on_mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.surface.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.scene.destroy(&gpu.gl);
        }
        if let Some(recorder) = self.recorder.take() {
            if let Err(e) = recorder.finish() {
                tracing::error!("{e}");
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(demo = cli.demo.title(), "starting horizon desktop");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("horizon-desktop").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn per_demo_default_sizes() {
        assert_eq!(parse(&["cubes"]).window_size(), (800, 600));
        assert_eq!(parse(&["quad"]).window_size(), (800, 600));
        assert_eq!(parse(&["black-hole"]).window_size(), (1700, 1000));
    }

    #[test]
    fn explicit_size_wins() {
        let cli = parse(&["black-hole", "--width", "640"]);
        assert_eq!(cli.window_size(), (640, 1000));
        let cli = parse(&["--height", "480", "cubes"]);
        assert_eq!(cli.window_size(), (800, 480));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(Cli::try_parse_from(["horizon-desktop", "cubes", "--width", "0"]).is_err());
    }

    #[test]
    fn black_hole_flags() {
        let cli = parse(&["black-hole", "--record", "out.mp4", "--cross-map"]);
        assert_eq!(
            cli.demo,
            Demo::BlackHole {
                record: Some(PathBuf::from("out.mp4")),
                cross_map: true,
            }
        );
        assert_eq!(cli.demo.record_path(), Some(Path::new("out.mp4")));
        assert_eq!(parse(&["cubes"]).demo.record_path(), None);
    }

    #[test]
    fn only_black_hole_locks_on_start() {
        assert!(parse(&["black-hole"]).demo.locks_on_start());
        assert!(!parse(&["cubes"]).demo.locks_on_start());
        assert!(!parse(&["quad"]).demo.locks_on_start());
    }

    #[test]
    fn directory_defaults() {
        let cli = parse(&["quad"]);
        assert_eq!(cli.shader_dir, PathBuf::from("./shaders"));
        assert_eq!(cli.asset_dir, PathBuf::from("./resources"));
        assert!(!cli.verbose);
    }

    #[test]
    fn demo_is_required() {
        assert!(Cli::try_parse_from(["horizon-desktop"]).is_err());
    }
}
