use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{
    GlSurface as _, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface,
};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Debug, thiserror::Error)]
pub enum GlSurfaceError {
    #[error("failed to create window or GL display: {0}")]
    Display(String),
    #[error("display builder did not create a window")]
    NoWindow,
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
    #[error("GL context error: {0}")]
    Gl(#[from] glutin::error::Error),
}

/// A window with a current OpenGL 3.3 core context and a 24-bit depth
/// buffer.
pub struct GlSurface {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlSurface {
    /// Open the window, make its context current and load GL entry points.
    pub fn new(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        vsync: bool,
    ) -> Result<(Self, glow::Context), GlSurfaceError> {
        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, pick_config)
            .map_err(|e| GlSurfaceError::Display(e.to_string()))?;
        let window = window.ok_or(GlSurfaceError::NoWindow)?;
        let display = config.display();

        let raw_handle = window.window_handle()?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&config, &context_attributes)? };

        let surface_attributes =
            window.build_surface_attributes(SurfaceAttributesBuilder::new())?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        if vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = surface.set_swap_interval(&context, interval) {
                tracing::warn!("vsync unavailable: {e}");
            }
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        tracing::debug!(samples = config.num_samples(), "GL surface ready");

        Ok((
            Self {
                window,
                surface,
                context,
            },
            gl,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the drawable. Zero-sized (minimized) requests are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), GlSurfaceError> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

impl std::fmt::Debug for GlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlSurface")
            .field("window", &self.window.id())
            .finish_non_exhaustive()
    }
}

/// Prefer the config with the most samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| {
            if c.num_samples() > best.num_samples() {
                c
            } else {
                best
            }
        })
        .expect("GL display offered no framebuffer configs")
}
