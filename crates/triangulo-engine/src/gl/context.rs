use std::num::NonZeroU32;

use anyhow::{Context as _, Result, anyhow};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// The made-current GL context and the window surface it presents to.
///
/// Swap pacing is whatever the platform defaults to; no swap interval is
/// requested.
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlContext {
    /// Creates the window, a 3.3 core-profile context bound to it, and a
    /// loaded GL backend.
    ///
    /// Any failure along the chain (display, window, context, surface,
    /// function-pointer loading) is an initialization failure; nothing is
    /// retried.
    pub fn create(
        event_loop: &ActiveEventLoop,
        attrs: WindowAttributes,
    ) -> Result<(Window, GlContext, super::GlowBackend)> {
        let template = ConfigTemplateBuilder::new();
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, pick_config)
            .map_err(|err| anyhow!("failed to initialize the GL display: {err}"))?;
        let window = window.context("GL display was built without a window")?;

        let raw_handle = window
            .window_handle()
            .context("failed to obtain a raw window handle")?
            .as_raw();

        // 3.3 core exactly; anything less is an error, not a fallback.
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .context("failed to create a 3.3 core GL context")?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::default())
            .context("failed to describe the window surface")?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make the GL context current")?;

        // Function pointers can only be resolved once the context is current.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };

        Ok((window, GlContext { surface, context }, super::GlowBackend::new(gl)))
    }

    /// Presents the completed frame.
    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }

    /// Resizes the underlying surface. The GL viewport is tracked separately
    /// by the renderer.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        // glutin rejects zero-sized surfaces; minimized windows report 0x0.
        let width = NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN);
        let height = NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN);
        self.surface.resize(&self.context, width, height);
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    match select_config(configs) {
        Some(config) => config,
        None => {
            // The picker signature cannot report failure, and an empty
            // candidate list means no usable GL config exists on this
            // display. That is an unrecoverable init failure; exit with the
            // same status the caller maps init errors to.
            log::error!("fatal: the GL display offered no matching configs");
            std::process::exit(-1);
        }
    }
}

/// The template already constrains the candidates; the first match is fine
/// for a single opaque window.
fn select_config<C>(mut configs: impl Iterator<Item = C>) -> Option<C> {
    configs.next()
}
