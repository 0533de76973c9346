use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::gl::{GlContext, GlowBackend};
use crate::render::{RenderInit, Renderer};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Triangulo OpenGL".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Render-loop lifecycle.
///
/// `Running` draws; once `Closing` is observed no further draw calls are
/// issued and the event loop winds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Closing,
}

impl Phase {
    /// Applies one iteration's close signals. `Closing` is terminal.
    fn observe(self, close_requested: bool, escape_pressed: bool) -> Self {
        if close_requested || escape_pressed {
            Phase::Closing
        } else {
            self
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the render loop until window-close or Escape.
    ///
    /// Initialization failures (window system, context, loader) are returned
    /// to the caller; shader failures follow `init.shader_failure`.
    pub fn run(config: RuntimeConfig, init: RenderInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.init_error.take() {
            return Err(err);
        }
        Ok(())
    }
}

/// Everything created once the event loop is live.
struct GlState {
    window: Window,
    context: GlContext,
    gl: GlowBackend,
    renderer: Renderer<GlowBackend>,
}

struct AppState {
    config: RuntimeConfig,
    init: RenderInit,
    phase: Phase,
    state: Option<GlState>,
    init_error: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, init: RenderInit) -> Self {
        Self {
            config,
            init,
            phase: Phase::Running,
            state: None,
            init_error: None,
        }
    }

    fn create_gl_state(&self, event_loop: &ActiveEventLoop) -> Result<GlState> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(self.config.initial_size);

        let (window, context, gl) = GlContext::create(event_loop, attrs)?;
        let renderer = Renderer::new(&gl, &self.init)?;

        // The viewport starts at the real framebuffer size; resize events
        // keep it in sync from here on.
        let size = window.inner_size();
        renderer.resize(&gl, size.width, size.height);

        Ok(GlState {
            window,
            context,
            gl,
            renderer,
        })
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.phase = self.phase.observe(true, false);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.create_gl_state(event_loop) {
            Ok(state) => {
                log::debug!("window and GL context ready");
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase == Phase::Closing {
            event_loop.exit();
            return;
        }

        // Continuous redraw; the swap provides whatever pacing the platform
        // defaults to.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &self.state else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.close(event_loop),

            WindowEvent::Resized(new_size) => {
                state.context.resize(new_size);
                state.renderer.resize(&state.gl, new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                if self.phase != Phase::Running {
                    return;
                }
                state.renderer.frame(&state.gl);
                if let Err(err) = state.context.swap_buffers() {
                    log::error!("{err:#}");
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // One-time teardown; no draw can happen after this point.
        if let Some(state) = self.state.take() {
            state.renderer.destroy(&state.gl);
            drop(state.context);
            log::debug!("GL resources released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::mock::{Call, RecordingGl};

    // ── phase machine ─────────────────────────────────────────────────────

    #[test]
    fn running_persists_without_close_signals() {
        assert_eq!(Phase::Running.observe(false, false), Phase::Running);
    }

    #[test]
    fn close_request_enters_closing() {
        assert_eq!(Phase::Running.observe(true, false), Phase::Closing);
    }

    #[test]
    fn escape_enters_closing() {
        assert_eq!(Phase::Running.observe(false, true), Phase::Closing);
    }

    #[test]
    fn closing_is_terminal() {
        assert_eq!(Phase::Closing.observe(false, false), Phase::Closing);
    }

    // ── loop contract ─────────────────────────────────────────────────────

    #[test]
    fn escape_stops_draws_by_the_next_iteration() {
        let gl = RecordingGl::new();
        let renderer = Renderer::new(&gl, &RenderInit::default()).unwrap();
        let mut phase = Phase::Running;

        for iteration in 0..6 {
            // Each iteration polls input first, then checks the close key.
            let escape_pressed = iteration == 2;
            phase = phase.observe(false, escape_pressed);
            if phase == Phase::Running {
                renderer.frame(&gl);
            }
        }

        // Draws happened on iterations 0 and 1 only.
        assert_eq!(gl.count(|c| matches!(c, Call::DrawArrays { .. })), 2);
        assert_eq!(phase, Phase::Closing);
    }

    #[test]
    fn synthetic_frames_reuse_the_same_gpu_objects() {
        let gl = RecordingGl::new();
        let renderer = Renderer::new(&gl, &RenderInit::default()).unwrap();
        let mut phase = Phase::Running;

        for _ in 0..8 {
            phase = phase.observe(false, false);
            assert_eq!(phase, Phase::Running);
            renderer.frame(&gl);
        }

        assert_eq!(gl.count(|c| matches!(c, Call::CreateProgram)), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::CreateBuffer)), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::CreateVertexArray)), 1);
        assert_eq!(gl.count(|c| matches!(c, Call::DrawArrays { .. })), 8);
    }
}
