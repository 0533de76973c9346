//! Per-frame rendering over an explicit GL context.

use anyhow::Result;

use crate::geometry::{GeometryBuffer, TRIANGLE, Vertex};
use crate::gl::GlApi;
use crate::shader::{FailurePolicy, ShaderProgram};

/// Initialization parameters for the renderer.
#[derive(Debug, Clone)]
pub struct RenderInit {
    /// Background color the frame is cleared to.
    pub clear_color: [f32; 4],

    /// What to do when shader compilation or linking fails.
    ///
    /// The default logs and keeps going; `Fatal` is the hardened
    /// alternative.
    pub shader_failure: FailurePolicy,
}

impl Default for RenderInit {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            shader_failure: FailurePolicy::Log,
        }
    }
}

/// Owns the GPU-side objects and draws one frame at a time.
///
/// Construction creates the shader program and uploads the triangle exactly
/// once; frames only bind and draw.
pub struct Renderer<G: GlApi> {
    program: ShaderProgram<G>,
    geometry: GeometryBuffer<G>,
}

impl<G: GlApi> Renderer<G> {
    pub fn new(gl: &G, init: &RenderInit) -> Result<Self> {
        let program = ShaderProgram::build(gl, init.shader_failure)?;
        let geometry = GeometryBuffer::upload(gl, &TRIANGLE, Vertex::LAYOUT)?;
        gl.set_clear_color(init.clear_color);

        Ok(Self { program, geometry })
    }

    /// Draws one frame: clear, bind program, bind geometry, one draw call.
    ///
    /// Presentation (buffer swap) belongs to the window runtime.
    pub fn frame(&self, gl: &G) {
        gl.clear_color_buffer();
        self.program.bind(gl);
        self.geometry.bind(gl);
        self.geometry.draw(gl);
    }

    /// Matches the viewport to a new framebuffer size.
    pub fn resize(&self, gl: &G, width: u32, height: u32) {
        gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Releases every GPU object this renderer created.
    pub fn destroy(self, gl: &G) {
        self.geometry.destroy(gl);
        self.program.destroy(gl);
    }
}
