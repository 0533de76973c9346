//! Shader stage compilation and program linking.
//!
//! The embedded sources are the whole shader surface of the program: a
//! position passthrough vertex stage and a solid-color fragment stage.

use std::fmt;

use crate::gl::{GlApi, StageKind};

pub const VERTEX_SOURCE: &str = "\
#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "\
#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

/// Upper bound on the diagnostic text kept from a failed compile or link.
pub const MAX_DIAGNOSTIC_LEN: usize = 512;

/// What to do when a stage fails to compile or the program fails to link.
///
/// `Log` reports the diagnostic and keeps going, so the render loop may run
/// with a program the driver refuses to execute (it draws nothing). `Fatal`
/// turns the first failure into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Log,
    Fatal,
}

/// A failure while building the shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A stage failed to compile; the stage object was deleted.
    Compile { stage: StageKind, log: String },
    /// The program failed to link.
    Link { log: String },
    /// The driver refused to allocate an object (typically a lost context).
    Create {
        what: &'static str,
        reason: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { stage, log } => {
                write!(f, "{stage} shader compilation failed: {log}")
            }
            ShaderError::Link { log } => write!(f, "shader program linking failed: {log}"),
            ShaderError::Create { what, reason } => {
                write!(f, "failed to create {what}: {reason}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Compiles one stage from source.
///
/// On failure the stage object is deleted before returning, so a failed
/// compile never leaves a handle behind for linking.
pub fn compile_stage<G: GlApi>(
    gl: &G,
    kind: StageKind,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl.create_shader(kind).map_err(|reason| ShaderError::Create {
        what: "a shader stage",
        reason,
    })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.compile_status(shader) {
        let log = bounded(gl.shader_info_log(shader));
        gl.delete_shader(shader);
        return Err(ShaderError::Compile { stage: kind, log });
    }

    Ok(shader)
}

/// Links `stages` into a fresh program, deleting it on failure.
pub fn link<G: GlApi>(gl: &G, stages: &[G::Shader]) -> Result<G::Program, ShaderError> {
    let program = gl.create_program().map_err(|reason| ShaderError::Create {
        what: "a shader program",
        reason,
    })?;

    if let Some(log) = link_into(gl, program, stages) {
        gl.delete_program(program);
        return Err(ShaderError::Link { log });
    }

    Ok(program)
}

fn link_into<G: GlApi>(gl: &G, program: G::Program, stages: &[G::Shader]) -> Option<String> {
    for stage in stages {
        gl.attach_shader(program, *stage);
    }
    gl.link_program(program);

    if gl.link_status(program) {
        None
    } else {
        Some(bounded(gl.program_info_log(program)))
    }
}

fn release_stages<G: GlApi>(gl: &G, stages: &[G::Shader]) {
    for stage in stages {
        gl.delete_shader(*stage);
    }
}

fn bounded(log: String) -> String {
    if log.len() <= MAX_DIAGNOSTIC_LEN {
        return log;
    }
    let mut end = MAX_DIAGNOSTIC_LEN;
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].to_string()
}

/// A linked (or, under [`FailurePolicy::Log`], possibly link-failed) program.
pub struct ShaderProgram<G: GlApi> {
    handle: G::Program,
}

// Manual impl: deriving would demand `G: Debug`, but only the handle matters.
impl<G: GlApi> fmt::Debug for ShaderProgram<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .finish()
    }
}

impl<G: GlApi> ShaderProgram<G> {
    /// Builds the fixed vertex/fragment pair.
    pub fn build(gl: &G, policy: FailurePolicy) -> Result<Self, ShaderError> {
        Self::build_from(gl, VERTEX_SOURCE, FRAGMENT_SOURCE, policy)
    }

    /// Compiles both stages, links them, then releases the stage objects.
    ///
    /// Stage objects are link-time artifacts; the linked program keeps its
    /// own copy of the compiled code, so they are deleted unconditionally
    /// once linking has been attempted.
    pub fn build_from(
        gl: &G,
        vertex_source: &str,
        fragment_source: &str,
        policy: FailurePolicy,
    ) -> Result<Self, ShaderError> {
        let mut stages = Vec::with_capacity(2);
        for (kind, source) in [
            (StageKind::Vertex, vertex_source),
            (StageKind::Fragment, fragment_source),
        ] {
            match compile_stage(gl, kind, source) {
                Ok(stage) => stages.push(stage),
                Err(err) => {
                    if policy == FailurePolicy::Fatal {
                        release_stages(gl, &stages);
                        return Err(err);
                    }
                    log::error!("{err}");
                }
            }
        }

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(reason) => {
                release_stages(gl, &stages);
                return Err(ShaderError::Create {
                    what: "a shader program",
                    reason,
                });
            }
        };

        if let Some(log) = link_into(gl, program, &stages) {
            let err = ShaderError::Link { log };
            if policy == FailurePolicy::Fatal {
                release_stages(gl, &stages);
                gl.delete_program(program);
                return Err(err);
            }
            // Log policy keeps the link-failed handle; binding it is legal
            // and draws nothing.
            log::error!("{err}");
        }

        release_stages(gl, &stages);

        Ok(Self { handle: program })
    }

    /// Makes this program current for subsequent draws.
    pub fn bind(&self, gl: &G) {
        gl.use_program(Some(self.handle));
    }

    /// Releases the program object. The handle must not be used afterward.
    pub fn destroy(self, gl: &G) {
        gl.delete_program(self.handle);
    }
}
