//! Static triangle geometry and its GPU-side buffer.

use anyhow::{Result, anyhow};
use bytemuck::{Pod, Zeroable};

use crate::gl::{AttributeLayout, GlApi};

/// One vertex: a position in clip space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    /// Single position attribute at slot 0, tightly packed, no interleaving.
    pub const LAYOUT: AttributeLayout = AttributeLayout {
        index: 0,
        components: 3,
        stride: 3,
        offset: 0,
    };
}

/// The fixed triangle, immutable for the process lifetime.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.5, 0.0),
    Vertex::new(0.5, -0.5, 0.0),
    Vertex::new(0.0, 0.5, 0.0),
];

/// A vertex array + buffer pair holding static geometry.
///
/// The GPU copy is uploaded exactly once at construction and there is no way
/// to mutate it afterward; this is intentionally static geometry.
pub struct GeometryBuffer<G: GlApi> {
    vertex_array: G::VertexArray,
    buffer: G::Buffer,
    vertex_count: i32,
}

impl<G: GlApi> GeometryBuffer<G> {
    /// Uploads `vertices` and records `layout` on a fresh vertex array.
    pub fn upload(gl: &G, vertices: &[Vertex], layout: AttributeLayout) -> Result<Self> {
        let vertex_array = gl
            .create_vertex_array()
            .map_err(|reason| anyhow!("failed to create a vertex array: {reason}"))?;
        let buffer = gl
            .create_buffer()
            .map_err(|reason| anyhow!("failed to create a vertex buffer: {reason}"))?;

        // The vertex array must be bound first so it captures the attribute
        // setup below.
        gl.bind_vertex_array(Some(vertex_array));
        gl.bind_array_buffer(Some(buffer));
        gl.array_buffer_data(bytemuck::cast_slice(vertices));
        gl.float_attribute(&layout);

        Ok(Self {
            vertex_array,
            buffer,
            vertex_count: vertices.len() as i32,
        })
    }

    /// Makes this geometry current for subsequent draws.
    pub fn bind(&self, gl: &G) {
        gl.bind_vertex_array(Some(self.vertex_array));
    }

    /// Issues one draw call covering every uploaded vertex.
    pub fn draw(&self, gl: &G) {
        gl.draw_arrays(0, self.vertex_count);
    }

    /// Releases the GPU objects. Consumes the buffer; the handles must not be
    /// used afterward.
    pub fn destroy(self, gl: &G) {
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_buffer(self.buffer);
    }
}
