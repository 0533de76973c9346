use std::fmt;

/// One compilable shader stage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// How a raw float sequence in a buffer maps onto one vertex attribute.
///
/// `stride` and `offset` are in float components, not bytes; the backend
/// converts when it talks to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeLayout {
    /// Attribute slot (`layout (location = N)` in the shader).
    pub index: u32,
    /// Components per vertex for this attribute.
    pub components: i32,
    /// Distance between consecutive vertices.
    pub stride: i32,
    /// Position of the first component within a vertex.
    pub offset: i32,
}

/// The GL call surface this program uses, behind an explicit context object.
///
/// Handle types are associated so the production backend can use the driver's
/// opaque handles while tests substitute plain integers. Creation can fail
/// (a lost context reports handle-allocation failure); everything else is
/// fire-and-forget command submission, matching the underlying API.
pub trait GlApi {
    type Shader: Copy + fmt::Debug + PartialEq;
    type Program: Copy + fmt::Debug + PartialEq;
    type Buffer: Copy + fmt::Debug + PartialEq;
    type VertexArray: Copy + fmt::Debug + PartialEq;

    // shader stages
    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // programs
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    // vertex buffers + attribute layout
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the bound array buffer with STATIC_DRAW usage.
    fn array_buffer_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    /// Describes and enables one float attribute on the bound vertex array.
    fn float_attribute(&self, layout: &AttributeLayout);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    // frame
    fn set_clear_color(&self, color: [f32; 4]);
    fn clear_color_buffer(&self);
    /// Draws `count` vertices as triangles, starting at `first`.
    fn draw_arrays(&self, first: i32, count: i32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
}
