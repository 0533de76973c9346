//! Call-recording [`GlApi`] substitute for tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::api::{AttributeLayout, GlApi, StageKind};

/// One recorded GL call, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateShader(StageKind),
    ShaderSource { shader: u32, len: usize },
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram,
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateBuffer,
    BindArrayBuffer(Option<u32>),
    ArrayBufferData { len: usize },
    DeleteBuffer(u32),
    CreateVertexArray,
    BindVertexArray(Option<u32>),
    FloatAttribute(AttributeLayout),
    DeleteVertexArray(u32),
    SetClearColor([f32; 4]),
    ClearColorBuffer,
    DrawArrays { first: i32, count: i32 },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
}

/// Records every call and hands out sequential `u32` handles. Compilation and
/// linking succeed unless scripted to fail via [`fail_compile`] /
/// [`fail_link`].
///
/// [`fail_compile`]: RecordingGl::fail_compile
/// [`fail_link`]: RecordingGl::fail_link
#[derive(Default)]
pub(crate) struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    shader_kinds: RefCell<HashMap<u32, StageKind>>,
    compile_failure: RefCell<Option<(StageKind, String)>>,
    link_failure: RefCell<Option<String>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts compilation of the given stage kind to fail with `log`.
    pub fn fail_compile(&self, kind: StageKind, log: &str) {
        *self.compile_failure.borrow_mut() = Some((kind, log.to_string()));
    }

    /// Scripts program linking to fail with `log`.
    pub fn fail_link(&self, log: &str) {
        *self.link_failure.borrow_mut() = Some(log.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Index of the first call matching `pred`, if any.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(|c| pred(c))
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }

    fn shader_fails(&self, shader: u32) -> Option<String> {
        let kind = self.shader_kinds.borrow().get(&shader).copied()?;
        match &*self.compile_failure.borrow() {
            Some((failing, log)) if *failing == kind => Some(log.clone()),
            _ => None,
        }
    }
}

impl GlApi for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let shader = self.alloc();
        self.shader_kinds.borrow_mut().insert(shader, kind);
        self.record(Call::CreateShader(kind));
        Ok(shader)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record(Call::ShaderSource {
            shader,
            len: source.len(),
        });
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.shader_fails(shader).is_none()
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shader_fails(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        self.record(Call::CreateProgram);
        Ok(self.alloc())
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader { program, shader });
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn link_status(&self, _program: u32) -> bool {
        self.link_failure.borrow().is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_failure.borrow().clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        self.record(Call::CreateBuffer);
        Ok(self.alloc())
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[u8]) {
        self.record(Call::ArrayBufferData { len: data.len() });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        self.record(Call::CreateVertexArray);
        Ok(self.alloc())
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn float_attribute(&self, layout: &AttributeLayout) {
        self.record(Call::FloatAttribute(*layout));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn set_clear_color(&self, color: [f32; 4]) {
        self.record(Call::SetClearColor(color));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::ClearColorBuffer);
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        self.record(Call::DrawArrays { first, count });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport {
            x,
            y,
            width,
            height,
        });
    }
}
