//! OpenGL abstraction layer.
//!
//! The binding model of GL (current program, bound vertex array, viewport) is
//! process-wide state. Rather than reaching that state through hidden globals,
//! everything that talks to the GPU goes through an explicit [`GlApi`] object
//! passed by reference. The production implementation is [`GlowBackend`];
//! tests run against a call-recording substitute.

mod api;
mod backend;
mod context;

#[cfg(test)]
pub(crate) mod mock;

pub use api::{AttributeLayout, GlApi, StageKind};
pub use backend::GlowBackend;
pub use context::GlContext;
