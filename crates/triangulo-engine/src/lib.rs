//! Triangulo engine crate.
//!
//! Owns the platform + OpenGL runtime pieces: window/event loop, GL context
//! creation, shader compilation, static geometry, and the per-frame renderer.

pub mod geometry;
pub mod gl;
pub mod render;
pub mod shader;
pub mod window;

pub mod logging;
