//! Draws one orange triangle in an 800x600 window until close or Escape.

use std::process;

use anyhow::Result;
use triangulo_engine::logging::{LoggingConfig, init_logging};
use triangulo_engine::render::RenderInit;
use triangulo_engine::window::{Runtime, RuntimeConfig};

fn run() -> Result<()> {
    // Defaults: "Triangulo OpenGL", 800x600, black clear color, and the
    // log-and-continue shader failure policy.
    Runtime::run(RuntimeConfig::default(), RenderInit::default())
}

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        log::error!("fatal: {err:#}");
        // Initialization failures exit -1; a normal window close exits 0.
        process::exit(-1);
    }
}
