//! 01-cubes: an 11x11 grid of rotating cubes, one draw call per cube.
//!
//! Run: cargo run --manifest-path demos/Cargo.toml --bin cubes

use cubeworks::{init_logging, run_sample, CubesSample};

fn main() {
    init_logging();

    if let Err(e) = run_sample(CubesSample::new()) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
