//! 05-instancing: the cube grid drawn with a single instanced draw call.
//!
//! Run: cargo run --manifest-path demos/Cargo.toml --bin instancing

use cubeworks::{init_logging, run_sample, InstancingSample};

fn main() {
    init_logging();

    if let Err(e) = run_sample(InstancingSample::new()) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
