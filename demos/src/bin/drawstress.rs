//! 17-drawstress: as many draw calls as the frame budget allows.
//!
//! Run: cargo run --release --manifest-path demos/Cargo.toml --bin drawstress
//!
//! The cube volume grows while frames average under 1/65 s and shrinks
//! while they average over 1/57 s.

use cubeworks::{init_logging, run_sample, DrawStressSample};

fn main() {
    init_logging();

    if let Err(e) = run_sample(DrawStressSample::new()) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
