//! Cube rendering on top of the core primitives

pub mod cube;
pub mod instanced;
pub mod program;
pub mod submit;
pub mod view;

pub use cube::{CubeMesh, CUBE_INDICES, CUBE_VERTICES};
pub use instanced::InstancedCubeRenderer;
pub use program::{Program, ProgramError, ProgramLibrary, ProgramOrigin, SHADER_DIR_ENV};
pub use submit::CubeRenderer;
pub use view::{Camera, CameraUniform, ModelUniform, ViewTransform, Viewport};
