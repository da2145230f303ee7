//! The three samples
//!
//! Each submodule has a pure layout function (transforms for a given time)
//! and a [`Sample`](crate::sample::Sample) that feeds it to a renderer.

pub mod cubes;
pub mod drawstress;
pub mod instancing;

pub use cubes::{cube_grid_transforms, CubesSample};
pub use drawstress::{drawstress_transforms, DrawStressSample};
pub use instancing::{instance_grid, InstancingSample};

use crate::renderer::view::Camera;
use glam::{Mat4, Vec3};

/// Cubes per side of the flat grid used by `cubes` and `instancing`.
pub const GRID_SIDE: u32 = 11;

/// Camera shared by the flat grid samples.
pub fn grid_camera() -> Camera {
    Camera::look_at(Vec3::new(0.0, 0.0, -35.0), Vec3::ZERO, Vec3::X)
}

/// Rotation about X by `ax`, then about Y by `ay`.
fn rotate_xy(ax: f32, ay: f32) -> Mat4 {
    Mat4::from_rotation_y(ay) * Mat4::from_rotation_x(ax)
}

/// Position of cell (`x`, `y`) on the flat grid.
fn grid_position(x: u32, y: u32) -> Vec3 {
    Vec3::new(-15.0 + x as f32 * 3.0, -15.0 + y as f32 * 3.0, 0.0)
}

/// Rotation for grid cell (`x`, `y`) at `time`, placed at its grid position.
fn grid_transform(time: f32, x: u32, y: u32) -> Mat4 {
    Mat4::from_translation(grid_position(x, y))
        * rotate_xy(time + x as f32 * 0.21, time + y as f32 * 0.37)
}
