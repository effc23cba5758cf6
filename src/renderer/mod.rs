//! WebGPU rendering module
//!
//! `scene` turns game state into draw commands; `pipeline` draws them as
//! instanced unit meshes with a perspective camera.

pub mod camera;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use camera::{Camera, css_viewport};
pub use pipeline::RenderState;
pub use scene::{DrawCommand, Layer, Paint, Primitive, Scene, build_scene};
