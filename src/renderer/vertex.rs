//! Vertex and instance layouts for 3D rendering

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};

/// Unit-mesh vertex with position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance model matrix, normal matrix and colour
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Inverse-transpose of the model's upper 3x3, columns padded to vec4
    pub normal: [[f32; 4]; 3],
}

/// Matrix that keeps normals perpendicular under non-uniform scale
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(model);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        // Flattened instance: nothing sensible to invert
        linear
    }
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        let n = normal_matrix(model);
        Self {
            model: model.to_cols_array_2d(),
            color,
            normal: [
                n.x_axis.extend(0.0).to_array(),
                n.y_axis.extend(0.0).to_array(),
                n.z_axis.extend(0.0).to_array(),
            ],
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// World-space direction toward the light (w unused)
    pub light_dir: [f32; 4],
}

/// 8-bit sRGB to a float colour
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Decode an sRGB colour for a linear render target
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    let decode = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [decode(color[0]), decode(color[1]), decode(color[2]), color[3]]
}

/// Colors for game elements
pub mod colors {
    use super::rgb;

    pub const SKY: [f32; 4] = rgb(135, 206, 235);
    pub const SUN: [f32; 4] = rgb(255, 255, 0);
    pub const SKY_DOME: [f32; 4] = rgb(0, 0, 255);
    pub const ROAD: [f32; 4] = rgb(51, 51, 51);
    pub const SIDEWALK: [f32; 4] = rgb(180, 180, 180);
    pub const STRIPE: [f32; 4] = rgb(255, 255, 0);
    pub const CAR_BODY: [f32; 4] = rgb(0, 0, 0);
    pub const CAR_TRIM: [f32; 4] = rgb(128, 128, 128);
    pub const COIN_FACE: [f32; 4] = rgb(255, 210, 0);
    pub const COIN_HUB: [f32; 4] = rgb(255, 180, 0);
    pub const BUILDING_AMBER: [f32; 4] = rgb(255, 200, 0);
    pub const BUILDING_TEAL: [f32; 4] = rgb(15, 55, 70);
    pub const BUILDING_GREEN: [f32; 4] = rgb(20, 120, 20);
    pub const BUILDING_MAUVE: [f32; 4] = rgb(85, 55, 70);
    pub const BUILDING_RED: [f32; 4] = rgb(205, 55, 70);
    pub const BUILDING_PURPLE: [f32; 4] = rgb(80, 9, 90);
}
