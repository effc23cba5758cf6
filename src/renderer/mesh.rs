//! Unit mesh generation for 3D primitives
//!
//! Every mesh is centred on the origin with unit extents so a single model
//! matrix (scale, rotate, translate) places it: the cube spans ±0.5, the
//! sphere has radius 1, the cylinder has radius 1 and height 1 along y.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::vertex::MeshVertex;

fn vertex(p: Vec3, n: Vec3) -> MeshVertex {
    MeshVertex::new(p.to_array(), n.to_array())
}

/// Triangle list for a unit cube (36 vertices)
pub fn cube() -> Vec<MeshVertex> {
    // (normal, tangent u, tangent v) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let c = n * 0.5;
        let corner = |su: f32, sv: f32| vertex(c + u * (0.5 * su) + v * (0.5 * sv), n);
        let (a, b, cc, d) = (
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        );
        // Two triangles
        vertices.extend_from_slice(&[a, b, cc, a, cc, d]);
    }
    vertices
}

fn sphere_point(lat: u32, lon: u32, rings: u32, segments: u32) -> Vec3 {
    let phi = PI * lat as f32 / rings as f32;
    let theta = TAU * lon as f32 / segments as f32;
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Triangle list for a unit UV sphere
pub fn sphere(segments: u32) -> Vec<MeshVertex> {
    let segments = segments.max(3);
    let rings = (segments / 2).max(2);
    let mut vertices = Vec::with_capacity((segments * rings * 6) as usize);

    for lat in 0..rings {
        for lon in 0..segments {
            let p00 = sphere_point(lat, lon, rings, segments);
            let p01 = sphere_point(lat, lon + 1, rings, segments);
            let p10 = sphere_point(lat + 1, lon, rings, segments);
            let p11 = sphere_point(lat + 1, lon + 1, rings, segments);

            // Normals of a unit sphere are the positions themselves
            vertices.push(vertex(p00, p00));
            vertices.push(vertex(p10, p10));
            vertices.push(vertex(p01, p01));

            vertices.push(vertex(p01, p01));
            vertices.push(vertex(p10, p10));
            vertices.push(vertex(p11, p11));
        }
    }
    vertices
}

/// Line list for a unit sphere's latitude and longitude lines
pub fn sphere_wireframe(segments: u32) -> Vec<MeshVertex> {
    let segments = segments.max(3);
    let rings = (segments / 2).max(2);
    let mut vertices = Vec::with_capacity((segments * rings * 4) as usize);

    for lat in 0..rings {
        for lon in 0..segments {
            let p = sphere_point(lat, lon, rings, segments);
            // Along the parallel
            let east = sphere_point(lat, lon + 1, rings, segments);
            // Down the meridian
            let south = sphere_point(lat + 1, lon, rings, segments);
            vertices.extend_from_slice(&[
                vertex(p, p),
                vertex(east, east),
                vertex(p, p),
                vertex(south, south),
            ]);
        }
    }
    vertices
}

/// Triangle list for a unit cylinder along y, with caps
pub fn cylinder(segments: u32) -> Vec<MeshVertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 12) as usize);
    let top = Vec3::new(0.0, 0.5, 0.0);
    let bottom = Vec3::new(0.0, -0.5, 0.0);

    for i in 0..segments {
        let t1 = TAU * i as f32 / segments as f32;
        let t2 = TAU * (i + 1) as f32 / segments as f32;
        let r1 = Vec3::new(t1.cos(), 0.0, t1.sin());
        let r2 = Vec3::new(t2.cos(), 0.0, t2.sin());

        // Side quad
        vertices.push(vertex(r1 + bottom, r1));
        vertices.push(vertex(r2 + bottom, r2));
        vertices.push(vertex(r2 + top, r2));

        vertices.push(vertex(r1 + bottom, r1));
        vertices.push(vertex(r2 + top, r2));
        vertices.push(vertex(r1 + top, r1));

        // Caps
        vertices.push(vertex(top, Vec3::Y));
        vertices.push(vertex(r2 + top, Vec3::Y));
        vertices.push(vertex(r1 + top, Vec3::Y));

        vertices.push(vertex(bottom, Vec3::NEG_Y));
        vertices.push(vertex(r1 + bottom, Vec3::NEG_Y));
        vertices.push(vertex(r2 + bottom, Vec3::NEG_Y));
    }
    vertices
}
