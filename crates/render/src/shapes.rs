//! Built-in geometry.

use crate::gl::GraphicsApi;
use crate::mesh::{Mesh, VertexAttribute};

const POSITION_UV: [VertexAttribute; 2] = [VertexAttribute::POSITION, VertexAttribute::UV];

#[rustfmt::skip]
pub const SQUARE_VERTICES: [f32; 20] = [
    // position          uv
     0.5,  0.5, 0.0,     1.0, 0.0,
     0.5, -0.5, 0.0,     1.0, 1.0,
    -0.5, -0.5, 0.0,     0.0, 1.0,
    -0.5,  0.5, 0.0,     0.0, 0.0,
];

pub const SQUARE_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 180] = [
    -0.5, -0.5, -0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 0.0,

    -0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,

    -0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5,  0.5,  1.0, 0.0,

     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5,  0.5,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,

    -0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0, 1.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,

    -0.5,  0.5, -0.5,  0.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
];

/// Unit-radius cube seen from the inside, positions only.
#[rustfmt::skip]
pub const SKYBOX_VERTICES: [f32; 108] = [
    -1.0,  1.0, -1.0,
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,

    -1.0, -1.0,  1.0,
    -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,

     1.0, -1.0, -1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,

    -1.0, -1.0,  1.0,
    -1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,

    -1.0,  1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
    -1.0,  1.0, -1.0,

    -1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
];

/// Indexed unit quad in the XY plane, position + uv.
pub fn square<G: GraphicsApi>(gl: &G) -> Mesh {
    Mesh::create(gl, &SQUARE_VERTICES, Some(&SQUARE_INDICES), &POSITION_UV)
}

/// Unit cube, 36 position + uv vertices, no index buffer.
pub fn cube<G: GraphicsApi>(gl: &G) -> Mesh {
    Mesh::create(gl, &CUBE_VERTICES, None, &POSITION_UV)
}

pub fn skybox<G: GraphicsApi>(gl: &G) -> Mesh {
    Mesh::create(gl, &SKYBOX_VERTICES, None, &[VertexAttribute::POSITION])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{GlCall, HeadlessGl};

    #[test]
    fn square_is_indexed() {
        let gl = HeadlessGl::new();
        let mesh = square(&gl);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert!(SQUARE_INDICES.iter().all(|&i| i < 4));
    }

    #[test]
    fn cube_has_36_vertices() {
        let gl = HeadlessGl::new();
        let mesh = cube(&gl);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.index_count(), 0);

        gl.take_calls();
        mesh.draw(&gl);
        assert!(gl.calls().contains(&GlCall::DrawArrays { first: 0, count: 36 }));
    }

    #[test]
    fn cube_spans_unit_extent() {
        for v in CUBE_VERTICES.chunks_exact(5) {
            assert!(v[..3].iter().all(|c| c.abs() == 0.5));
            assert!(v[3..].iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn skybox_is_position_only() {
        let gl = HeadlessGl::new();
        let mesh = skybox(&gl);
        assert_eq!(mesh.vertex_count(), 36);
        let pointers = gl
            .calls()
            .iter()
            .filter(|c| matches!(c, GlCall::VertexAttribPointer { .. }))
            .count();
        assert_eq!(pointers, 1);
        assert!(SKYBOX_VERTICES.iter().all(|c| c.abs() == 1.0));
    }
}
