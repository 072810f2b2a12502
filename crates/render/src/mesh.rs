use crate::error::GfxError;
use crate::gl::{AttributeType, BufferTarget, GraphicsApi, INVALID};

/// One interleaved vertex attribute: `components` values of type `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub components: u8,
    pub kind: AttributeType,
}

impl VertexAttribute {
    pub const POSITION: VertexAttribute = VertexAttribute::f32(3);
    pub const UV: VertexAttribute = VertexAttribute::f32(2);

    pub const fn f32(components: u8) -> Self {
        Self {
            components,
            kind: AttributeType::F32,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.components as usize * self.kind.size_bytes()
    }
}

/// Per-vertex byte size of an interleaved layout.
pub fn layout_stride(layout: &[VertexAttribute]) -> usize {
    layout.iter().map(VertexAttribute::size_bytes).sum()
}

/// Byte offset of every attribute inside one vertex.
pub fn layout_offsets(layout: &[VertexAttribute]) -> Vec<usize> {
    layout
        .iter()
        .scan(0usize, |offset, attr| {
            let this = *offset;
            *offset += attr.size_bytes();
            Some(this)
        })
        .collect()
}

/// GPU-resident geometry: vertex array, vertex buffer and optional index
/// buffer.
///
/// A mesh is owned by whatever created it. [`Mesh::destroy`] releases the
/// three objects and zeroes the handles, so destroying twice is harmless.
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    vao: u32,
    vbo: u32,
    ebo: u32,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    /// Upload `vertices` (and `indices`, if any) and configure `layout`.
    ///
    /// If the GPU refuses to create an object the failure is logged and an
    /// invalid mesh is returned; nothing created up to that point leaks.
    pub fn create<G: GraphicsApi>(
        gl: &G,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: &[VertexAttribute],
    ) -> Self {
        match Self::try_create(gl, vertices, indices, layout) {
            Ok(mesh) => mesh,
            Err(e) => {
                tracing::error!("{e}");
                Self::invalid()
            }
        }
    }

    fn try_create<G: GraphicsApi>(
        gl: &G,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: &[VertexAttribute],
    ) -> Result<Self, GfxError> {
        let indices = indices.filter(|i| !i.is_empty());
        let mut mesh = Self::invalid();

        if let Err(e) = mesh.allocate(gl, indices.is_some()) {
            mesh.destroy(gl);
            return Err(e);
        }

        gl.bind_vertex_array(mesh.vao);
        gl.bind_buffer(BufferTarget::Array, mesh.vbo);
        gl.buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices));
        if let Some(indices) = indices {
            gl.bind_buffer(BufferTarget::ElementArray, mesh.ebo);
            gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));
            mesh.index_count = indices.len() as u32;
        }

        let stride = layout_stride(layout);
        for (index, (attr, offset)) in layout.iter().zip(layout_offsets(layout)).enumerate() {
            gl.vertex_attrib_pointer(
                index as u32,
                attr.components as i32,
                attr.kind,
                stride as i32,
                offset as i32,
            );
            gl.enable_vertex_attrib_array(index as u32);
        }

        if stride > 0 {
            let bytes = std::mem::size_of_val(vertices);
            if bytes % stride != 0 {
                tracing::warn!(bytes, stride, "vertex data is not a whole number of vertices");
            }
            mesh.vertex_count = (bytes / stride) as u32;
        }

        tracing::debug!(
            vao = mesh.vao,
            vertices = mesh.vertex_count,
            indices = mesh.index_count,
            "mesh created"
        );
        Ok(mesh)
    }

    fn allocate<G: GraphicsApi>(&mut self, gl: &G, with_indices: bool) -> Result<(), GfxError> {
        self.vao = gl
            .create_vertex_array()
            .map_err(create_err("vertex array"))?;
        self.vbo = gl.create_buffer().map_err(create_err("vertex buffer"))?;
        if with_indices {
            self.ebo = gl.create_buffer().map_err(create_err("index buffer"))?;
        }
        Ok(())
    }

    fn invalid() -> Self {
        Self {
            vao: INVALID,
            vbo: INVALID,
            ebo: INVALID,
            vertex_count: 0,
            index_count: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.vao != INVALID && self.vbo != INVALID
    }

    /// `(vao, vbo, ebo)`.
    pub fn handles(&self) -> (u32, u32, u32) {
        (self.vao, self.vbo, self.ebo)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Make this mesh's vertex layout the active one.
    pub fn bind<G: GraphicsApi>(&self, gl: &G) {
        gl.bind_vertex_array(self.vao);
    }

    /// Bind and draw as triangles, indexed when an index buffer exists.
    pub fn draw<G: GraphicsApi>(&self, gl: &G) {
        if !self.is_valid() {
            return;
        }
        self.bind(gl);
        if self.index_count > 0 {
            gl.draw_elements(self.index_count as i32);
        } else {
            gl.draw_arrays(0, self.vertex_count as i32);
        }
    }

    /// Release the GPU objects. A second call finds zeroed handles and does
    /// nothing.
    pub fn destroy<G: GraphicsApi>(&mut self, gl: &G) {
        if self.ebo != INVALID {
            gl.delete_buffer(self.ebo);
        }
        if self.vbo != INVALID {
            gl.delete_buffer(self.vbo);
        }
        if self.vao != INVALID {
            gl.delete_vertex_array(self.vao);
        }
        *self = Self::invalid();
    }
}

fn create_err(what: &'static str) -> impl Fn(String) -> GfxError {
    move |reason| GfxError::Create { what, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{GlCall, HeadlessGl};

    const QUAD: [f32; 20] = [
        0.5, 0.5, 0.0, 1.0, 0.0, //
        0.5, -0.5, 0.0, 1.0, 1.0, //
        -0.5, -0.5, 0.0, 0.0, 1.0, //
        -0.5, 0.5, 0.0, 0.0, 0.0,
    ];
    const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];
    const LAYOUT: [VertexAttribute; 2] = [VertexAttribute::POSITION, VertexAttribute::UV];

    #[test]
    fn stride_and_offsets_are_cumulative() {
        assert_eq!(layout_stride(&LAYOUT), 20);
        assert_eq!(layout_offsets(&LAYOUT), vec![0, 12]);

        let mixed = [
            VertexAttribute::f32(3),
            VertexAttribute {
                components: 4,
                kind: AttributeType::U8,
            },
            VertexAttribute::f32(2),
        ];
        assert_eq!(layout_stride(&mixed), 12 + 4 + 8);
        assert_eq!(layout_offsets(&mixed), vec![0, 12, 16]);
    }

    #[test]
    fn create_configures_layout() {
        let gl = HeadlessGl::new();
        let mesh = Mesh::create(&gl, &QUAD, Some(&QUAD_INDICES), &LAYOUT);
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);

        let calls = gl.calls();
        assert!(calls.contains(&GlCall::BufferData(BufferTarget::Array, 80)));
        assert!(calls.contains(&GlCall::BufferData(BufferTarget::ElementArray, 24)));
        assert!(calls.contains(&GlCall::VertexAttribPointer {
            index: 1,
            components: 2,
            kind: AttributeType::F32,
            stride: 20,
            offset: 12,
        }));
        assert!(calls.contains(&GlCall::EnableVertexAttribArray(0)));
        assert!(calls.contains(&GlCall::EnableVertexAttribArray(1)));
    }

    #[test]
    fn no_index_buffer_without_indices() {
        let gl = HeadlessGl::new();
        let mesh = Mesh::create(&gl, &QUAD, None, &LAYOUT);
        assert_eq!(mesh.handles().2, INVALID);
        assert_eq!(gl.live_objects(), 2);
    }

    #[test]
    fn draw_picks_indexed_or_array() {
        let gl = HeadlessGl::new();
        let indexed = Mesh::create(&gl, &QUAD, Some(&QUAD_INDICES), &LAYOUT);
        let arrays = Mesh::create(&gl, &QUAD, None, &LAYOUT);
        gl.take_calls();

        indexed.draw(&gl);
        arrays.draw(&gl);
        let calls = gl.calls();
        assert!(calls.contains(&GlCall::DrawElements { count: 6 }));
        assert!(calls.contains(&GlCall::DrawArrays { first: 0, count: 4 }));
    }

    #[test]
    fn creation_failure_yields_invalid_mesh() {
        let gl = HeadlessGl::new();
        gl.fail_creation(true);
        let mesh = Mesh::create(&gl, &QUAD, Some(&QUAD_INDICES), &LAYOUT);
        assert!(!mesh.is_valid());
        assert_eq!(mesh.handles(), (INVALID, INVALID, INVALID));

        gl.take_calls();
        mesh.draw(&gl);
        assert_eq!(gl.draw_count(), 0);
    }

    #[test]
    fn destroy_twice_is_a_noop() {
        let gl = HeadlessGl::new();
        let mut mesh = Mesh::create(&gl, &QUAD, Some(&QUAD_INDICES), &LAYOUT);
        mesh.destroy(&gl);
        assert_eq!(mesh.handles(), (INVALID, INVALID, INVALID));
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(gl.live_objects(), 0);

        gl.take_calls();
        mesh.destroy(&gl);
        assert!(gl.calls().is_empty());
        assert_eq!(mesh.handles(), (INVALID, INVALID, INVALID));
    }
}
