//! Pack xatlas per-vertex output into a flat buffer for a host caller.
//!
//! After the atlas engine has generated charts, every output mesh carries a
//! vertex array whose entries point back at the source vertex (`xref`) and
//! hold a texture coordinate in atlas pixel space. This crate copies those
//! two fields into one contiguous buffer:
//!
//! ```text
//! [ xref_0 .. xref_{n-1} | u_0 v_0 .. u_{n-1} v_{n-1} ]
//!   n x u32                2n x f32, divided by atlas width / height
//! ```
//!
//! The regions are adjacent with no padding, so the buffer is exactly
//! `12 * n` bytes (see [`OutputLayout`]).
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Validated views**: Buffers are checked for size and alignment once,
//!   when the view is built, so [`pack`] itself is a plain loop
//! - **Web-compatible**: Compiles to WASM; [`ffi::copy_uv`] is the raw entry
//!   point a JS host calls against linear memory
//!
//! # Key functions
//!
//! - [`pack`]: Pack a mesh into a validated output view
//! - [`pack_to_vec`]: Pack a mesh into a freshly allocated [`PackedUvBuffer`]
//! - [`packed_size`]: Number of bytes a caller must allocate
//! - [`PackedUvs::from_bytes`]: Read a packed buffer back

mod error;

pub mod buffer;
pub mod ffi;
pub mod layout;
pub mod pack;

pub use buffer::{PackedUvBuffer, PackedUvs, PackedUvsMut};
pub use error::{PackError, PackResult};
pub use layout::{OutputLayout, packed_size};
pub use pack::{normalize_uv, pack, pack_to_vec};

use glam::UVec2;

/// Output vertex as laid out by the atlas engine (20 bytes).
///
/// - `atlas_index`: Sub-atlas index, -1 if the vertex is in no atlas
/// - `chart_index`: Chart index, -1 if the vertex is in no chart
/// - `uv`: Texture coordinate in atlas texels (not normalized)
/// - `xref`: Index of the input vertex this output vertex came from
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub atlas_index: i32,
    pub chart_index: i32,
    pub uv: [f32; 2],
    pub xref: u32,
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 20);

impl Vertex {
    /// Vertex in the first atlas and chart.
    #[must_use]
    pub const fn new(xref: u32, uv: [f32; 2]) -> Self {
        Self {
            atlas_index: 0,
            chart_index: 0,
            uv,
            xref,
        }
    }
}

/// One output mesh of an atlas.
///
/// The vertex count is the length of `vertices`, so it can never disagree
/// with the array it describes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mesh<'a> {
    /// Output vertices, in the order the engine emitted them.
    pub vertices: &'a [Vertex],
    /// Triangle indices into `vertices`.
    pub indices: &'a [u32],
    /// Number of charts in this mesh.
    pub chart_count: u32,
}

impl<'a> Mesh<'a> {
    #[must_use]
    pub const fn new(vertices: &'a [Vertex]) -> Self {
        Self {
            vertices,
            indices: &[],
            chart_count: 0,
        }
    }

    #[must_use]
    pub const fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = indices;
        self
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Atlas-wide results reported by the engine.
///
/// Only `width` and `height` take part in packing; the remaining fields are
/// carried so a caller can keep the whole result in one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atlas {
    width: u32,
    height: u32,
    atlas_count: u32,
    chart_count: u32,
    mesh_count: u32,
    texels_per_unit: f32,
}

impl Atlas {
    /// Create an atlas description of `width` x `height` texels.
    ///
    /// Both dimensions must be non-zero, since every texture coordinate is
    /// divided by them.
    pub fn new(width: u32, height: u32) -> PackResult<Self> {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "rejecting atlas with zero dimension");
            return Err(PackError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            atlas_count: 0,
            chart_count: 0,
            mesh_count: 0,
            texels_per_unit: 0.0,
        })
    }

    /// Set the sub-atlas, chart and mesh counts.
    #[must_use]
    pub const fn with_counts(
        mut self,
        atlas_count: u32,
        chart_count: u32,
        mesh_count: u32,
    ) -> Self {
        self.atlas_count = atlas_count;
        self.chart_count = chart_count;
        self.mesh_count = mesh_count;
        self
    }

    #[must_use]
    pub const fn with_texels_per_unit(mut self, texels_per_unit: f32) -> Self {
        self.texels_per_unit = texels_per_unit;
        self
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Atlas dimensions in texels.
    #[must_use]
    pub const fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Number of sub-atlases (0 unless a fixed resolution was requested).
    #[must_use]
    pub const fn atlas_count(&self) -> u32 {
        self.atlas_count
    }

    /// Total number of charts in all meshes.
    #[must_use]
    pub const fn chart_count(&self) -> u32 {
        self.chart_count
    }

    #[must_use]
    pub const fn mesh_count(&self) -> u32 {
        self.mesh_count
    }

    #[must_use]
    pub const fn texels_per_unit(&self) -> f32 {
        self.texels_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_rejects_zero_dimensions() {
        assert_eq!(
            Atlas::new(0, 16),
            Err(PackError::ZeroDimension {
                width: 0,
                height: 16
            })
        );
        assert_eq!(
            Atlas::new(16, 0),
            Err(PackError::ZeroDimension {
                width: 16,
                height: 0
            })
        );
    }

    #[test]
    fn atlas_builder_keeps_dimensions() {
        let atlas = Atlas::new(100, 200)
            .unwrap()
            .with_counts(1, 4, 2)
            .with_texels_per_unit(32.0);
        assert_eq!(atlas.size(), UVec2::new(100, 200));
        assert_eq!(atlas.chart_count(), 4);
        assert_eq!(atlas.mesh_count(), 2);
        assert!((atlas.texels_per_unit() - 32.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mesh_vertex_count_is_slice_length() {
        let vertices = [Vertex::new(3, [1.0, 2.0]); 5];
        let mesh = Mesh::new(&vertices).with_indices(&[0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(Mesh::default().vertex_count(), 0);
    }
}
