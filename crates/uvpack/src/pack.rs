//! Index and UV packing.

use glam::Vec2;

use crate::buffer::{PackedUvBuffer, PackedUvsMut};
use crate::error::{PackError, PackResult};
use crate::{Atlas, Mesh, Vertex};

/// Pack a mesh's source-vertex indices and normalized UVs into `output`.
///
/// For every vertex `i`, in array order:
/// - `indices[i] = vertices[i].xref`
/// - `uvs[i] = (vertices[i].uv[0] / width, vertices[i].uv[1] / height)`
///
/// Coordinates are not clamped; anything outside `[0, 1]` is passed through
/// as the engine produced it.
///
/// # Arguments
///
/// * `atlas` - The atlas the mesh was packed into
/// * `mesh` - The output mesh to read vertices from
/// * `output` - A view sized for exactly `mesh.vertex_count()` vertices
///
/// # Returns
///
/// The number of vertices written. Nothing is written on error.
pub fn pack(atlas: &Atlas, mesh: &Mesh<'_>, output: &mut PackedUvsMut<'_>) -> PackResult<usize> {
    let vertex_count = mesh.vertex_count();
    if output.vertex_count() != vertex_count {
        tracing::debug!(
            expected = output.vertex_count(),
            actual = vertex_count,
            "output view sized for a different mesh"
        );
        return Err(PackError::VertexCountMismatch {
            expected: output.vertex_count(),
            actual: vertex_count,
        });
    }

    tracing::trace!(
        vertex_count,
        width = atlas.width(),
        height = atlas.height(),
        "packing atlas uvs"
    );
    let (indices, uvs) = output.split_mut();
    write_vertices(atlas_scale(atlas), mesh.vertices, indices, uvs);
    Ok(vertex_count)
}

/// Pack a mesh into a newly allocated buffer of exactly the right size.
///
/// Only fails with [`PackError::LayoutOverflow`], which a real vertex slice
/// cannot reach.
pub fn pack_to_vec(atlas: &Atlas, mesh: &Mesh<'_>) -> PackResult<PackedUvBuffer> {
    let mut buffer = PackedUvBuffer::new(mesh.vertex_count())?;
    pack(atlas, mesh, &mut buffer.as_view_mut())?;
    Ok(buffer)
}

/// Convert a texel-space coordinate into the `[0, 1]` range of `atlas`.
#[must_use]
pub fn normalize_uv(atlas: &Atlas, uv: [f32; 2]) -> Vec2 {
    Vec2::from(uv) / atlas_scale(atlas)
}

fn atlas_scale(atlas: &Atlas) -> Vec2 {
    atlas.size().as_vec2()
}

/// Shared by [`pack`] and the unchecked C entry point. Writes
/// `min(vertices, indices, uvs)` entries.
pub(crate) fn write_vertices(
    scale: Vec2,
    vertices: &[Vertex],
    indices: &mut [u32],
    uvs: &mut [[f32; 2]],
) {
    for ((vertex, index), uv) in vertices.iter().zip(indices).zip(uvs) {
        *index = vertex.xref;
        *uv = (Vec2::from(vertex.uv) / scale).to_array();
    }
}
