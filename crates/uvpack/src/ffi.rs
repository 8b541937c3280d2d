//! C ABI mirror of the atlas engine's output structs.
//!
//! A host (typically JS driving a WASM build) hands us raw pointers into
//! linear memory. [`copy_uv`] keeps the engine's original contract: no
//! validation, the caller sizes `output` from a `vertex_count` it read
//! earlier. Prefer [`crate::pack`] from Rust.

#![allow(unsafe_code)]

use std::ffi::c_void;
use std::ptr;

use glam::UVec2;

use crate::error::PackResult;
use crate::pack::write_vertices;
use crate::{Atlas, Mesh, Vertex};

/// `xatlasChart`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct XatlasChart {
    pub face_array: *mut u32,
    pub atlas_index: u32,
    pub face_count: u32,
    pub chart_type: u32,
    pub material: u32,
}

/// `xatlasMesh`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct XatlasMesh {
    pub chart_array: *mut XatlasChart,
    pub index_array: *mut u32,
    pub vertex_array: *mut Vertex,
    pub chart_count: u32,
    pub index_count: u32,
    pub vertex_count: u32,
}

/// `xatlasAtlas`. The engine allocates more than this; never create one by
/// value and hand it back.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct XatlasAtlas {
    pub image: *mut u32,
    pub meshes: *mut XatlasMesh,
    pub utilization: *mut f32,
    pub width: u32,
    pub height: u32,
    pub atlas_count: u32,
    pub chart_count: u32,
    pub mesh_count: u32,
    pub texels_per_unit: f32,
}

// Layout as seen by a wasm32 host.
#[cfg(target_pointer_width = "32")]
const _: () = {
    assert!(std::mem::size_of::<XatlasChart>() == 20);
    assert!(std::mem::size_of::<XatlasMesh>() == 24);
    assert!(std::mem::size_of::<XatlasAtlas>() == 36);
};

impl XatlasAtlas {
    /// Validated copy of the fields packing needs.
    pub fn to_atlas(&self) -> PackResult<Atlas> {
        Ok(Atlas::new(self.width, self.height)?
            .with_counts(self.atlas_count, self.chart_count, self.mesh_count)
            .with_texels_per_unit(self.texels_per_unit))
    }

    /// Output meshes, one per `AddMesh` call.
    ///
    /// # Safety
    ///
    /// `meshes` must be null or point to `mesh_count` initialized meshes that
    /// outlive the returned slice.
    #[must_use]
    pub unsafe fn meshes(&self) -> &[XatlasMesh] {
        // SAFETY: forwarded to the caller.
        unsafe { raw_slice(self.meshes, self.mesh_count) }
    }
}

impl XatlasMesh {
    /// Borrow the vertex and index arrays as a [`Mesh`].
    ///
    /// # Safety
    ///
    /// `vertex_array` and `index_array` must each be null or point to
    /// `vertex_count` / `index_count` initialized elements that outlive the
    /// returned mesh.
    #[must_use]
    pub unsafe fn as_mesh(&self) -> Mesh<'_> {
        // SAFETY: forwarded to the caller.
        let (vertices, indices) = unsafe {
            (
                raw_slice(self.vertex_array, self.vertex_count),
                raw_slice(self.index_array, self.index_count),
            )
        };
        Mesh {
            vertices,
            indices,
            chart_count: self.chart_count,
        }
    }
}

/// Copy original indices and normalized UVs of `mesh` into `output`.
///
/// Writes `vertex_count` u32 indices followed directly by `2 * vertex_count`
/// f32 coordinates and returns `vertex_count`. A zero-sized atlas yields
/// infinite or NaN coordinates rather than an error. Returns 0 without
/// touching memory if any pointer is null, including a null `vertex_array`
/// on a mesh that claims vertices.
///
/// # Safety
///
/// - `atlas` and `mesh` must point to valid engine output for the duration
///   of the call, with `mesh.vertex_array` holding `mesh.vertex_count`
///   vertices.
/// - `output` must be 4-byte aligned, writable for `12 * vertex_count` bytes
///   and must not overlap the mesh.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub unsafe extern "C" fn copy_uv(
    atlas: *const XatlasAtlas,
    mesh: *const XatlasMesh,
    output: *mut c_void,
) -> u32 {
    // SAFETY: null or valid per the function contract.
    let (Some(atlas), Some(mesh)) = (unsafe { atlas.as_ref() }, unsafe { mesh.as_ref() }) else {
        return 0;
    };
    if output.is_null() || (mesh.vertex_count != 0 && mesh.vertex_array.is_null()) {
        return 0;
    }

    let vertex_count = mesh.vertex_count;
    let n = vertex_count as usize;
    let index_ptr = output.cast::<u32>();
    // SAFETY: the caller guarantees `output` covers `n` indices then `n` UV
    // pairs, aligned and disjoint from the mesh arrays.
    let (vertices, indices, uvs) = unsafe {
        (
            raw_slice(mesh.vertex_array, vertex_count),
            raw_slice_mut(index_ptr, vertex_count),
            raw_slice_mut(index_ptr.add(n).cast::<[f32; 2]>(), vertex_count),
        )
    };

    let scale = UVec2::new(atlas.width, atlas.height).as_vec2();
    write_vertices(scale, vertices, indices, uvs);
    vertex_count
}

// `from_raw_parts` needs a non-null pointer even for empty slices.
unsafe fn raw_slice<'a, T>(data: *const T, len: u32) -> &'a [T] {
    if data.is_null() || len == 0 {
        return &[];
    }
    // SAFETY: forwarded to the caller.
    unsafe { std::slice::from_raw_parts(data, len as usize) }
}

unsafe fn raw_slice_mut<'a, T>(data: *mut T, len: u32) -> &'a mut [T] {
    if data.is_null() || len == 0 {
        return &mut [];
    }
    // SAFETY: forwarded to the caller.
    unsafe { std::slice::from_raw_parts_mut(data, len as usize) }
}

impl Default for XatlasMesh {
    fn default() -> Self {
        Self {
            chart_array: ptr::null_mut(),
            index_array: ptr::null_mut(),
            vertex_array: ptr::null_mut(),
            chart_count: 0,
            index_count: 0,
            vertex_count: 0,
        }
    }
}

impl Default for XatlasAtlas {
    fn default() -> Self {
        Self {
            image: ptr::null_mut(),
            meshes: ptr::null_mut(),
            utilization: ptr::null_mut(),
            width: 0,
            height: 0,
            atlas_count: 0,
            chart_count: 0,
            mesh_count: 0,
            texels_per_unit: 0.0,
        }
    }
}
