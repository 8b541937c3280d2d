//! Typed views over the packed output buffer.
//!
//! The output is one allocation holding two regions of different element
//! types. Instead of re-deriving the UV pointer from the index pointer at
//! every call site, each view splits the memory once, from an
//! [`OutputLayout`], into an index slice and a UV slice that cannot overlap.

use bytemuck::Pod;
use glam::Vec2;

use crate::error::{PackError, PackResult};
use crate::layout::OutputLayout;

/// Writable view over caller-owned output memory.
#[derive(Debug)]
pub struct PackedUvsMut<'a> {
    indices: &'a mut [u32],
    uvs: &'a mut [[f32; 2]],
}

impl<'a> PackedUvsMut<'a> {
    /// Wrap a caller-allocated byte buffer sized for `vertex_count` vertices.
    ///
    /// The buffer must hold at least `12 * vertex_count` bytes and start on a
    /// 4-byte boundary. Bytes past the packed size are never touched.
    pub fn from_bytes(bytes: &'a mut [u8], vertex_count: usize) -> PackResult<Self> {
        let layout = OutputLayout::new(vertex_count)?;
        check_capacity(bytes.len(), layout)?;
        let (packed, _) = bytes.split_at_mut(layout.total_bytes());
        let (index_bytes, uv_bytes) = packed.split_at_mut(layout.uv_offset());
        Ok(Self {
            indices: cast_region_mut(index_bytes, 0)?,
            uvs: cast_region_mut(uv_bytes, layout.uv_offset())?,
        })
    }

    /// Wrap a word buffer, which is always suitably aligned.
    pub fn from_words(words: &'a mut [u32], vertex_count: usize) -> PackResult<Self> {
        let layout = OutputLayout::new(vertex_count)?;
        check_capacity(std::mem::size_of_val(words), layout)?;
        let (packed, _) = words.split_at_mut(layout.total_words());
        let (indices, uvs) = split_words_mut(packed, vertex_count);
        Ok(Self { indices, uvs })
    }

    /// Number of vertices this view was sized for.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &*self.indices
    }

    #[must_use]
    pub fn uvs(&self) -> &[[f32; 2]] {
        &*self.uvs
    }

    /// Borrow both regions mutably at once.
    pub fn split_mut(&mut self) -> (&mut [u32], &mut [[f32; 2]]) {
        (&mut *self.indices, &mut *self.uvs)
    }
}

/// Read-only view over a packed buffer, as the host sees it after packing.
#[derive(Debug, Clone, Copy)]
pub struct PackedUvs<'a> {
    indices: &'a [u32],
    uvs: &'a [[f32; 2]],
}

impl<'a> PackedUvs<'a> {
    /// Interpret `bytes` as the packed output of `vertex_count` vertices.
    pub fn from_bytes(bytes: &'a [u8], vertex_count: usize) -> PackResult<Self> {
        let layout = OutputLayout::new(vertex_count)?;
        check_capacity(bytes.len(), layout)?;
        let (packed, _) = bytes.split_at(layout.total_bytes());
        let (index_bytes, uv_bytes) = packed.split_at(layout.uv_offset());
        Ok(Self {
            indices: cast_region(index_bytes, 0)?,
            uvs: cast_region(uv_bytes, layout.uv_offset())?,
        })
    }

    pub fn from_words(words: &'a [u32], vertex_count: usize) -> PackResult<Self> {
        let layout = OutputLayout::new(vertex_count)?;
        check_capacity(std::mem::size_of_val(words), layout)?;
        let (packed, _) = words.split_at(layout.total_words());
        let (indices, uvs) = split_words(packed, vertex_count);
        Ok(Self { indices, uvs })
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    /// Original source-vertex index of every packed vertex.
    #[must_use]
    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    /// Normalized UV pairs.
    #[must_use]
    pub fn uvs(&self) -> &'a [[f32; 2]] {
        self.uvs
    }

    /// UV region as a flat `u0, v0, u1, v1, ...` slice.
    #[must_use]
    pub fn uv_floats(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.uvs)
    }

    /// Index and UV of vertex `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<(u32, Vec2)> {
        Some((*self.indices.get(i)?, Vec2::from(*self.uvs.get(i)?)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Vec2)> + 'a {
        self.indices
            .iter()
            .copied()
            .zip(self.uvs.iter().map(|&uv| Vec2::from(uv)))
    }
}

/// Owned, exactly sized output buffer.
///
/// Backed by `u32` words so both regions are always 4-byte aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedUvBuffer {
    words: Vec<u32>,
    layout: OutputLayout,
}

impl PackedUvBuffer {
    /// Zero-filled buffer for `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> PackResult<Self> {
        let layout = OutputLayout::new(vertex_count)?;
        Ok(Self {
            words: vec![0; layout.total_words()],
            layout,
        })
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.layout.vertex_count()
    }

    #[must_use]
    pub fn layout(&self) -> OutputLayout {
        self.layout
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        self.as_view().indices()
    }

    #[must_use]
    pub fn uvs(&self) -> &[[f32; 2]] {
        self.as_view().uvs()
    }

    /// The buffer exactly as it would sit in host memory.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    #[must_use]
    pub fn as_view(&self) -> PackedUvs<'_> {
        let (indices, uvs) = split_words(&self.words, self.layout.vertex_count());
        PackedUvs { indices, uvs }
    }

    pub fn as_view_mut(&mut self) -> PackedUvsMut<'_> {
        let (indices, uvs) = split_words_mut(&mut self.words, self.layout.vertex_count());
        PackedUvsMut { indices, uvs }
    }

    #[must_use]
    pub fn into_words(self) -> Vec<u32> {
        self.words
    }
}

fn check_capacity(actual: usize, layout: OutputLayout) -> PackResult<()> {
    let required = layout.total_bytes();
    if actual < required {
        tracing::debug!(required, actual, "output buffer too small");
        return Err(PackError::BufferTooSmall { required, actual });
    }
    Ok(())
}

// `words` must be exactly `3 * vertex_count` long.
fn split_words(words: &[u32], vertex_count: usize) -> (&[u32], &[[f32; 2]]) {
    let (indices, uvs) = words.split_at(vertex_count);
    (indices, bytemuck::cast_slice(uvs))
}

fn split_words_mut(words: &mut [u32], vertex_count: usize) -> (&mut [u32], &mut [[f32; 2]]) {
    let (indices, uvs) = words.split_at_mut(vertex_count);
    (indices, bytemuck::cast_slice_mut(uvs))
}

// Sizes are exact multiples of `T` by construction, so only alignment can fail.
fn cast_region<T: Pod>(bytes: &[u8], offset: usize) -> PackResult<&[T]> {
    if bytes.is_empty() {
        return Ok(&[]);
    }
    bytemuck::try_cast_slice(bytes).map_err(|_| misaligned(offset))
}

fn cast_region_mut<T: Pod>(bytes: &mut [u8], offset: usize) -> PackResult<&mut [T]> {
    if bytes.is_empty() {
        return Ok(&mut []);
    }
    bytemuck::try_cast_slice_mut(bytes).map_err(|_| misaligned(offset))
}

fn misaligned(offset: usize) -> PackError {
    tracing::debug!(offset, "output region misaligned");
    PackError::Misaligned { offset }
}
