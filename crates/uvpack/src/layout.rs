//! Byte layout of the packed output buffer.

use crate::error::{PackError, PackResult};

/// Bytes per original-index entry.
pub const INDEX_STRIDE: usize = std::mem::size_of::<u32>();

/// Bytes per normalized UV pair.
pub const UV_STRIDE: usize = 2 * std::mem::size_of::<f32>();

/// Bytes per vertex across both regions.
pub const VERTEX_STRIDE: usize = INDEX_STRIDE + UV_STRIDE;

/// Region offsets and sizes for a given vertex count.
///
/// # Format
///
/// - Bytes `0..4n`: original indices (`n` × u32)
/// - Bytes `4n..12n`: normalized UVs (`2n` × f32, interleaved u, v)
///
/// All sizes are checked against overflow once in [`OutputLayout::new`], so
/// the accessors are plain arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    vertex_count: usize,
}

impl OutputLayout {
    pub fn new(vertex_count: usize) -> PackResult<Self> {
        if vertex_count.checked_mul(VERTEX_STRIDE).is_none() {
            tracing::debug!(vertex_count, "output layout overflows");
            return Err(PackError::LayoutOverflow { vertex_count });
        }
        Ok(Self { vertex_count })
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Size of the index region in bytes.
    #[must_use]
    pub const fn index_bytes(&self) -> usize {
        self.vertex_count * INDEX_STRIDE
    }

    /// Byte offset of the UV region (directly after the indices).
    #[must_use]
    pub const fn uv_offset(&self) -> usize {
        self.index_bytes()
    }

    /// Size of the UV region in bytes.
    #[must_use]
    pub const fn uv_bytes(&self) -> usize {
        self.vertex_count * UV_STRIDE
    }

    #[must_use]
    pub const fn total_bytes(&self) -> usize {
        self.vertex_count * VERTEX_STRIDE
    }

    /// Size of the whole buffer in 32-bit words.
    #[must_use]
    pub const fn total_words(&self) -> usize {
        self.total_bytes() / INDEX_STRIDE
    }
}

/// Number of bytes a caller must allocate to pack `vertex_count` vertices.
pub fn packed_size(vertex_count: usize) -> PackResult<usize> {
    OutputLayout::new(vertex_count).map(|layout| layout.total_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_vertices() {
        let layout = OutputLayout::new(2).unwrap();
        assert_eq!(layout.index_bytes(), 8);
        assert_eq!(layout.uv_offset(), 8);
        assert_eq!(layout.uv_bytes(), 16);
        assert_eq!(layout.total_bytes(), 24);
        assert_eq!(layout.total_words(), 6);
    }

    #[test]
    fn empty_layout() {
        let layout = OutputLayout::new(0).unwrap();
        assert_eq!(layout.total_bytes(), 0);
        assert_eq!(packed_size(0), Ok(0));
    }

    #[test]
    fn twelve_bytes_per_vertex() {
        assert_eq!(VERTEX_STRIDE, 12);
        assert_eq!(packed_size(1000), Ok(12_000));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(
            OutputLayout::new(usize::MAX),
            Err(PackError::LayoutOverflow {
                vertex_count: usize::MAX
            })
        );
        assert!(packed_size(usize::MAX / VERTEX_STRIDE).is_ok());
        assert!(packed_size(usize::MAX / VERTEX_STRIDE + 1).is_err());
    }
}
