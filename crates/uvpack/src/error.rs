//! Error types.

/// Failures detected while validating packing inputs.
///
/// Every variant is raised before any byte of the output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("atlas dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("output buffer too small: need {required} bytes, have {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("output region at byte offset {offset} is not 4-byte aligned")]
    Misaligned { offset: usize },

    #[error("output layout for {vertex_count} vertices overflows usize")]
    LayoutOverflow { vertex_count: usize },

    #[error("output sized for {expected} vertices, mesh has {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },
}

pub type PackResult<T> = Result<T, PackError>;
