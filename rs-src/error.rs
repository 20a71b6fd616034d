//! Error types for framebuffer and renderer setup

/// Result type for tunnel setup operations
pub type Result<T> = std::result::Result<T, TunnelError>;

/// Errors raised while wiring a framebuffer or renderer together.
///
/// The kernel itself has no error path; degenerate arithmetic is folded into
/// the saturating cast (see [`crate::kernel::to_int`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TunnelError {
    /// Width or height of zero
    #[error("resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: usize, height: usize },

    /// Pixel count does not fit the signed index arithmetic of the kernel
    #[error("resolution {width}x{height} exceeds the addressable pixel count")]
    ResolutionTooLarge { width: usize, height: usize },

    /// Backing slice length differs from `width * height`
    #[error("framebuffer holds {actual} bytes, resolution needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Host handed over a null framebuffer pointer
    #[error("null framebuffer pointer")]
    NullFramebuffer,
}
