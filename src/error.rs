use thiserror::Error;

/// Errors raised by the stroke renderer when called out of order
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
    /// `extend_stroke` was called without a preceding `begin_stroke`
    #[error("no active stroke to extend")]
    NoActiveStroke,
}

/// Errors that can occur when creating or reshaping a raster surface
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
