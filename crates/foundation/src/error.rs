/// Errors raised by the linear-space math.
///
/// These are programmer errors: callers are expected to build spaces from
/// non-degenerate extents and fail fast when they do not.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SpaceError {
    #[error("degenerate linear space: lower={lower} upper={upper}")]
    Degenerate { lower: f64, upper: f64 },
    #[error("cannot derive a linear space from an empty point set")]
    EmptyPointSet,
}
