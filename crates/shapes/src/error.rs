use foundation::SpaceError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("not enough points for the shape: {0}")]
    TooFewPoints(usize),
    #[error("{0} vertices do not fit 16-bit indices")]
    TooManyVertices(usize),
    #[error(transparent)]
    Space(#[from] SpaceError),
    #[error("triangulation failed: {0}")]
    Triangulation(String),
}
