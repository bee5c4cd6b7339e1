use crate::identity::DrawableIdentity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("{kind} pool is full ({capacity} slots)")]
    CapacityExceeded { kind: &'static str, capacity: usize },
    #[error("unknown {kind} identity {identity}")]
    UnknownIdentity {
        kind: &'static str,
        identity: DrawableIdentity,
    },
}
