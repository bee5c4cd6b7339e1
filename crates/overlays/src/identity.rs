use std::fmt;

use uuid::Uuid;

/// Opaque handle to a drawable overlay.
///
/// Identities are random and never reused, so a removed identity can never
/// alias a later drawable even though slots are.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DrawableIdentity(Uuid);

impl DrawableIdentity {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DrawableIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
